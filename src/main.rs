//! Binary entrypoint for the Puppyhouse CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and create the kennel database
//! - `status` - show your puppy (or a pool puppy with `--community` / `--puppy`)
//! - `create <name> [--breed <id>]` - name a new puppy
//! - `feed`, `play`, `train`, `talk [text]` - interact with the targeted puppy
//! - `share`, `adopt <id>`, `reclaim` - move puppies between you and the pool
//! - `community`, `breeds`, `activity`, `popularity <id>` - listings
//!
//! See the library crate docs for module-level details: `puppyhouse::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use puppyhouse::config::Config;
use puppyhouse::kennel::format::{
    render_activity, render_breeds, render_community, render_outcome, render_popularity,
    render_puppy, render_view,
};
use puppyhouse::kennel::{Action, Kennel, SledKennelStore, SledKennelStoreBuilder, Target};
use puppyhouse::logutil::escape_log;

#[derive(Parser)]
#[command(name = "puppyhouse")]
#[command(about = "A virtual puppy kennel with a shared community pool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Owner id for personal commands
    #[arg(short, long, default_value = "local", global = true)]
    user: String,

    /// Target the most neglected community puppy
    #[arg(long, global = true, conflicts_with = "puppy")]
    community: bool,

    /// Target a specific community puppy by id
    #[arg(long, global = true)]
    puppy: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration and kennel database
    Init,
    /// Show the targeted puppy
    Status,
    /// Create a named puppy
    Create {
        name: String,
        /// Breed id (see `breeds`); unknown ids fall back to the default breed
        #[arg(short, long)]
        breed: Option<String>,
    },
    Feed,
    Play,
    Train,
    /// Chat with the puppy; some words unlock hidden skills
    Talk {
        text: Vec<String>,
    },
    /// Put your puppy into the community pool
    Share,
    /// Adopt a community puppy
    Adopt { puppy_id: String },
    /// Bring back the puppy you shared
    Reclaim,
    /// List the community pool
    Community,
    /// List available breeds
    Breeds,
    /// Show recent community activity
    Activity {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show popularity counters for a puppy
    Popularity { puppy_id: String },
}

impl Cli {
    fn target(&self) -> Target {
        if let Some(id) = &self.puppy {
            Target::PoolMember(id.clone())
        } else if self.community {
            Target::Pool
        } else {
            Target::Personal(self.user.clone())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        return init(&cli.config).await;
    }

    let pre_config = Config::load(&cli.config).await.ok();
    init_logging(&pre_config, cli.verbose);
    let config = match pre_config {
        Some(config) => config,
        None => {
            warn!("No usable config at {}; using defaults", escape_log(&cli.config));
            Config::default()
        }
    };

    let store = SledKennelStoreBuilder::new(config.storage.kennel_db_path()).open()?;
    let mut kennel = Kennel::new(store, config.kennel, config.engine);
    let now = chrono::Utc::now().timestamp_millis();
    let target = cli.target();
    let json = cli.json;

    match cli.command {
        // Handled before the store is opened
        Commands::Init => {}
        Commands::Status => {
            let view = kennel.view(&target, now)?;
            emit(json, &view, |v| {
                render_view(v, kennel.catalog(), kennel.rules(), now)
            })?;
        }
        Commands::Create { name, breed } => {
            let puppy = kennel.create(&cli.user, &name, breed.as_deref(), now)?;
            emit(json, &puppy, |p| {
                render_puppy(p, kennel.catalog(), kennel.rules(), now)
            })?;
        }
        Commands::Feed => act(&mut kennel, &target, Action::Feed, &cli.user, json, now)?,
        Commands::Play => act(&mut kennel, &target, Action::Play, &cli.user, json, now)?,
        Commands::Train => act(&mut kennel, &target, Action::Train, &cli.user, json, now)?,
        Commands::Talk { text } => {
            let text = (!text.is_empty()).then(|| text.join(" "));
            act(&mut kennel, &target, Action::Talk { text }, &cli.user, json, now)?
        }
        Commands::Share => {
            let puppy = kennel.share(&cli.user, now)?;
            emit(json, &puppy, |p| {
                format!("{} is now in the community pool (id {})", p.name, p.id)
            })?;
        }
        Commands::Adopt { puppy_id } => {
            let puppy = kennel.adopt(&cli.user, &puppy_id, now)?;
            emit(json, &puppy, |p| format!("You adopted {}! 🏠", p.name))?;
        }
        Commands::Reclaim => {
            let puppy = kennel.reclaim(&cli.user, now)?;
            emit(json, &puppy, |p| format!("{} is back home with you! 🏠", p.name))?;
        }
        Commands::Community => {
            let pool = kennel.community(now)?;
            emit(json, &pool, |p| render_community(p))?;
        }
        Commands::Breeds => {
            emit(json, kennel.breeds(), render_breeds)?;
        }
        Commands::Activity { limit } => {
            let entries = kennel.recent_activity(limit)?;
            emit(json, &entries, |e| render_activity(e))?;
        }
        Commands::Popularity { puppy_id } => {
            let record = kennel.popularity(&puppy_id)?;
            emit(json, &record, |r| render_popularity(&puppy_id, r))?;
        }
    }

    Ok(())
}

async fn init(path: &str) -> Result<()> {
    info!("Initializing new Puppyhouse configuration");
    if tokio::fs::metadata(path).await.is_ok() {
        warn!(
            "Configuration file {} already exists; leaving it untouched",
            escape_log(path)
        );
    } else {
        Config::create_default(path).await?;
        info!("Configuration file created at {}", escape_log(path));
    }
    let config = Config::load(path).await?;
    let db_path = config.storage.kennel_db_path();
    let _store = SledKennelStore::open(&db_path)?;
    info!("Kennel database ready at {}", db_path.display());
    Ok(())
}

fn act(
    kennel: &mut Kennel<SledKennelStore>,
    target: &Target,
    action: Action,
    user: &str,
    json: bool,
    now: i64,
) -> Result<()> {
    let outcome = kennel.act(target, action, Some(user), now)?;
    emit(json, &outcome, render_outcome)
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // -v overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });
    if let Some(f) = opened {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
