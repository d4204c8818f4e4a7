//! # Puppyhouse - a virtual puppy kennel
//!
//! Puppyhouse keeps virtual puppies alive (or not) between visits. State decays
//! lazily with wall-clock time and is brought up to date whenever a puppy is
//! looked at or interacted with.
//!
//! ## Features
//!
//! - **Lazy Decay**: Energy and happiness fall in whole ticks; partial ticks carry over.
//! - **Actions**: Feed, play, train and talk, each shaped by breed modifiers.
//! - **Hidden Skills**: Chat keywords unlock decorated skills on top of the trick pool.
//! - **Community Pool**: Share a puppy, tend the most neglected one, adopt or reclaim.
//! - **Persistence**: Sled-backed storage with bincode records and schema checks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use puppyhouse::config::Config;
//! use puppyhouse::kennel::{Action, Kennel, SledKennelStore, Target};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = SledKennelStore::open(config.storage.kennel_db_path())?;
//!     let mut kennel = Kennel::new(store, config.kennel, config.engine);
//!
//!     let now = chrono::Utc::now().timestamp_millis();
//!     let me = Target::Personal("alice".into());
//!     kennel.view(&me, now)?;
//!     let outcome = kennel.act(&me, Action::Feed, Some("alice"), now)?;
//!     println!("{}", outcome.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`kennel`] - Engine, storage and the kennel service
//! - [`config`] - Configuration loading and defaults
//! - [`validation`] - Puppy name and chat text validation
//! - [`logutil`] - Single-line log escaping

pub mod config;
pub mod kennel;
pub mod logutil;
pub mod validation;
