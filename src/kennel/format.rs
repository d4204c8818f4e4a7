//! Plain-text rendering for the CLI.

use chrono::{TimeZone, Utc};

use crate::config::EngineConfig;
use crate::kennel::breeds::{BreedCatalog, BreedModifier};
use crate::kennel::decay::derive_age;
use crate::kennel::types::{
    ActionOutcome, ActivityRecord, PopularityRecord, PuppyRecord, PuppySummary, PuppyView,
};

/// How many recent messages a status card shows.
const STATUS_MESSAGES: usize = 5;

fn bar(value: u32) -> String {
    let filled = (value.min(100) / 10) as usize;
    format!("[{}{}] {:>3}", "#".repeat(filled), ".".repeat(10 - filled), value)
}

fn timestamp(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ms.to_string(),
    }
}

pub fn render_puppy(puppy: &PuppyRecord, catalog: &BreedCatalog, rules: &EngineConfig, now: i64) -> String {
    let breed = catalog.lookup(&puppy.breed);
    let mut out = format!(
        "🐶 {} the {} (level {}, {} days old){}\n",
        puppy.name,
        breed.name,
        puppy.level,
        derive_age(puppy, now, rules),
        if puppy.dead { " 💤 too weak to move" } else { "" }
    );
    out.push_str(&format!("   happiness {}\n", bar(puppy.happiness)));
    out.push_str(&format!("   energy    {}\n", bar(puppy.energy)));
    if puppy.in_community {
        out.push_str("   lives in the community pool\n");
    }
    if puppy.skills.is_empty() {
        out.push_str("   skills: none yet\n");
    } else {
        out.push_str(&format!("   skills: {}\n", puppy.skills.join(", ")));
    }
    let skip = puppy.messages.len().saturating_sub(STATUS_MESSAGES);
    for message in puppy.messages.iter().skip(skip) {
        out.push_str(&format!("   > {}\n", message));
    }
    out.push_str(&format!("   id: {}", puppy.id));
    out
}

pub fn render_summary(summary: &PuppySummary) -> String {
    format!(
        "{} {} ({}) lvl {} age {} | happy {:>3} energy {:>3} | {} skills | last seen {}{}",
        summary.id,
        summary.name,
        summary.breed,
        summary.level,
        summary.age,
        summary.happiness,
        summary.energy,
        summary.skills,
        timestamp(summary.last_active_time),
        if summary.dead { " 💤" } else { "" }
    )
}

pub fn render_view(view: &PuppyView, catalog: &BreedCatalog, rules: &EngineConfig, now: i64) -> String {
    match view {
        PuppyView::Puppy(puppy) => render_puppy(puppy, catalog, rules, now),
        PuppyView::NeedsReclaim(summary) => format!(
            "Your puppy is waiting in the community pool. Run `reclaim` to bring it home.\n{}",
            render_summary(summary)
        ),
    }
}

pub fn render_outcome(outcome: &ActionOutcome) -> String {
    if outcome.blocked {
        format!("⛔ {}", outcome.message)
    } else {
        format!(
            "{}\n   happiness {}\n   energy    {}",
            outcome.message,
            bar(outcome.puppy.happiness),
            bar(outcome.puppy.energy)
        )
    }
}

pub fn render_community(pool: &[PuppySummary]) -> String {
    if pool.is_empty() {
        return "The community pool is empty.".to_string();
    }
    let mut lines = vec![format!("Community pool ({} puppies, most neglected first):", pool.len())];
    lines.extend(pool.iter().map(render_summary));
    lines.join("\n")
}

pub fn render_breeds(breeds: &[BreedModifier]) -> String {
    breeds
        .iter()
        .map(|b| format!("{:<13} {:<18} {} [{}]", b.id, b.name, b.description, b.specialties.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_activity(entries: &[ActivityRecord]) -> String {
    if entries.is_empty() {
        return "No community activity yet.".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{} {} {:?} {}: {}",
                timestamp(e.timestamp),
                e.user_name,
                e.kind,
                e.puppy_name,
                e.details
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_popularity(puppy_id: &str, record: &PopularityRecord) -> String {
    format!(
        "{}: {} views, {} interactions, {} adoptions",
        puppy_id, record.views, record.interactions, record.adoptions
    )
}
