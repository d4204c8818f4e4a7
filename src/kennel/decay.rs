//! Lazy time-based decay plus level and age derivation.
//!
//! Decay is evaluated on read: elapsed wall-clock time since `last_update_time`
//! is converted into whole energy ticks, and `last_update_time` advances by
//! exactly those ticks so the fractional remainder carries into the next read.

use log::debug;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::kennel::breeds::BreedModifier;
use crate::kennel::types::{adjust_stat, PuppyRecord};

pub const SKILLS_PER_LEVEL: usize = 5;

/// Cap on breed decay reduction so the interval stays finite.
const MAX_DECAY_REDUCTION: f64 = 0.9;

/// What one evaluation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecayReport {
    pub ticks: u64,
    pub energy_lost: u32,
    pub happiness_lost: u32,
    pub died: bool,
    pub revived: bool,
}

/// Milliseconds per point of energy decay for this breed.
///
/// A reduction `r` stretches the base interval to `base / (1 - r)`, so 0.5
/// halves the decay rate.
pub fn energy_interval_ms(rules: &EngineConfig, breed: &BreedModifier) -> i64 {
    let base = rules.energy_tick_ms.max(1) as f64;
    let interval = match breed.hunger_decay_reduction {
        Some(r) => base / (1.0 - r.min(MAX_DECAY_REDUCTION)),
        None => base,
    };
    (interval.round() as i64).max(1)
}

/// Bring energy, happiness and the dead flag up to date with `now`.
///
/// Calling twice with the same `now` is a no-op the second time.
pub fn evaluate(
    puppy: &mut PuppyRecord,
    now: i64,
    rules: &EngineConfig,
    breed: &BreedModifier,
) -> DecayReport {
    let mut report = DecayReport::default();
    let interval = energy_interval_ms(rules, breed);
    let elapsed = (now - puppy.last_update_time).max(0);
    let ticks = elapsed / interval;

    if ticks > 0 {
        let before_energy = puppy.energy;
        let before_happiness = puppy.happiness;
        let happiness_ticks = elapsed / rules.happiness_tick_ms.max(1) as i64;

        puppy.energy = adjust_stat(puppy.energy, -ticks);
        puppy.happiness = adjust_stat(puppy.happiness, -happiness_ticks);
        puppy.last_update_time += ticks * interval;

        report.ticks = ticks as u64;
        report.energy_lost = before_energy - puppy.energy;
        report.happiness_lost = before_happiness - puppy.happiness;
        debug!(
            "decay: puppy {} ticks={} energy -{} happiness -{}",
            puppy.id, ticks, report.energy_lost, report.happiness_lost
        );
    }

    refresh_dead_flag(puppy, &mut report);
    report
}

/// `dead` tracks energy depletion and clears as soon as energy is positive again.
fn refresh_dead_flag(puppy: &mut PuppyRecord, report: &mut DecayReport) {
    if puppy.energy == 0 {
        report.died = !puppy.dead;
        puppy.dead = true;
    } else if puppy.dead {
        puppy.dead = false;
        report.revived = true;
    }
}

/// `1 + floor(skills / SKILLS_PER_LEVEL)`.
pub fn derive_level(puppy: &PuppyRecord) -> u32 {
    1 + (puppy.skills.len() / SKILLS_PER_LEVEL) as u32
}

/// Recompute the cached level after a skill change.
pub fn refresh_level(puppy: &mut PuppyRecord) {
    puppy.level = derive_level(puppy);
}

/// Age in cosmetic "days", one decimal place.
pub fn derive_age(puppy: &PuppyRecord, now: i64, rules: &EngineConfig) -> String {
    let elapsed = (now - puppy.birth_time).max(0) as f64;
    format!("{:.1}", elapsed / rules.ms_per_day.max(1) as f64)
}
