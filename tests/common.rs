//! Test utilities & fixtures.
//! Every store lives in its own temp dir so tests can run in parallel.

use puppyhouse::config::{EngineConfig, KennelConfig};
use puppyhouse::kennel::{Kennel, PuppyRecord, SequenceRandom, SledKennelStore, SledKennelStoreBuilder};
use tempfile::TempDir;

#[allow(dead_code)]
pub const MINUTE: i64 = 60_000;

/// Fresh sled-backed store. Keep the `TempDir` alive for the test's duration.
#[allow(dead_code)]
pub fn open_store() -> (SledKennelStore, TempDir) {
    let temp_dir = TempDir::new().expect("tempdir");
    let store = SledKennelStoreBuilder::new(temp_dir.path())
        .open()
        .expect("open store");
    (store, temp_dir)
}

/// Kennel over a fresh store with scripted random draws.
#[allow(dead_code)]
pub fn kennel_with(
    rules: EngineConfig,
    draws: Vec<f64>,
) -> (Kennel<SledKennelStore, SequenceRandom>, TempDir) {
    let (store, temp_dir) = open_store();
    let kennel = Kennel::with_random(
        store,
        KennelConfig::default(),
        rules,
        SequenceRandom::new(draws),
    );
    (kennel, temp_dir)
}

#[allow(dead_code)]
pub fn kennel(draws: Vec<f64>) -> (Kennel<SledKennelStore, SequenceRandom>, TempDir) {
    kennel_with(EngineConfig::default(), draws)
}

/// A pool puppy last tended at `last_active`.
#[allow(dead_code)]
pub fn pooled(name: &str, last_active: i64) -> PuppyRecord {
    let mut puppy = PuppyRecord::new(name, "labrador", 0).in_pool();
    puppy.last_active_time = last_active;
    puppy
}
