//! Kennel: the puppy state engine and its collaborators.
//! Decay, action resolution and hidden-skill discovery are pure functions over a
//! [`PuppyRecord`]; the [`Kennel`] service wires them to a [`PuppyStore`] and
//! handles the community pool (share, adopt, reclaim).

pub mod actions;
pub mod breeds;
pub mod decay;
pub mod errors;
pub mod format;
pub mod pool;
pub mod random;
pub mod service;
pub mod skills;
pub mod storage;
pub mod types;

pub use actions::{apply_action, canned_reply, feed_tier, scaled_energy_cost, training_failure_chance};
pub use breeds::{BreedCatalog, BreedModifier, DEFAULT_BREED_ID};
pub use decay::{derive_age, derive_level, energy_interval_ms, evaluate, refresh_level, DecayReport};
pub use errors::KennelError;
pub use pool::{most_neglected, synthesize_pool_puppy};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use service::Kennel;
pub use skills::{discover_hidden_skills, match_hidden_skills, HIDDEN_SKILLS, TRICKS};
pub use storage::{MemoryKennelStore, PuppyStore, SledKennelStore, SledKennelStoreBuilder};
pub use types::*;
