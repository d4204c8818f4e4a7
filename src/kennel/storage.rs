use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use sled::IVec;

use crate::kennel::errors::KennelError;
use crate::kennel::types::{
    ActivityRecord, PopularityKind, PopularityRecord, PuppyRecord, PUPPY_SCHEMA_VERSION,
};
use crate::logutil::escape_log;

const TREE_PRIMARY: &str = "kennel";
const TREE_ACTIVITY: &str = "kennel_activity";
const TREE_POPULARITY: &str = "kennel_popularity";

const PUPPY_PREFIX: &[u8] = b"puppies:";
const ACTIVITY_PREFIX: &[u8] = b"activity:";

/// Persistence port used by the kennel service. Implementations treat each
/// call as an atomic get/put; there is no cross-call transaction.
pub trait PuppyStore {
    fn get_puppy(&self, id: &str) -> Result<PuppyRecord, KennelError>;
    fn put_puppy(&self, puppy: PuppyRecord) -> Result<(), KennelError>;
    fn delete_puppy(&self, id: &str) -> Result<(), KennelError>;
    /// The puppy personally held by `owner`, if any.
    fn find_held_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError>;
    /// A pool puppy that still remembers `owner` (reclaimable).
    fn find_pooled_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError>;
    fn list_pool(&self) -> Result<Vec<PuppyRecord>, KennelError>;
    /// Append to the activity log and evict the oldest entries past `cap`.
    /// Returns the number evicted.
    fn append_activity(&self, entry: ActivityRecord, cap: usize) -> Result<usize, KennelError>;
    /// Newest first.
    fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityRecord>, KennelError>;
    fn bump_popularity(
        &self,
        puppy_id: &str,
        kind: PopularityKind,
        now: i64,
    ) -> Result<PopularityRecord, KennelError>;
    fn get_popularity(&self, puppy_id: &str) -> Result<PopularityRecord, KennelError>;
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct SledKennelStoreBuilder {
    path: PathBuf,
}

impl SledKennelStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<SledKennelStore, KennelError> {
        SledKennelStore::open(self.path)
    }
}

/// Sled-backed persistence for puppies, the community activity log and popularity counters.
pub struct SledKennelStore {
    db: sled::Db,
    primary: sled::Tree,
    activity: sled::Tree,
    popularity: sled::Tree,
}

impl SledKennelStore {
    /// Open (or create) the kennel store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KennelError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let activity = db.open_tree(TREE_ACTIVITY)?;
        let popularity = db.open_tree(TREE_POPULARITY)?;
        Ok(Self {
            db,
            primary,
            activity,
            popularity,
        })
    }

    fn puppy_key(id: &str) -> Vec<u8> {
        format!("puppies:{}", id).into_bytes()
    }

    fn held_key(owner: &str) -> Vec<u8> {
        format!("held:{}", owner).into_bytes()
    }

    /// Timestamp first, then a monotonic sequence so same-millisecond entries keep insertion order.
    fn activity_key(timestamp: i64, seq: u64) -> Vec<u8> {
        format!("activity:{:020}:{:020}", timestamp.max(0), seq).into_bytes()
    }

    fn popularity_key(puppy_id: &str) -> Vec<u8> {
        format!("popularity:{}", puppy_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, KennelError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, KennelError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn decode_puppy(bytes: IVec) -> Result<PuppyRecord, KennelError> {
        let record: PuppyRecord = Self::deserialize(bytes)?;
        if record.schema_version != PUPPY_SCHEMA_VERSION {
            return Err(KennelError::SchemaMismatch {
                entity: "puppy",
                expected: PUPPY_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    fn scan_puppies(&self) -> Result<Vec<PuppyRecord>, KennelError> {
        let mut puppies = Vec::new();
        for entry in self.primary.scan_prefix(PUPPY_PREFIX) {
            let (_, value) = entry?;
            puppies.push(Self::decode_puppy(value)?);
        }
        Ok(puppies)
    }

    /// Drop the owner index entry when it still points at this record.
    fn clear_held_index(&self, previous: &PuppyRecord) -> Result<(), KennelError> {
        if previous.in_community {
            return Ok(());
        }
        if let Some(owner) = previous.owner.as_deref() {
            let key = Self::held_key(owner);
            if self.primary.get(&key)?.as_deref() == Some(previous.id.as_bytes()) {
                self.primary.remove(key)?;
            }
        }
        Ok(())
    }
}

impl PuppyStore for SledKennelStore {
    fn get_puppy(&self, id: &str) -> Result<PuppyRecord, KennelError> {
        let Some(bytes) = self.primary.get(Self::puppy_key(id))? else {
            return Err(KennelError::NotFound(format!("puppy: {}", id)));
        };
        Self::decode_puppy(bytes)
    }

    fn put_puppy(&self, mut puppy: PuppyRecord) -> Result<(), KennelError> {
        puppy.schema_version = PUPPY_SCHEMA_VERSION;
        let key = Self::puppy_key(&puppy.id);
        if let Some(previous) = self.primary.get(&key)? {
            self.clear_held_index(&Self::decode_puppy(previous)?)?;
        }
        if !puppy.in_community {
            if let Some(owner) = puppy.owner.as_deref() {
                self.primary
                    .insert(Self::held_key(owner), puppy.id.as_bytes())?;
            }
        }
        let bytes = Self::serialize(&puppy)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    fn delete_puppy(&self, id: &str) -> Result<(), KennelError> {
        let key = Self::puppy_key(id);
        let Some(previous) = self.primary.get(&key)? else {
            return Err(KennelError::NotFound(format!("puppy: {}", id)));
        };
        self.clear_held_index(&Self::decode_puppy(previous)?)?;
        self.primary.remove(key)?;
        self.popularity.remove(Self::popularity_key(id))?;
        self.primary.flush()?;
        Ok(())
    }

    fn find_held_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError> {
        let Some(id) = self.primary.get(Self::held_key(owner))? else {
            return Ok(None);
        };
        let id = std::str::from_utf8(&id)
            .map_err(|e| {
            KennelError::Internal(format!("held index for {}: {}", escape_log(owner), e))
        })?;
        match self.get_puppy(id) {
            Ok(puppy) if puppy.is_held_by(owner) => Ok(Some(puppy)),
            Ok(_) | Err(KennelError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn find_pooled_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError> {
        Ok(self
            .scan_puppies()?
            .into_iter()
            .filter(|p| p.in_community && p.owner.as_deref() == Some(owner))
            .max_by_key(|p| p.last_active_time))
    }

    fn list_pool(&self) -> Result<Vec<PuppyRecord>, KennelError> {
        Ok(self
            .scan_puppies()?
            .into_iter()
            .filter(|p| p.in_community)
            .collect())
    }

    fn append_activity(&self, entry: ActivityRecord, cap: usize) -> Result<usize, KennelError> {
        let key = Self::activity_key(entry.timestamp, self.db.generate_id()?);
        self.activity.insert(key, Self::serialize(&entry)?)?;

        let keys: Result<Vec<_>, _> = self
            .activity
            .scan_prefix(ACTIVITY_PREFIX)
            .map(|result| result.map(|(key, _value)| key))
            .collect();
        let keys = keys?;
        let mut removed = 0;
        if keys.len() > cap {
            // Keys embed a zero-padded timestamp, so scan order is oldest first.
            for key in keys.iter().take(keys.len() - cap) {
                self.activity.remove(key)?;
                removed += 1;
            }
        }
        self.activity.flush()?;
        Ok(removed)
    }

    fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityRecord>, KennelError> {
        self.activity
            .scan_prefix(ACTIVITY_PREFIX)
            .rev()
            .take(limit)
            .map(|result| {
                result
                    .map_err(KennelError::from)
                    .and_then(|(_key, value)| Self::deserialize(value))
            })
            .collect()
    }

    fn bump_popularity(
        &self,
        puppy_id: &str,
        kind: PopularityKind,
        now: i64,
    ) -> Result<PopularityRecord, KennelError> {
        let mut record = self.get_popularity(puppy_id)?;
        record.bump(kind, now);
        self.popularity
            .insert(Self::popularity_key(puppy_id), Self::serialize(&record)?)?;
        self.popularity.flush()?;
        Ok(record)
    }

    fn get_popularity(&self, puppy_id: &str) -> Result<PopularityRecord, KennelError> {
        match self.popularity.get(Self::popularity_key(puppy_id))? {
            Some(bytes) => Self::deserialize(bytes),
            None => Ok(PopularityRecord::default()),
        }
    }
}

#[derive(Default)]
struct MemoryState {
    puppies: HashMap<String, PuppyRecord>,
    activity: VecDeque<ActivityRecord>,
    popularity: HashMap<String, PopularityRecord>,
}

/// In-process store with the same semantics as [`SledKennelStore`]; nothing survives a restart.
#[derive(Default)]
pub struct MemoryKennelStore {
    state: Mutex<MemoryState>,
}

impl MemoryKennelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, KennelError> {
        self.state
            .lock()
            .map_err(|e| KennelError::Internal(format!("memory store lock poisoned: {}", e)))
    }
}

impl PuppyStore for MemoryKennelStore {
    fn get_puppy(&self, id: &str) -> Result<PuppyRecord, KennelError> {
        self.lock()?
            .puppies
            .get(id)
            .cloned()
            .ok_or_else(|| KennelError::NotFound(format!("puppy: {}", id)))
    }

    fn put_puppy(&self, mut puppy: PuppyRecord) -> Result<(), KennelError> {
        puppy.schema_version = PUPPY_SCHEMA_VERSION;
        self.lock()?.puppies.insert(puppy.id.clone(), puppy);
        Ok(())
    }

    fn delete_puppy(&self, id: &str) -> Result<(), KennelError> {
        let mut state = self.lock()?;
        state.popularity.remove(id);
        state
            .puppies
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| KennelError::NotFound(format!("puppy: {}", id)))
    }

    fn find_held_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError> {
        Ok(self
            .lock()?
            .puppies
            .values()
            .find(|p| p.is_held_by(owner))
            .cloned())
    }

    fn find_pooled_by(&self, owner: &str) -> Result<Option<PuppyRecord>, KennelError> {
        Ok(self
            .lock()?
            .puppies
            .values()
            .filter(|p| p.in_community && p.owner.as_deref() == Some(owner))
            .max_by_key(|p| p.last_active_time)
            .cloned())
    }

    fn list_pool(&self) -> Result<Vec<PuppyRecord>, KennelError> {
        Ok(self
            .lock()?
            .puppies
            .values()
            .filter(|p| p.in_community)
            .cloned()
            .collect())
    }

    fn append_activity(&self, entry: ActivityRecord, cap: usize) -> Result<usize, KennelError> {
        let mut state = self.lock()?;
        state.activity.push_back(entry);
        let mut removed = 0;
        while state.activity.len() > cap {
            state.activity.pop_front();
            removed += 1;
        }
        Ok(removed)
    }

    fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityRecord>, KennelError> {
        Ok(self
            .lock()?
            .activity
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    fn bump_popularity(
        &self,
        puppy_id: &str,
        kind: PopularityKind,
        now: i64,
    ) -> Result<PopularityRecord, KennelError> {
        let mut state = self.lock()?;
        let record = state.popularity.entry(puppy_id.to_string()).or_default();
        record.bump(kind, now);
        Ok(record.clone())
    }

    fn get_popularity(&self, puppy_id: &str) -> Result<PopularityRecord, KennelError> {
        Ok(self
            .lock()?
            .popularity
            .get(puppy_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kennel::types::ActivityKind;
    use tempfile::TempDir;

    fn open_store() -> (SledKennelStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = SledKennelStoreBuilder::new(dir.path()).open().expect("store");
        (store, dir)
    }

    #[test]
    fn store_round_trip_puppy() {
        let (store, _dir) = open_store();
        let mut puppy = PuppyRecord::new("Rex", "beagle", 1_000).with_owner("alice");
        puppy.skills.push("Sit".into());
        store.put_puppy(puppy.clone()).expect("put");
        let fetched = store.get_puppy(&puppy.id).expect("get");
        assert_eq!(fetched, puppy);
        assert_eq!(fetched.schema_version, PUPPY_SCHEMA_VERSION);
    }

    #[test]
    fn held_index_follows_moves_into_pool() {
        let (store, _dir) = open_store();
        let puppy = PuppyRecord::new("Rex", "labrador", 0).with_owner("alice");
        store.put_puppy(puppy.clone()).unwrap();
        assert_eq!(
            store.find_held_by("alice").unwrap().map(|p| p.id),
            Some(puppy.id.clone())
        );

        store.put_puppy(puppy.clone().in_pool()).unwrap();
        assert!(store.find_held_by("alice").unwrap().is_none());
        assert_eq!(
            store.find_pooled_by("alice").unwrap().map(|p| p.id),
            Some(puppy.id.clone())
        );
        assert_eq!(store.list_pool().unwrap().len(), 1);
    }

    #[test]
    fn missing_puppy_is_not_found() {
        let (store, _dir) = open_store();
        assert!(matches!(
            store.get_puppy("nope"),
            Err(KennelError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_puppy("nope"),
            Err(KennelError::NotFound(_))
        ));
    }

    #[test]
    fn delete_clears_index() {
        let (store, _dir) = open_store();
        let puppy = PuppyRecord::new("Rex", "labrador", 0).with_owner("bob");
        store.put_puppy(puppy.clone()).unwrap();
        store.delete_puppy(&puppy.id).unwrap();
        assert!(store.find_held_by("bob").unwrap().is_none());
    }

    #[test]
    fn activity_log_is_capped_newest_first() {
        let (store, _dir) = open_store();
        let puppy = PuppyRecord::new("Rex", "labrador", 0);
        let mut evicted = 0;
        for ts in 0..8 {
            let entry = ActivityRecord::new(ActivityKind::Fed, &puppy, None, "fed", ts);
            evicted += store.append_activity(entry, 5).unwrap();
        }
        assert_eq!(evicted, 3);
        let recent = store.recent_activity(10).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].timestamp, 7);
        assert_eq!(recent[4].timestamp, 3);
        assert_eq!(recent[0].user_name, "Anonymous");
    }

    #[test]
    fn popularity_counts_accumulate() {
        let (store, _dir) = open_store();
        assert_eq!(store.get_popularity("p1").unwrap(), PopularityRecord::default());
        store.bump_popularity("p1", PopularityKind::View, 1).unwrap();
        store.bump_popularity("p1", PopularityKind::View, 2).unwrap();
        let rec = store
            .bump_popularity("p1", PopularityKind::Adoption, 3)
            .unwrap();
        assert_eq!(rec.views, 2);
        assert_eq!(rec.adoptions, 1);
        assert_eq!(rec.updated_at, 3);
        assert_eq!(store.get_popularity("p1").unwrap(), rec);
    }

    #[test]
    fn memory_store_matches_sled_semantics() {
        let store = MemoryKennelStore::new();
        let puppy = PuppyRecord::new("Rex", "labrador", 0).with_owner("alice");
        store.put_puppy(puppy.clone()).unwrap();
        assert!(store.find_held_by("alice").unwrap().is_some());
        store.put_puppy(puppy.clone().in_pool()).unwrap();
        assert!(store.find_held_by("alice").unwrap().is_none());
        assert!(store.find_pooled_by("alice").unwrap().is_some());

        for ts in 0..4 {
            let entry = ActivityRecord::new(ActivityKind::Played, &puppy, Some("alice"), "", ts);
            store.append_activity(entry, 2).unwrap();
        }
        let recent = store.recent_activity(5).unwrap();
        assert_eq!(recent.iter().map(|a| a.timestamp).collect::<Vec<_>>(), vec![3, 2]);
    }
}
