//! Community pool selection.

use crate::kennel::types::PuppyRecord;

/// The most neglected living pool puppy: minimum `last_active_time` among
/// members that are not dead. Ties keep the first in slice order.
pub fn most_neglected(pool: &[PuppyRecord]) -> Option<&PuppyRecord> {
    pool.iter()
        .filter(|p| p.in_community && !p.dead)
        .min_by_key(|p| p.last_active_time)
}

/// A fresh default-breed puppy placed straight into the pool.
pub fn synthesize_pool_puppy(name: &str, breed: &str, now: i64) -> PuppyRecord {
    PuppyRecord::new(name, breed, now).in_pool()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pooled(name: &str, last_active: i64) -> PuppyRecord {
        let mut p = PuppyRecord::new(name, "labrador", 0).in_pool();
        p.last_active_time = last_active;
        p
    }

    #[test]
    fn picks_least_recently_active() {
        let pool = vec![pooled("B", 200), pooled("A", 100)];
        assert_eq!(most_neglected(&pool).map(|p| p.name.as_str()), Some("A"));
    }

    #[test]
    fn skips_dead_members() {
        let mut dead = pooled("Ghost", 10);
        dead.dead = true;
        let pool = vec![dead, pooled("Alive", 500)];
        assert_eq!(most_neglected(&pool).map(|p| p.name.as_str()), Some("Alive"));
    }

    #[test]
    fn empty_or_all_dead_yields_none() {
        assert!(most_neglected(&[]).is_none());
        let mut dead = pooled("Ghost", 10);
        dead.dead = true;
        assert!(most_neglected(&[dead]).is_none());
    }

    #[test]
    fn synthesized_puppy_lives_in_pool() {
        let p = synthesize_pool_puppy("Lonely Puppy", "labrador", 42);
        assert!(p.in_community);
        assert!(p.owner.is_none());
        assert_eq!(p.last_active_time, 42);
    }
}
