use puppyhouse::config::EngineConfig;
use puppyhouse::kennel::{
    apply_action, derive_age, derive_level, energy_interval_ms, evaluate, Action, BreedCatalog,
    PuppyRecord, SequenceRandom, STAT_MAX,
};

mod common;
use common::MINUTE;

#[test]
fn stats_stay_in_bounds_for_any_elapsed_time() {
    let rules = EngineConfig::default();
    let catalog = BreedCatalog::standard();
    for breed in catalog.all() {
        for start in [0u32, 1, 37, 99, 100] {
            for elapsed in [0, 1, MINUTE, 7 * MINUTE, 600 * MINUTE, 100_000 * MINUTE] {
                let mut puppy = PuppyRecord::new("Rex", breed.id, 0);
                puppy.energy = start;
                puppy.happiness = start;
                evaluate(&mut puppy, elapsed, &rules, breed);
                assert!(puppy.energy <= STAT_MAX);
                assert!(puppy.happiness <= STAT_MAX);
                assert_eq!(puppy.dead, puppy.energy == 0);
            }
        }
    }
}

#[test]
fn repeated_evaluation_at_same_instant_changes_nothing() {
    let rules = EngineConfig::default();
    let catalog = BreedCatalog::standard();
    for breed in catalog.all() {
        let mut puppy = PuppyRecord::new("Rex", breed.id, 0);
        evaluate(&mut puppy, 47 * MINUTE + 123, &rules, breed);
        let once = puppy.clone();
        evaluate(&mut puppy, 47 * MINUTE + 123, &rules, breed);
        assert_eq!(puppy, once, "breed {}", breed.id);
    }
}

#[test]
fn split_evaluation_matches_single_evaluation_for_energy() {
    let rules = EngineConfig::default();
    let catalog = BreedCatalog::standard();
    let breed = catalog.lookup("labrador");

    let mut stepwise = PuppyRecord::new("Rex", "labrador", 0);
    evaluate(&mut stepwise, 7 * MINUTE, &rules, breed);
    assert_eq!(stepwise.last_update_time, 6 * MINUTE);
    evaluate(&mut stepwise, 8 * MINUTE, &rules, breed);

    let mut single = PuppyRecord::new("Rex", "labrador", 0);
    evaluate(&mut single, 8 * MINUTE, &rules, breed);

    assert_eq!(stepwise.energy, 46);
    assert_eq!(stepwise.energy, single.energy);
    assert_eq!(stepwise.last_update_time, single.last_update_time);
}

#[test]
fn samoyed_decays_slower() {
    let rules = EngineConfig::default();
    let catalog = BreedCatalog::standard();
    let samoyed = catalog.lookup("samoyed");
    assert_eq!(energy_interval_ms(&rules, samoyed), 200_000);

    let mut puppy = PuppyRecord::new("Cloud", "samoyed", 0);
    evaluate(&mut puppy, 1_000_000, &rules, samoyed);
    assert_eq!(puppy.energy, 45);
    assert_eq!(puppy.happiness, 46);
}

#[test]
fn feeding_a_dead_puppy_revives_it() {
    let rules = EngineConfig::default();
    let catalog = BreedCatalog::standard();
    let mut rng = SequenceRandom::new(vec![0.5]);
    let mut puppy = PuppyRecord::new("Rex", "labrador", 0);
    puppy.energy = 0;
    puppy.dead = true;

    let out = apply_action(&mut puppy, &Action::Feed, &catalog, &rules, &mut rng, 0);
    assert!(!out.blocked);
    assert_eq!(out.puppy.energy, 25);
    assert!(!out.puppy.dead);
}

#[test]
fn level_is_monotonic_in_skill_count() {
    let mut puppy = PuppyRecord::new("Rex", "labrador", 0);
    let mut previous = derive_level(&puppy);
    for n in 0..25 {
        puppy.learn_skill(&format!("skill-{}", n));
        let level = derive_level(&puppy);
        assert!(level >= previous);
        previous = level;
    }
    assert_eq!(previous, 6);
}

#[test]
fn age_follows_configured_day_length() {
    let rules = EngineConfig {
        ms_per_day: 1_000,
        ..EngineConfig::default()
    };
    let puppy = PuppyRecord::new("Rex", "labrador", 10_000);
    assert_eq!(derive_age(&puppy, 12_500, &rules), "2.5");
    assert_eq!(derive_age(&puppy, 10_000, &rules), "0.0");
}
