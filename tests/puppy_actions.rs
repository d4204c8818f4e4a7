use puppyhouse::config::EngineConfig;
use puppyhouse::kennel::actions::{ALL_TRICKS_LEARNED, TOO_SAD_TO_TRAIN};
use puppyhouse::kennel::{
    apply_action, Action, BreedCatalog, PuppyRecord, SequenceRandom, ThreadRandom, TRICKS,
};

fn setup(breed: &str) -> (PuppyRecord, BreedCatalog, EngineConfig) {
    (
        PuppyRecord::new("Rex", breed, 0),
        BreedCatalog::standard(),
        EngineConfig::default(),
    )
}

#[test]
fn new_puppy_feed_scenario() {
    let (mut puppy, catalog, rules) = setup("labrador");
    let mut rng = SequenceRandom::new(vec![0.5]);
    let out = apply_action(&mut puppy, &Action::Feed, &catalog, &rules, &mut rng, 0);
    assert!(!out.blocked);
    assert_eq!(out.puppy.energy, 70);
    assert_eq!(out.puppy.happiness, 50);
    assert!(!out.puppy.dead);
    assert_eq!(out.puppy.messages.back(), Some(&out.message));
}

#[test]
fn sad_puppy_training_is_blocked_and_unchanged() {
    let (mut puppy, catalog, rules) = setup("bordercollie");
    puppy.happiness = 15;
    puppy.learn_skill("Sit");
    let before = puppy.clone();
    let mut rng = SequenceRandom::new(vec![0.0]);

    let out = apply_action(&mut puppy, &Action::Train, &catalog, &rules, &mut rng, 0);
    assert!(out.blocked);
    assert_eq!(out.message, TOO_SAD_TO_TRAIN);
    assert_eq!(puppy.skills, before.skills);
    assert_eq!(puppy.energy, before.energy);
    assert_eq!(puppy.last_active_time, before.last_active_time);
}

#[test]
fn full_trick_pool_redirects_without_failing() {
    let (mut puppy, catalog, rules) = setup("labrador");
    for trick in TRICKS {
        puppy.learn_skill(trick);
    }
    let mut rng = SequenceRandom::new(vec![0.0]);
    let out = apply_action(&mut puppy, &Action::Train, &catalog, &rules, &mut rng, 5);
    assert!(!out.blocked);
    assert_eq!(out.message, ALL_TRICKS_LEARNED);
    assert_eq!(out.puppy.skills.len(), TRICKS.len());
    assert!(out.new_skills.is_empty());
    assert_eq!(out.puppy.level, 5);
}

#[test]
fn training_grants_distinct_tricks_and_levels_up() {
    let (mut puppy, catalog, rules) = setup("bordercollie");
    let mut rng = SequenceRandom::new(vec![0.0]);
    for _ in 0..5 {
        puppy.energy = 100;
        puppy.happiness = 50;
        let out = apply_action(&mut puppy, &Action::Train, &catalog, &rules, &mut rng, 0);
        assert!(!out.blocked);
        assert_eq!(out.new_skills.len(), 1);
    }
    let mut sorted = puppy.skills.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 5);
    assert_eq!(puppy.level, 2);
}

#[test]
fn chihuahua_play_costs_more_energy() {
    let (mut puppy, catalog, rules) = setup("chihuahua");
    let mut rng = SequenceRandom::new(vec![0.5]);
    let out = apply_action(&mut puppy, &Action::Play, &catalog, &rules, &mut rng, 0);
    assert_eq!(out.puppy.happiness, 67);
    assert_eq!(out.puppy.energy, 44);
}

#[test]
fn husky_joyful_play() {
    let (mut puppy, catalog, rules) = setup("sibhusky");
    puppy.happiness = 96;
    let mut rng = SequenceRandom::new(vec![0.5]);
    let out = apply_action(&mut puppy, &Action::Play, &catalog, &rules, &mut rng, 0);
    assert!(!out.blocked);
    assert_eq!(out.puppy.energy, 49);
    assert_eq!(out.puppy.happiness, 100);
    assert!(out.message.contains("ecstatic"));
}

#[test]
fn decay_runs_before_gating() {
    let (mut puppy, catalog, rules) = setup("labrador");
    puppy.energy = 12;
    let mut rng = SequenceRandom::new(vec![0.5]);
    // Two energy ticks leave the puppy at the play threshold.
    let out = apply_action(&mut puppy, &Action::Play, &catalog, &rules, &mut rng, 4 * 60_000);
    assert!(out.blocked);
    assert_eq!(out.puppy.energy, 10);
}

#[test]
fn training_failure_rate_is_roughly_half_at_ten_skills() {
    let catalog = BreedCatalog::standard();
    let rules = EngineConfig::default();
    let mut rng = ThreadRandom;
    let trials = 400;
    let mut failures = 0;
    for _ in 0..trials {
        let mut puppy = PuppyRecord::new("Rex", "welshcorgi", 0);
        for n in 0..10 {
            puppy.learn_skill(&format!("hidden-{}", n));
        }
        let out = apply_action(&mut puppy, &Action::Train, &catalog, &rules, &mut rng, 0);
        assert!(!out.blocked);
        assert_eq!(out.puppy.energy, 35);
        if out.new_skills.is_empty() {
            failures += 1;
        }
    }
    assert!(
        (120..=280).contains(&failures),
        "unexpected failure count {}",
        failures
    );
}
