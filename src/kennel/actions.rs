//! Action resolution: feed, play, train and talk.
//!
//! Every call first brings decay up to date, then applies gating. A gated
//! request returns `blocked = true` and leaves the record as decay left it.
//! Applied requests always stamp `last_active_time`, refresh the level and
//! log the result line into the puppy's message history.

use log::{debug, info};

use crate::config::EngineConfig;
use crate::kennel::breeds::{BreedCatalog, BreedModifier};
use crate::kennel::decay::{evaluate, refresh_level};
use crate::kennel::random::RandomSource;
use crate::kennel::skills::{available_tricks, discover_hidden_skills};
use crate::kennel::types::{adjust_stat, Action, ActionOutcome, PuppyRecord};
use crate::logutil::escape_log;

pub const PLAY_MIN_ENERGY: u32 = 10;
pub const PLAY_HAPPINESS_GAIN: u32 = 10;
pub const PLAY_ENERGY_COST: u32 = 5;
pub const JOYFUL_PLAY_ENERGY_COST: u32 = 2;
pub const JOYFUL_HAPPINESS: u32 = 95;

pub const TRAIN_MIN_ENERGY: u32 = 20;
pub const TRAIN_MIN_HAPPINESS: u32 = 20;
pub const TRAIN_ENERGY_COST: u32 = 15;
pub const MAX_TRAIN_FAILURE: f64 = 0.7;
pub const TRAIN_FAILURE_PER_SKILL: f64 = 0.05;
pub const DOUBLE_TRICK_HAPPINESS: u32 = 80;
pub const DOUBLE_TRICK_CHANCE: f64 = 0.5;

pub const TALK_HAPPINESS_GAIN: u32 = 5;
pub const TALK_HAPPINESS_GAIN_NEAR_MAX: u32 = 2;

pub const DEAD_MESSAGE: &str = "Your puppy is too weak to do anything. Try feeding it!";
pub const TOO_TIRED_TO_PLAY: &str = "Your puppy is too tired to play! Feed it first. 🍖";
pub const TOO_TIRED_TO_TRAIN: &str =
    "Your puppy is too tired to focus on training! Feed it first. 🍖";
pub const TOO_SAD_TO_TRAIN: &str =
    "Your puppy is too sad to focus on training! Play with it first. 😢";
pub const ALL_TRICKS_LEARNED: &str =
    "Your puppy has learned all the basic tricks! Try chatting to unlock hidden skills! 💬";

const GENERIC_REPLY: &str = "Woof! I love talking to you! 🐾";
const MAX_HAPPINESS_REPLY: &str =
    "✨ I'm so incredibly happy! I feel like I could learn anything! ✨ 🌈";

/// History lines for chat that unlocked nothing; `{}` is the puppy's name.
const CHAT_FLAVOR: [&str; 4] = [
    "🐕 {} wags their tail!",
    "🐶 {} looks at you happily!",
    "🎾 {} wants to play!",
    "❤️ {} loves spending time with you!",
];

/// Keyword replies, first match wins.
const CANNED_REPLIES: [(&str, &str); 7] = [
    ("hello", "Woof woof! Hello! 🐶"),
    ("hungry", "I could use a snack! 🍖"),
    ("play", "Let's play fetch! 🎾"),
    ("good", "You're a good human! 🥰"),
    ("love", "I love you too! ❤️"),
    ("trick", "Want to see my tricks? Try training me more! 🎪"),
    (
        "secret",
        "Psst... try talking about different topics to unlock my hidden talents! 🤫",
    ),
];

/// Energy gained from one meal, by current energy. Fuller puppies eat less.
pub fn feed_tier(energy: u32) -> (u32, &'static str) {
    match energy {
        80..=u32::MAX => (10, "Your puppy nibbled a bit but isn't very hungry. 🥱"),
        60..=79 => (15, "Your puppy ate some food but wasn't super hungry. 😊"),
        30..=59 => (20, "Your puppy enjoyed the meal! 😋"),
        _ => (25, "Your puppy devoured the food hungrily! 🤤"),
    }
}

/// Apply breed energy efficiency to a base cost. Negative efficiency raises the cost.
pub fn scaled_energy_cost(base: u32, breed: &BreedModifier) -> u32 {
    let efficiency = breed.energy_efficiency.unwrap_or(0.0);
    (base as f64 * (1.0 - efficiency)).round().max(0.0) as u32
}

/// Probability a training session teaches nothing.
pub fn training_failure_chance(skill_count: usize, breed: &BreedModifier) -> f64 {
    let base = (skill_count as f64 * TRAIN_FAILURE_PER_SKILL).min(MAX_TRAIN_FAILURE);
    let bonus = breed.training_bonus.unwrap_or(0.0) + breed.skill_learning_bonus.unwrap_or(0.0);
    (base - bonus).max(0.0)
}

/// First canned reply whose keyword appears in `text`.
pub fn canned_reply(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CANNED_REPLIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, reply)| *reply)
}

/// Resolve one action against a puppy. Decay is evaluated first.
pub fn apply_action(
    puppy: &mut PuppyRecord,
    action: &Action,
    catalog: &BreedCatalog,
    rules: &EngineConfig,
    rng: &mut dyn RandomSource,
    now: i64,
) -> ActionOutcome {
    let breed = catalog.lookup(&puppy.breed);
    evaluate(puppy, now, rules, breed);

    if puppy.dead && !matches!(action, Action::Feed) {
        debug!("action {} blocked: puppy {} is dead", action.kind(), puppy.id);
        return ActionOutcome::blocked(puppy, DEAD_MESSAGE);
    }

    let result = match action {
        Action::Feed => Ok(feed(puppy)),
        Action::Play => play(puppy, breed),
        Action::Train => train(puppy, breed, rng),
        Action::Talk { text } => Ok(talk(puppy, text.as_deref(), breed, rules, rng)),
    };

    match result {
        Err(reason) => {
            debug!("action {} blocked for {}: {}", action.kind(), puppy.id, reason);
            ActionOutcome::blocked(puppy, reason)
        }
        Ok((message, new_skills)) => {
            if puppy.energy == 0 {
                puppy.dead = true;
            }
            refresh_level(puppy);
            puppy.touch(now);
            puppy.push_message(message.clone(), rules.message_log_cap);
            debug!(
                "action {} applied to {}: energy={} happiness={} skills={}",
                action.kind(),
                puppy.id,
                puppy.energy,
                puppy.happiness,
                puppy.skills.len()
            );
            ActionOutcome::applied(puppy, message, new_skills)
        }
    }
}

type Applied = (String, Vec<String>);

fn feed(puppy: &mut PuppyRecord) -> Applied {
    let (gain, message) = feed_tier(puppy.energy);
    puppy.energy = adjust_stat(puppy.energy, gain as i64);
    if puppy.energy > 0 {
        puppy.dead = false;
    }
    (message.to_string(), Vec::new())
}

fn play(puppy: &mut PuppyRecord, breed: &BreedModifier) -> Result<Applied, &'static str> {
    if puppy.energy <= PLAY_MIN_ENERGY {
        return Err(TOO_TIRED_TO_PLAY);
    }
    let gain = PLAY_HAPPINESS_GAIN + breed.play_happiness_bonus.unwrap_or(0);
    let (base_cost, message) = if puppy.happiness >= JOYFUL_HAPPINESS {
        (
            JOYFUL_PLAY_ENERGY_COST,
            "✨ Your ecstatic puppy played with magical energy! No tiredness! ✨",
        )
    } else {
        (PLAY_ENERGY_COST, "Your puppy had fun playing! 🎾")
    };
    let cost = scaled_energy_cost(base_cost, breed);
    puppy.energy = adjust_stat(puppy.energy, -(cost as i64));
    puppy.happiness = adjust_stat(puppy.happiness, gain as i64);
    Ok((message.to_string(), Vec::new()))
}

fn train(
    puppy: &mut PuppyRecord,
    breed: &BreedModifier,
    rng: &mut dyn RandomSource,
) -> Result<Applied, &'static str> {
    if puppy.energy <= TRAIN_MIN_ENERGY {
        return Err(TOO_TIRED_TO_TRAIN);
    }
    if puppy.happiness < TRAIN_MIN_HAPPINESS {
        return Err(TOO_SAD_TO_TRAIN);
    }

    let mut available = available_tricks(puppy);
    if available.is_empty() {
        return Ok((ALL_TRICKS_LEARNED.to_string(), Vec::new()));
    }

    let failure = training_failure_chance(puppy.skills.len(), breed);
    let spend = |p: &mut PuppyRecord| {
        p.energy = adjust_stat(p.energy, -(TRAIN_ENERGY_COST as i64));
    };

    if rng.uniform() < failure {
        spend(puppy);
        let message = format!(
            "Training was challenging! Your puppy tried hard but didn't learn anything new this time. ({}% difficulty) 😅",
            (failure * 100.0).round() as u32
        );
        return Ok((message, Vec::new()));
    }

    let first = available.remove(rng.pick(available.len()));
    puppy.learn_skill(first);
    let mut learned = vec![first.to_string()];

    let message = if puppy.happiness >= DOUBLE_TRICK_HAPPINESS
        && !available.is_empty()
        && rng.uniform() < DOUBLE_TRICK_CHANCE
    {
        let second = available[rng.pick(available.len())];
        puppy.learn_skill(second);
        learned.push(second.to_string());
        format!(
            "🌟 Amazing! Your happy puppy learned TWO skills: \"{}\" and \"{}\"! 🎉",
            first, second
        )
    } else {
        format!("Great! Your puppy learned \"{}\"! 🎓", first)
    };
    spend(puppy);
    info!("puppy {} learned {}", puppy.id, learned.join(", "));
    Ok((message, learned))
}

fn talk(
    puppy: &mut PuppyRecord,
    text: Option<&str>,
    breed: &BreedModifier,
    rules: &EngineConfig,
    rng: &mut dyn RandomSource,
) -> Applied {
    let gain = if puppy.happiness >= JOYFUL_HAPPINESS {
        TALK_HAPPINESS_GAIN_NEAR_MAX
    } else {
        TALK_HAPPINESS_GAIN
    };
    puppy.happiness = adjust_stat(puppy.happiness, gain as i64);

    let text = text.unwrap_or("").trim();
    if !text.is_empty() {
        debug!("puppy {} hears \"{}\"", puppy.id, escape_log(text));
        puppy.push_message(format!("💬 You: {}", text), rules.message_log_cap);
    }

    let discovered = discover_hidden_skills(puppy, text, breed, rng);
    if !discovered.is_empty() {
        let line = if breed.hidden_skill_bonus.unwrap_or(0.0) > 0.0 {
            format!(
                "✨ {} discovered: {}! ({} specialty - better at finding hidden skills!)",
                puppy.name,
                discovered.join(", "),
                breed.name
            )
        } else {
            format!("✨ {} discovered: {}!", puppy.name, discovered.join(", "))
        };
        info!("{}", escape_log(&line));
        puppy.push_message(line, rules.message_log_cap);
    } else if !text.is_empty() {
        let flavor = CHAT_FLAVOR[rng.pick(CHAT_FLAVOR.len())].replace("{}", &puppy.name);
        puppy.push_message(flavor, rules.message_log_cap);
    }

    let reply = if let Some(first) = discovered.first() {
        format!("🎉 WOW! I just learned \"{}\"! You're amazing! 🌟", first)
    } else if puppy.happiness >= 100 {
        MAX_HAPPINESS_REPLY.to_string()
    } else if let Some(reply) = canned_reply(text) {
        reply.to_string()
    } else {
        GENERIC_REPLY.to_string()
    };
    (reply, discovered)
}
