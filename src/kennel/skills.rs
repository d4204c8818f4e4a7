//! Trick pool and chat-triggered hidden skills.

use crate::kennel::breeds::BreedModifier;
use crate::kennel::random::RandomSource;
use crate::kennel::types::PuppyRecord;

/// Tricks learnable through training.
pub const TRICKS: [&str; 20] = [
    "Sit",
    "Stay",
    "Roll Over",
    "Shake Paw",
    "Play Dead",
    "Fetch",
    "Spin",
    "Speak",
    "High Five",
    "Jump",
    "Dance",
    "Crawl",
    "Back Up",
    "Bow",
    "Wave",
    "Balance Treat",
    "Heel",
    "Find It",
    "Ring Bell",
    "Open Door",
];

/// A skill unlocked by mentioning any of its keywords in chat.
#[derive(Debug, Clone, Copy)]
pub struct HiddenSkill {
    pub skill: &'static str,
    /// Lowercase substrings
    pub keywords: &'static [&'static str],
}

pub const HIDDEN_SKILLS: [HiddenSkill; 15] = [
    HiddenSkill {
        skill: "🎵 Sing",
        keywords: &["sing", "song", "music", "melody"],
    },
    HiddenSkill {
        skill: "🕺 Moonwalk",
        keywords: &["moon", "moonwalk", "michael", "jackson"],
    },
    HiddenSkill {
        skill: "🎭 Drama Queen",
        keywords: &["drama", "theater", "acting", "shakespeare"],
    },
    HiddenSkill {
        skill: "🧠 Genius Mode",
        keywords: &["einstein", "smart", "genius", "brilliant", "clever"],
    },
    HiddenSkill {
        skill: "🦸 Superhero",
        keywords: &["superhero", "superman", "batman", "marvel", "hero"],
    },
    HiddenSkill {
        skill: "🎨 Artist",
        keywords: &["paint", "art", "artist", "picasso", "draw"],
    },
    HiddenSkill {
        skill: "👑 Royal Bow",
        keywords: &["king", "queen", "royal", "majesty", "crown"],
    },
    HiddenSkill {
        skill: "🚀 Space Walk",
        keywords: &["space", "astronaut", "rocket", "mars", "moon landing"],
    },
    HiddenSkill {
        skill: "🎪 Circus Trick",
        keywords: &["circus", "juggle", "acrobat", "trapeze"],
    },
    HiddenSkill {
        skill: "🧙 Magic Trick",
        keywords: &["magic", "wizard", "spell", "abracadabra", "hocus pocus"],
    },
    HiddenSkill {
        skill: "💖 Heart Melter",
        keywords: &["cute", "adorable", "sweet", "precious"],
    },
    HiddenSkill {
        skill: "🤖 Robot Mode",
        keywords: &["robot", "beep", "boop", "binary", "compute"],
    },
    HiddenSkill {
        skill: "🏴‍☠️ Pirate Arrr",
        keywords: &["pirate", "arrr", "treasure", "ahoy", "matey"],
    },
    HiddenSkill {
        skill: "🥷 Ninja Stealth",
        keywords: &["ninja", "stealth", "shadow", "katana"],
    },
    HiddenSkill {
        skill: "🎯 Sniper Focus",
        keywords: &["focus", "concentrate", "precision", "sniper"],
    },
];

/// Tricks the puppy has not learned yet, in pool order.
pub fn available_tricks(puppy: &PuppyRecord) -> Vec<&'static str> {
    TRICKS
        .iter()
        .copied()
        .filter(|trick| !puppy.has_skill(trick))
        .collect()
}

/// Hidden skills whose keywords occur in `text` and are not already in `known`.
pub fn match_hidden_skills(known: &[String], text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    HIDDEN_SKILLS
        .iter()
        .filter(|hidden| !known.iter().any(|k| k == hidden.skill))
        .filter(|hidden| hidden.keywords.iter().any(|kw| lower.contains(kw)))
        .map(|hidden| hidden.skill)
        .collect()
}

/// Probability gate checked before matching: `1.0 + hidden_skill_bonus`.
pub fn discovery_chance(breed: &BreedModifier) -> f64 {
    1.0 + breed.hidden_skill_bonus.unwrap_or(0.0)
}

/// Scan chat text for hidden skills and grant every new match to the puppy.
///
/// Returns the newly granted tokens in table order; empty when the gate draw
/// fails, the text is blank, or nothing new matched.
pub fn discover_hidden_skills(
    puppy: &mut PuppyRecord,
    text: &str,
    breed: &BreedModifier,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if rng.uniform() > discovery_chance(breed) {
        return Vec::new();
    }
    let mut granted = Vec::new();
    for skill in match_hidden_skills(&puppy.skills, text) {
        if puppy.learn_skill(skill) {
            granted.push(skill.to_string());
        }
    }
    granted
}
