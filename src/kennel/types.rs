use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::kennel::errors::KennelError;

pub const PUPPY_SCHEMA_VERSION: u8 = 1;

/// Upper bound for happiness and energy.
pub const STAT_MAX: u32 = 100;

/// Apply a signed delta to a stat and clamp the result to `[0, STAT_MAX]`.
pub fn adjust_stat(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).clamp(0, STAT_MAX as i64) as u32
}

/// Persistent puppy state.
///
/// Timestamps are milliseconds since the Unix epoch. `level` is a cached
/// derivation of `skills` and is recomputed whenever skills change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PuppyRecord {
    pub id: String,
    /// Current holder, or the remembered prior owner while in the pool
    pub owner: Option<String>,
    pub name: String,
    /// Breed catalog key; unknown keys resolve to the default breed
    pub breed: String,
    pub birth_time: i64,
    pub happiness: u32,
    pub energy: u32,
    /// Discovery order, no duplicates
    pub skills: Vec<String>,
    pub level: u32,
    /// Advances in whole decay ticks only
    pub last_update_time: i64,
    pub last_active_time: i64,
    pub dead: bool,
    pub in_community: bool,
    pub messages: VecDeque<String>,
    pub schema_version: u8,
}

impl PuppyRecord {
    pub fn new(name: &str, breed: &str, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            owner: None,
            name: name.to_string(),
            breed: breed.to_string(),
            birth_time: now,
            happiness: 50,
            energy: 50,
            skills: Vec::new(),
            level: 1,
            last_update_time: now,
            last_active_time: now,
            dead: false,
            in_community: false,
            messages: VecDeque::new(),
            schema_version: PUPPY_SCHEMA_VERSION,
        }
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn in_pool(mut self) -> Self {
        self.in_community = true;
        self
    }

    /// True when `owner` holds this puppy personally (not merely remembered from the pool).
    pub fn is_held_by(&self, owner: &str) -> bool {
        !self.in_community && self.owner.as_deref() == Some(owner)
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Append a skill unless already known. Returns whether it was new.
    pub fn learn_skill(&mut self, skill: &str) -> bool {
        if self.has_skill(skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    /// Push onto the bounded message log, dropping the oldest entries past `cap`.
    pub fn push_message(&mut self, message: impl Into<String>, cap: usize) {
        self.messages.push_back(message.into());
        while self.messages.len() > cap {
            self.messages.pop_front();
        }
    }

    pub fn touch(&mut self, now: i64) {
        self.last_active_time = now;
    }
}

/// Which puppy an interaction is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The puppy held by this owner id
    Personal(String),
    /// Whichever living pool puppy has been neglected longest
    Pool,
    /// A specific puppy in the pool
    PoolMember(String),
}

impl Target {
    pub fn is_pool(&self) -> bool {
        !matches!(self, Target::Personal(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Feed,
    Play,
    Train,
    Talk,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Feed => "feed",
            ActionKind::Play => "play",
            ActionKind::Train => "train",
            ActionKind::Talk => "talk",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = KennelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feed" => Ok(ActionKind::Feed),
            "play" => Ok(ActionKind::Play),
            "train" => Ok(ActionKind::Train),
            "talk" => Ok(ActionKind::Talk),
            other => Err(KennelError::UnknownAction(other.to_string())),
        }
    }
}

/// A single request against a puppy. Talk optionally carries chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Feed,
    Play,
    Train,
    Talk { text: Option<String> },
}

impl Action {
    /// Build an action from its keyword. `text` is only kept for talk.
    pub fn parse(kind: &str, text: Option<String>) -> Result<Self, KennelError> {
        Ok(match kind.parse::<ActionKind>()? {
            ActionKind::Feed => Action::Feed,
            ActionKind::Play => Action::Play,
            ActionKind::Train => Action::Train,
            ActionKind::Talk => Action::Talk { text },
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Feed => ActionKind::Feed,
            Action::Play => ActionKind::Play,
            Action::Train => ActionKind::Train,
            Action::Talk { .. } => ActionKind::Talk,
        }
    }
}

/// Result of resolving one action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub puppy: PuppyRecord,
    pub message: String,
    /// True when a precondition failed and nothing changed
    pub blocked: bool,
    /// Skills granted by this action (tricks or hidden skills)
    pub new_skills: Vec<String>,
}

impl ActionOutcome {
    pub fn blocked(puppy: &PuppyRecord, message: impl Into<String>) -> Self {
        Self {
            puppy: puppy.clone(),
            message: message.into(),
            blocked: true,
            new_skills: Vec::new(),
        }
    }

    pub fn applied(puppy: &PuppyRecord, message: impl Into<String>, new_skills: Vec<String>) -> Self {
        Self {
            puppy: puppy.clone(),
            message: message.into(),
            blocked: false,
            new_skills,
        }
    }
}

/// Compact listing row for pool and reclaim views.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PuppySummary {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub happiness: u32,
    pub energy: u32,
    pub skills: usize,
    pub level: u32,
    pub dead: bool,
    pub last_active_time: i64,
}

/// What a personal or pool lookup produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "puppy", rename_all = "snake_case")]
pub enum PuppyView {
    Puppy(PuppyRecord),
    /// Owner has nothing held but a pool puppy remembers them
    NeedsReclaim(PuppySummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Shared,
    Adopted,
    Reclaimed,
    Fed,
    Played,
    Trained,
    Talked,
    SkillDiscovered,
}

impl ActivityKind {
    pub fn for_action(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Feed => ActivityKind::Fed,
            ActionKind::Play => ActivityKind::Played,
            ActionKind::Train => ActivityKind::Trained,
            ActionKind::Talk => ActivityKind::Talked,
        }
    }
}

/// Entry in the capped community activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    pub kind: ActivityKind,
    pub puppy_id: String,
    pub puppy_name: String,
    pub user_name: String,
    pub details: String,
    pub timestamp: i64,
}

impl ActivityRecord {
    pub fn new(kind: ActivityKind, puppy: &PuppyRecord, user: Option<&str>, details: &str, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            kind,
            puppy_id: puppy.id.clone(),
            puppy_name: puppy.name.clone(),
            user_name: user.unwrap_or("Anonymous").to_string(),
            details: details.to_string(),
            timestamp: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityKind {
    View,
    Interaction,
    Adoption,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopularityRecord {
    pub views: u64,
    pub interactions: u64,
    pub adoptions: u64,
    pub updated_at: i64,
}

impl PopularityRecord {
    pub fn bump(&mut self, kind: PopularityKind, now: i64) {
        match kind {
            PopularityKind::View => self.views = self.views.saturating_add(1),
            PopularityKind::Interaction => self.interactions = self.interactions.saturating_add(1),
            PopularityKind::Adoption => self.adoptions = self.adoptions.saturating_add(1),
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_stat_clamps_both_ends() {
        assert_eq!(adjust_stat(95, 20), 100);
        assert_eq!(adjust_stat(3, -10), 0);
        assert_eq!(adjust_stat(50, 5), 55);
    }

    #[test]
    fn learn_skill_rejects_duplicates() {
        let mut puppy = PuppyRecord::new("Rex", "labrador", 0);
        assert!(puppy.learn_skill("Sit"));
        assert!(!puppy.learn_skill("Sit"));
        assert_eq!(puppy.skills, vec!["Sit".to_string()]);
    }

    #[test]
    fn message_log_drops_oldest() {
        let mut puppy = PuppyRecord::new("Rex", "labrador", 0);
        for i in 0..25 {
            puppy.push_message(format!("msg {}", i), 20);
        }
        assert_eq!(puppy.messages.len(), 20);
        assert_eq!(puppy.messages.front().map(String::as_str), Some("msg 5"));
        assert_eq!(puppy.messages.back().map(String::as_str), Some("msg 24"));
    }

    #[test]
    fn action_parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(Action::parse("FEED", None).unwrap(), Action::Feed);
        assert_eq!(
            Action::parse("Talk", Some("hi".into())).unwrap(),
            Action::Talk { text: Some("hi".into()) }
        );
        assert!(matches!(
            Action::parse("dance", None),
            Err(KennelError::UnknownAction(_))
        ));
    }

    #[test]
    fn held_versus_remembered_owner() {
        let held = PuppyRecord::new("Rex", "labrador", 0).with_owner("alice");
        assert!(held.is_held_by("alice"));
        let pooled = held.clone().in_pool();
        assert!(!pooled.is_held_by("alice"));
    }
}
