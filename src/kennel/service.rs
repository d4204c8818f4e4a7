//! Kennel service: resolves targets against the store and drives the engine.
//!
//! Each call is one read-modify-write against the [`PuppyStore`]; the service
//! holds no state besides its collaborators.

use log::{debug, info, warn};

use crate::config::{EngineConfig, KennelConfig};
use crate::kennel::actions::apply_action;
use crate::kennel::breeds::{BreedCatalog, BreedModifier};
use crate::kennel::decay::{derive_age, evaluate, refresh_level};
use crate::kennel::errors::KennelError;
use crate::kennel::pool::{most_neglected, synthesize_pool_puppy};
use crate::kennel::random::{RandomSource, ThreadRandom};
use crate::kennel::storage::PuppyStore;
use crate::kennel::types::{
    Action, ActionOutcome, ActivityKind, ActivityRecord, PopularityKind, PopularityRecord,
    PuppyRecord, PuppySummary, PuppyView, Target,
};
use crate::logutil::escape_log;
use crate::validation::{sanitize_chat_text, validate_puppy_name};

pub struct Kennel<S: PuppyStore, R: RandomSource = ThreadRandom> {
    store: S,
    settings: KennelConfig,
    rules: EngineConfig,
    catalog: BreedCatalog,
    rng: R,
}

impl<S: PuppyStore> Kennel<S, ThreadRandom> {
    pub fn new(store: S, settings: KennelConfig, rules: EngineConfig) -> Self {
        Self::with_random(store, settings, rules, ThreadRandom)
    }
}

impl<S: PuppyStore, R: RandomSource> Kennel<S, R> {
    pub fn with_random(store: S, settings: KennelConfig, rules: EngineConfig, rng: R) -> Self {
        Self {
            store,
            settings,
            rules,
            catalog: BreedCatalog::standard(),
            rng,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rules(&self) -> &EngineConfig {
        &self.rules
    }

    pub fn catalog(&self) -> &BreedCatalog {
        &self.catalog
    }

    pub fn breeds(&self) -> &[BreedModifier] {
        self.catalog.all()
    }

    /// Look at a puppy. Personal views auto-create a default puppy for new
    /// owners, or report a reclaimable pool puppy instead.
    pub fn view(&mut self, target: &Target, now: i64) -> Result<PuppyView, KennelError> {
        match target {
            Target::Personal(owner) => {
                if let Some(puppy) = self.store.find_held_by(owner)? {
                    return Ok(PuppyView::Puppy(self.refresh(puppy, now)?));
                }
                if let Some(mut remembered) = self.store.find_pooled_by(owner)? {
                    self.evaluate(&mut remembered, now);
                    debug!(
                        "owner {} has puppy {} waiting in the pool",
                        escape_log(owner),
                        remembered.id
                    );
                    return Ok(PuppyView::NeedsReclaim(self.summary(&remembered, now)));
                }
                let settings = &self.settings;
                let puppy = self.adopt_new(
                    owner,
                    &settings.default_puppy_name,
                    Some(settings.default_breed.as_str()),
                    now,
                )?;
                Ok(PuppyView::Puppy(puppy))
            }
            Target::Pool | Target::PoolMember(_) => {
                let puppy = self.resolve_pool_target(target, now)?;
                let puppy = self.refresh(puppy, now)?;
                self.store
                    .bump_popularity(&puppy.id, PopularityKind::View, now)?;
                Ok(PuppyView::Puppy(puppy))
            }
        }
    }

    /// Create a named puppy for an owner who holds none.
    pub fn create(
        &mut self,
        owner: &str,
        name: &str,
        breed: Option<&str>,
        now: i64,
    ) -> Result<PuppyRecord, KennelError> {
        let name = validate_puppy_name(name).map_err(|e| {
            warn!("rejected puppy name \"{}\": {}", escape_log(name), e);
            KennelError::from(e)
        })?;
        self.ensure_empty_handed(owner)?;
        let breed = breed.unwrap_or(self.settings.default_breed.as_str());
        self.adopt_new(owner, &name, Some(breed), now)
    }

    fn adopt_new(
        &self,
        owner: &str,
        name: &str,
        breed: Option<&str>,
        now: i64,
    ) -> Result<PuppyRecord, KennelError> {
        let breed = self.catalog.lookup(self.catalog.resolve_id(breed));
        let mut puppy = PuppyRecord::new(name, breed.id, now).with_owner(owner);
        puppy.push_message(
            format!(
                "🐶 Meet {}, your new {}! {}",
                puppy.name, breed.name, breed.description
            ),
            self.rules.message_log_cap,
        );
        self.store.put_puppy(puppy.clone())?;
        info!(
            "owner {} welcomed {} \"{}\" ({})",
            escape_log(owner),
            breed.id,
            escape_log(&puppy.name),
            puppy.id
        );
        Ok(puppy)
    }

    /// Apply one action. Pool interactions are counted and logged to the community feed.
    pub fn act(
        &mut self,
        target: &Target,
        action: Action,
        actor: Option<&str>,
        now: i64,
    ) -> Result<ActionOutcome, KennelError> {
        let mut puppy = match target {
            Target::Personal(owner) => self.store.find_held_by(owner)?.ok_or_else(|| {
                warn!(
                    "owner {} tried to {} without a puppy",
                    escape_log(owner),
                    action.kind()
                );
                KennelError::NotFound(format!("no puppy held by {}", owner))
            })?,
            _ => self.resolve_pool_target(target, now)?,
        };

        let action = match action {
            Action::Talk { text } => Action::Talk {
                text: text
                    .map(|t| sanitize_chat_text(&t))
                    .filter(|t| !t.is_empty()),
            },
            other => other,
        };

        let outcome = apply_action(
            &mut puppy,
            &action,
            &self.catalog,
            &self.rules,
            &mut self.rng,
            now,
        );
        self.store.put_puppy(puppy)?;

        if target.is_pool() && !outcome.blocked {
            let pup = &outcome.puppy;
            self.store
                .bump_popularity(&pup.id, PopularityKind::Interaction, now)?;
            self.log_activity(
                ActivityKind::for_action(action.kind()),
                pup,
                actor,
                &outcome.message,
                now,
            )?;
            for skill in &outcome.new_skills {
                self.log_activity(ActivityKind::SkillDiscovered, pup, actor, skill, now)?;
            }
        }
        Ok(outcome)
    }

    /// Move the owner's puppy into the pool. The owner is remembered for reclaim.
    pub fn share(&mut self, owner: &str, now: i64) -> Result<PuppyRecord, KennelError> {
        let Some(mut puppy) = self.store.find_held_by(owner)? else {
            warn!("owner {} has no puppy to share", escape_log(owner));
            return Err(KennelError::NotFound(format!("no puppy held by {}", owner)));
        };
        self.evaluate(&mut puppy, now);
        puppy.in_community = true;
        puppy.touch(now);
        puppy.push_message(
            format!("🏘️ {} joined the community pool", puppy.name),
            self.rules.message_log_cap,
        );
        self.store.put_puppy(puppy.clone())?;
        self.log_activity(ActivityKind::Shared, &puppy, Some(owner), "shared with the community", now)?;
        info!("owner {} shared puppy {}", escape_log(owner), puppy.id);
        Ok(puppy)
    }

    /// Take a specific pool puppy home.
    pub fn adopt(&mut self, owner: &str, puppy_id: &str, now: i64) -> Result<PuppyRecord, KennelError> {
        self.ensure_empty_handed(owner)?;
        let puppy = self.load_pool_member(puppy_id)?;
        let puppy = self.take_home(owner, puppy, ActivityKind::Adopted, now)?;
        self.store
            .bump_popularity(&puppy.id, PopularityKind::Adoption, now)?;
        Ok(puppy)
    }

    /// Take back the pool puppy that remembers this owner.
    pub fn reclaim(&mut self, owner: &str, now: i64) -> Result<PuppyRecord, KennelError> {
        self.ensure_empty_handed(owner)?;
        let Some(puppy) = self.store.find_pooled_by(owner)? else {
            warn!("owner {} has nothing to reclaim", escape_log(owner));
            return Err(KennelError::NotFound(format!(
                "no pool puppy remembers {}",
                owner
            )));
        };
        self.take_home(owner, puppy, ActivityKind::Reclaimed, now)
    }

    /// Pool listing, most neglected first.
    pub fn community(&mut self, now: i64) -> Result<Vec<PuppySummary>, KennelError> {
        let mut pool = self.evaluated_pool(now)?;
        pool.sort_by_key(|p| p.last_active_time);
        Ok(pool.iter().map(|p| self.summary(p, now)).collect())
    }

    /// The most neglected living pool puppy, synthesizing one if none is alive.
    pub fn select_pool_puppy(&mut self, now: i64) -> Result<PuppyRecord, KennelError> {
        let pool = self.evaluated_pool(now)?;
        if let Some(puppy) = most_neglected(&pool) {
            return Ok(puppy.clone());
        }
        let breed = self.catalog.resolve_id(Some(self.settings.default_breed.as_str()));
        let puppy = synthesize_pool_puppy(&self.settings.pool_puppy_name, breed, now);
        self.store.put_puppy(puppy.clone())?;
        info!("pool had no living puppies; added {}", puppy.id);
        Ok(puppy)
    }

    pub fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityRecord>, KennelError> {
        self.store.recent_activity(limit)
    }

    pub fn popularity(&self, puppy_id: &str) -> Result<PopularityRecord, KennelError> {
        self.store.get_popularity(puppy_id)
    }

    pub fn summary(&self, puppy: &PuppyRecord, now: i64) -> PuppySummary {
        PuppySummary {
            id: puppy.id.clone(),
            name: puppy.name.clone(),
            breed: self.catalog.lookup(&puppy.breed).name.to_string(),
            age: derive_age(puppy, now, &self.rules),
            happiness: puppy.happiness,
            energy: puppy.energy,
            skills: puppy.skills.len(),
            level: puppy.level,
            dead: puppy.dead,
            last_active_time: puppy.last_active_time,
        }
    }

    fn evaluate(&self, puppy: &mut PuppyRecord, now: i64) -> bool {
        let breed = self.catalog.lookup(&puppy.breed);
        let report = evaluate(puppy, now, &self.rules, breed);
        report.ticks > 0 || report.died || report.revived
    }

    /// Decay, level refresh and activity stamp, persisted.
    fn refresh(&self, mut puppy: PuppyRecord, now: i64) -> Result<PuppyRecord, KennelError> {
        self.evaluate(&mut puppy, now);
        refresh_level(&mut puppy);
        puppy.touch(now);
        self.store.put_puppy(puppy.clone())?;
        Ok(puppy)
    }

    fn evaluated_pool(&self, now: i64) -> Result<Vec<PuppyRecord>, KennelError> {
        let mut pool = self.store.list_pool()?;
        for puppy in pool.iter_mut() {
            if self.evaluate(puppy, now) {
                self.store.put_puppy(puppy.clone())?;
            }
        }
        Ok(pool)
    }

    fn resolve_pool_target(&mut self, target: &Target, now: i64) -> Result<PuppyRecord, KennelError> {
        match target {
            Target::PoolMember(id) => self.load_pool_member(id),
            Target::Pool => self.select_pool_puppy(now),
            Target::Personal(owner) => Err(KennelError::Internal(format!(
                "personal target {} passed as pool target",
                owner
            ))),
        }
    }

    fn load_pool_member(&self, puppy_id: &str) -> Result<PuppyRecord, KennelError> {
        let puppy = self.store.get_puppy(puppy_id)?;
        if !puppy.in_community {
            warn!("puppy {} is not in the pool", escape_log(puppy_id));
            return Err(KennelError::NotFound(format!("pool puppy: {}", puppy_id)));
        }
        Ok(puppy)
    }

    fn ensure_empty_handed(&self, owner: &str) -> Result<(), KennelError> {
        if let Some(held) = self.store.find_held_by(owner)? {
            warn!("owner {} already holds puppy {}", escape_log(owner), held.id);
            return Err(KennelError::AlreadyHolding(owner.to_string()));
        }
        Ok(())
    }

    fn take_home(
        &mut self,
        owner: &str,
        mut puppy: PuppyRecord,
        kind: ActivityKind,
        now: i64,
    ) -> Result<PuppyRecord, KennelError> {
        self.evaluate(&mut puppy, now);
        puppy.owner = Some(owner.to_string());
        puppy.in_community = false;
        puppy.touch(now);
        puppy.push_message(
            format!("🏠 {} went home with a new friend!", puppy.name),
            self.rules.message_log_cap,
        );
        self.store.put_puppy(puppy.clone())?;
        let details = match kind {
            ActivityKind::Reclaimed => "came back home",
            _ => "adopted from the community",
        };
        self.log_activity(kind, &puppy, Some(owner), details, now)?;
        info!(
            "owner {} took puppy {} home ({:?})",
            escape_log(owner),
            puppy.id,
            kind
        );
        Ok(puppy)
    }

    fn log_activity(
        &self,
        kind: ActivityKind,
        puppy: &PuppyRecord,
        user: Option<&str>,
        details: &str,
        now: i64,
    ) -> Result<(), KennelError> {
        let entry = ActivityRecord::new(kind, puppy, user, details, now);
        let evicted = self
            .store
            .append_activity(entry, self.rules.activity_log_cap)?;
        if evicted > 0 {
            debug!("activity log trimmed {} old entries", evicted);
        }
        Ok(())
    }
}
