//! Static breed catalog.
//!
//! Every breed is a bundle of optional modifiers; a missing modifier is neutral.
//! Lookups with an unknown id resolve to the catalog's default breed instead of
//! failing, so stale or hand-edited records stay playable.

use serde::Serialize;

pub const DEFAULT_BREED_ID: &str = "labrador";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedModifier {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub specialties: &'static [&'static str],
    /// Extra happiness gained when playing
    pub play_happiness_bonus: Option<u32>,
    /// Subtracted from the training failure probability
    pub training_bonus: Option<f64>,
    /// Fractional energy-cost reduction; negative values make activities costlier
    pub energy_efficiency: Option<f64>,
    /// Added to the hidden-skill discovery gate
    pub hidden_skill_bonus: Option<f64>,
    /// Subtracted from the training failure probability
    pub skill_learning_bonus: Option<f64>,
    /// Fractional slowdown of energy decay, strictly below 1
    pub hunger_decay_reduction: Option<f64>,
}

impl BreedModifier {
    const fn neutral(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        specialties: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            name,
            description,
            specialties,
            play_happiness_bonus: None,
            training_bonus: None,
            energy_efficiency: None,
            hidden_skill_bonus: None,
            skill_learning_bonus: None,
            hunger_decay_reduction: None,
        }
    }
}

const STANDARD_BREEDS: [BreedModifier; 10] = [
    BreedModifier {
        play_happiness_bonus: Some(5),
        ..BreedModifier::neutral(
            "welshcorgi",
            "Welsh Corgi",
            "Extra happiness from playing",
            &["happiness"],
        )
    },
    BreedModifier {
        training_bonus: Some(0.2),
        ..BreedModifier::neutral(
            "bordercollie",
            "Border Collie",
            "+20% training success rate",
            &["training"],
        )
    },
    BreedModifier {
        energy_efficiency: Some(0.3),
        ..BreedModifier::neutral(
            "sibhusky",
            "Siberian Husky",
            "Uses less energy for activities",
            &["energy"],
        )
    },
    BreedModifier {
        hidden_skill_bonus: Some(0.5),
        ..BreedModifier::neutral(
            "beagle",
            "Beagle",
            "Better at finding hidden skills",
            &["skills"],
        )
    },
    BreedModifier {
        skill_learning_bonus: Some(0.25),
        ..BreedModifier::neutral("poodle", "Poodle", "Learns skills faster", &["learning"])
    },
    BreedModifier {
        hunger_decay_reduction: Some(0.5),
        ..BreedModifier::neutral("shihtzu", "Shih Tzu", "Slower hunger decay", &["energy"])
    },
    BreedModifier {
        play_happiness_bonus: Some(3),
        energy_efficiency: Some(0.15),
        ..BreedModifier::neutral(
            "labrador",
            "Labrador",
            "Balanced and cheerful",
            &["happiness", "energy"],
        )
    },
    BreedModifier {
        training_bonus: Some(0.15),
        hunger_decay_reduction: Some(0.3),
        ..BreedModifier::neutral(
            "shiba",
            "Shiba Inu",
            "Independent and resilient",
            &["training"],
        )
    },
    BreedModifier {
        play_happiness_bonus: Some(7),
        energy_efficiency: Some(-0.2),
        ..BreedModifier::neutral(
            "chihuahua",
            "Chihuahua",
            "High energy but needs more care",
            &["happiness"],
        )
    },
    BreedModifier {
        play_happiness_bonus: Some(4),
        hunger_decay_reduction: Some(0.4),
        ..BreedModifier::neutral(
            "samoyed",
            "Samoyed",
            "Naturally happy and energetic",
            &["happiness", "energy"],
        )
    },
];

/// Immutable breed lookup table with a single default fallback entry.
#[derive(Debug, Clone)]
pub struct BreedCatalog {
    breeds: Vec<BreedModifier>,
    default_index: usize,
}

impl BreedCatalog {
    /// The ten built-in breeds, falling back to Labrador.
    pub fn standard() -> Self {
        let breeds = STANDARD_BREEDS.to_vec();
        let default_index = breeds
            .iter()
            .position(|b| b.id == DEFAULT_BREED_ID)
            .unwrap_or(0);
        Self {
            breeds,
            default_index,
        }
    }

    /// Build a catalog. Returns `None` when `default_id` is not among `breeds`.
    pub fn new(breeds: Vec<BreedModifier>, default_id: &str) -> Option<Self> {
        let default_index = breeds.iter().position(|b| b.id == default_id)?;
        Some(Self {
            breeds,
            default_index,
        })
    }

    /// Resolve a breed id, falling back to the default breed for unknown ids.
    pub fn lookup(&self, breed_id: &str) -> &BreedModifier {
        self.get(breed_id).unwrap_or_else(|| self.default_breed())
    }

    /// Exact lookup without fallback.
    pub fn get(&self, breed_id: &str) -> Option<&BreedModifier> {
        self.breeds.iter().find(|b| b.id == breed_id)
    }

    /// Canonical id to store for a requested breed (unknown ids map to the default).
    pub fn resolve_id(&self, breed_id: Option<&str>) -> &'static str {
        match breed_id {
            Some(id) => self.lookup(&id.trim().to_ascii_lowercase()).id,
            None => self.default_breed().id,
        }
    }

    pub fn default_breed(&self) -> &BreedModifier {
        &self.breeds[self.default_index]
    }

    pub fn all(&self) -> &[BreedModifier] {
        &self.breeds
    }
}

impl Default for BreedCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_breed_falls_back_to_default() {
        let catalog = BreedCatalog::standard();
        assert_eq!(catalog.lookup("dragon").id, DEFAULT_BREED_ID);
        assert_eq!(catalog.resolve_id(Some("Dragon")), DEFAULT_BREED_ID);
        assert_eq!(catalog.resolve_id(None), DEFAULT_BREED_ID);
    }

    #[test]
    fn resolve_id_normalizes_case() {
        let catalog = BreedCatalog::standard();
        assert_eq!(catalog.resolve_id(Some(" Beagle ")), "beagle");
    }

    #[test]
    fn decay_reductions_stay_below_one() {
        for breed in BreedCatalog::standard().all() {
            if let Some(r) = breed.hunger_decay_reduction {
                assert!(r < 1.0, "{} has reduction {}", breed.id, r);
            }
        }
    }

    #[test]
    fn catalog_requires_default_entry() {
        assert!(BreedCatalog::new(Vec::new(), "labrador").is_none());
    }
}
