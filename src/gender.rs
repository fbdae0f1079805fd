//! Gender inference from romanized first names.
//!
//! A closed, data-tuned heuristic: known female names, then male name
//! fragments that would otherwise look feminine, then a suffix rule. It is
//! not linguistically general. Names ending in "a" are ambiguous (Krishna
//! vs. Anvesha) and default to male unless listed. Callers can extend the
//! lists through config or swap in their own [`GenderClassifier`].

use serde::{Deserialize, Serialize};

use crate::index::IndexedPerson;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn is_female(self) -> bool {
        self == Gender::Female
    }
}

/// Anything that can decide the gender used for kinship terms.
pub trait GenderClassifier {
    fn classify(&self, person: &IndexedPerson) -> Gender;
}

// ── Default name tables ──────────────────────────────────────────────

/// First names known to be female in this family's records.
pub const KNOWN_FEMALE_NAMES: &[&str] = &[
    "anvesha", "hitaxi", "mahi", "manvi", "maya", "bindu", "neelu", "tara",
];

/// Fragments of male names; any romanized name containing one is male.
/// Checked after the female list, before the suffix rule.
pub const MALE_NAME_FRAGMENTS: &[&str] = &[
    "chandra", "krishna", "datt", "datta", "ballabh", "bhallabh", "prasad", "kumar", "lal",
    "ram", "nath", "bindeshwari",
];

/// An "a"-ending first name with this ending is not given the male default.
const FEMININE_A_ENDING: &str = "undra";

// ── Heuristic classifier ─────────────────────────────────────────────

/// Name-list classifier over a person's romanized name.
#[derive(Debug, Clone)]
pub struct NameHeuristic {
    female_names: Vec<String>,
    male_fragments: Vec<String>,
}

impl Default for NameHeuristic {
    fn default() -> Self {
        NameHeuristic {
            female_names: KNOWN_FEMALE_NAMES.iter().map(|s| s.to_string()).collect(),
            male_fragments: MALE_NAME_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NameHeuristic {
    /// Default tables plus caller-supplied entries (case-insensitive).
    pub fn with_extra(female_names: &[String], male_fragments: &[String]) -> Self {
        let mut h = NameHeuristic::default();
        h.female_names
            .extend(female_names.iter().map(|s| s.trim().to_lowercase()));
        h.male_fragments
            .extend(male_fragments.iter().map(|s| s.trim().to_lowercase()));
        h
    }

    /// Classify a romanized full name. An empty name is male.
    pub fn infer(&self, name_en: &str) -> Gender {
        let name = name_en.trim().to_lowercase();
        let first = name.split_whitespace().next().unwrap_or("");
        if first.is_empty() {
            return Gender::Male;
        }

        if self.female_names.iter().any(|f| f == first) {
            return Gender::Female;
        }
        if self.male_fragments.iter().any(|m| name.contains(m.as_str())) {
            return Gender::Male;
        }

        if first.ends_with('a') {
            return if first.ends_with(FEMININE_A_ENDING) {
                Gender::Female
            } else {
                Gender::Male
            };
        }
        if first.ends_with('i') || first.ends_with("ee") {
            return Gender::Female;
        }
        Gender::Male
    }
}

impl GenderClassifier for NameHeuristic {
    fn classify(&self, person: &IndexedPerson) -> Gender {
        self.infer(person.name_en_or_empty())
    }
}

/// Classify with the default tables.
pub fn infer_gender(person: &IndexedPerson) -> Gender {
    NameHeuristic::default().classify(person)
}
