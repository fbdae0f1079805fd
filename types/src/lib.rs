use serde::{Deserialize, Serialize};

/// Identifier of a family member. `0` never names a real person: records
/// carrying it are treated as malformed and skipped.
pub type PersonId = u32;

// ── Flat person record ───────────────────────────────────────────────────

/// One family member as stored on disk and exchanged with a UI layer.
///
/// Field names follow the external record format (`nameEn`, `birthYear`,
/// `parentId`). `parentId` is always written, as `null` for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default)]
    pub id: PersonId,
    /// Name in native (Devanagari) script.
    pub name: String,
    /// Romanized name, used for English matching and gender inference.
    #[serde(
        rename = "nameEn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name_en: Option<String>,
    #[serde(
        rename = "birthYear",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<i32>,
    /// Lineage depth, root = 1.
    #[serde(default = "first_generation")]
    pub generation: u32,
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<PersonId>,
}

fn first_generation() -> u32 {
    1
}

impl PersonRecord {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Romanized name, or the empty string when none was recorded.
    pub fn name_en_or_empty(&self) -> &str {
        self.name_en.as_deref().unwrap_or("")
    }
}
