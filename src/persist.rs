//! Loading and saving the flat record list.
//!
//! The base list is read-only input, either a plain JSON array or an
//! exported `const familyMembers = [...];` snippet. Edits go to a separate
//! JSON file that shadows the base list until it is reset.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};
use vanshavali_types::PersonRecord;

use crate::error::{LineageError, Result};

/// Where the engine gets its records from and where edits go.
pub trait RecordSource {
    fn load(&self) -> Result<Vec<PersonRecord>>;
    fn save(&self, records: &[PersonRecord]) -> Result<()>;
    /// Drop saved edits and return to the base data.
    fn reset(&self) -> Result<()>;
}

// ── Snippet format ───────────────────────────────────────────────────

const SNIPPET_BINDING: &str = "familyMembers";

/// `const name = <body>;` with optional `export` and trailing semicolon.
static RE_SNIPPET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:export\s+)?(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=\s*(.*?)\s*;?$")
        .expect("snippet regex")
});

/// Parse a JSON array or an exported snippet into records.
pub fn parse_records(text: &str) -> Result<Vec<PersonRecord>> {
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    let body = RE_SNIPPET
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            LineageError::Snippet("expected a JSON array or `const name = [...];`".to_string())
        })?;
    if !body.starts_with('[') {
        return Err(LineageError::Snippet(
            "assigned value is not an array".to_string(),
        ));
    }
    Ok(serde_json::from_str(body)?)
}

/// Render records as a script snippet that defines `familyMembers`.
///
/// Two-space pretty JSON, absent optional fields omitted, the root's
/// `parentId` written as `null`. Records keep their given order.
///
/// An input record that spelled out `"nameEn": null` or `"birthYear": null`
/// comes back without those keys, so re-exporting such a file is not
/// byte-identical to it.
pub fn export_snippet(records: &[PersonRecord]) -> Result<String> {
    let json = serde_json::to_string_pretty(records)?;
    Ok(format!("const {SNIPPET_BINDING} = {json};"))
}

// ── File store ───────────────────────────────────────────────────────

/// Base data file plus an edits file that overrides it once written.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
    edits: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>, edits: impl Into<PathBuf>) -> Self {
        FileStore {
            base: base.into(),
            edits: edits.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base
    }

    pub fn edits_path(&self) -> &Path {
        &self.edits
    }

    pub fn has_edits(&self) -> bool {
        self.edits.is_file()
    }

    fn read(path: &Path) -> Result<Vec<PersonRecord>> {
        let text = fs::read_to_string(path)?;
        parse_records(&text)
    }
}

impl RecordSource for FileStore {
    fn load(&self) -> Result<Vec<PersonRecord>> {
        if self.has_edits() {
            match Self::read(&self.edits) {
                Ok(records) => {
                    info!(path = %self.edits.display(), members = records.len(), "loaded saved edits");
                    return Ok(records);
                }
                Err(e) => {
                    warn!(path = %self.edits.display(), error = %e, "saved edits unreadable, using base data");
                }
            }
        }
        let records = Self::read(&self.base)?;
        info!(path = %self.base.display(), members = records.len(), "loaded base data");
        Ok(records)
    }

    fn save(&self, records: &[PersonRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.edits, json)?;
        info!(path = %self.edits.display(), members = records.len(), "saved edits");
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.edits) {
            Ok(()) => {
                info!(path = %self.edits.display(), "discarded saved edits");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
