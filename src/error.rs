//! Error types for the family tree engine.
//!
//! Only conditions that stop an operation live here. Recoverable data
//! defects (dangling parents, missing root, duplicate ids) are reported as
//! [`crate::tree::BuildDiagnostics`] instead, and lookups of unknown
//! people return `None`.

use std::process::ExitCode;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineageError {
    #[error("no family records to build a tree from")]
    EmptyInput,

    #[error("family tree is not indexed; reload the records first")]
    NotIndexed,

    #[error("no family member matches '{0}'")]
    UnknownPerson(String),

    #[error("cannot add member: {0}")]
    InvalidMember(String),

    #[error("malformed record snippet: {0}")]
    Snippet(String),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LineageError {
    /// Exit code for the CLI:
    /// - 1: IO / storage failure
    /// - 2: malformed data or config
    /// - 3: empty or unindexed tree
    /// - 4: bad user input
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io(_) => ExitCode::from(1),
            Self::Json(_) | Self::Snippet(_) | Self::Config(_) => ExitCode::from(2),
            Self::EmptyInput | Self::NotIndexed => ExitCode::from(3),
            Self::UnknownPerson(_) | Self::InvalidMember(_) => ExitCode::from(4),
        }
    }
}

pub type Result<T> = std::result::Result<T, LineageError>;
