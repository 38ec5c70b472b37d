use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestyleError {
    #[error("Invalid pattern in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Rule set is empty")]
    EmptyRuleSet,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} resolves outside the root directory")]
    OutsideRoot { path: PathBuf },

    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("Rules are not idempotent on {path}: second pass changed text via {}", .rules.join(", "))]
    NotIdempotent { path: PathBuf, rules: Vec<String> },
}

impl RestyleError {
    /// Configuration errors abort a run before any file is touched.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RestyleError::InvalidPattern { .. }
                | RestyleError::EmptyPattern(_)
                | RestyleError::RootNotFound(_)
                | RestyleError::EmptyRuleSet
                | RestyleError::UnknownPreset(_)
                | RestyleError::InvalidGlob(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RestyleError>;
