//! Policy-specific error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating, or resolving a policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Policy file could not be read.
    #[error("failed to read policy file {path}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Policy file could not be written.
    #[error("failed to write policy file {path}")]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// YAML input did not match the descriptor shape.
    #[error("failed to parse policy: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON input did not match the descriptor shape.
    #[error("failed to parse policy: {0}")]
    Json(#[from] serde_json::Error),

    /// Policy file has an extension no parser is registered for.
    #[error("unsupported policy file extension: {path} (expected .yaml, .yml, or .json)")]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },

    /// `extends` references a base rule set that is not registered.
    #[error("unknown base rule set `{0}`")]
    UnknownBase(String),

    /// A token-set value lists the same token twice.
    #[error("rule `{rule}` lists duplicate token `{token}`")]
    DuplicateToken {
        /// Rule whose value carries the duplicate.
        rule: String,
        /// The repeated token.
        token: String,
    },

    /// A rule value does not match the kind the rule expects.
    #[error("rule `{rule}` expects {expected}, got {got}")]
    ValueMismatch {
        /// Rule whose value is malformed.
        rule: String,
        /// Value kind the rule accepts.
        expected: &'static str,
        /// Value kind actually supplied.
        got: &'static str,
    },

    /// A custom ignore pattern failed to compile.
    #[error("ignore pattern `{pattern}` is invalid")]
    BadIgnorePattern {
        /// The pattern as written in the policy file.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// No policy file was found during discovery.
    #[error("no policy file found (searched {searched} and its ancestors)")]
    NotFound {
        /// Directory the search started from.
        searched: PathBuf,
    },
}

// Note: anyhow already has a blanket impl for thiserror::Error types
