//! Error types for the migration core.
//!
//! Each pipeline stage has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type. Every variant is fatal to a run; nothing is logged and skipped.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors from reading provider export files.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened (missing, permissions, ...).
    #[error("failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not the expected JSON.
    #[error("failed to decode JSON in '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Credential errors
// ---------------------------------------------------------------------------

/// Errors from decoding a provider password credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// `secretData` is present but is not the expected JSON object.
    #[error("secret data: {0}")]
    SecretData(#[source] serde_json::Error),

    /// `credentialData` is present but is not the expected JSON object.
    #[error("credential data: {0}")]
    CredentialData(#[source] serde_json::Error),

    /// The hashing algorithm is not one of the supported PBKDF2 variants.
    #[error("unsupported password algorithm: {0:?}")]
    UnsupportedAlgorithm(String),
}

// ---------------------------------------------------------------------------
// Normalization errors
// ---------------------------------------------------------------------------

/// Errors from mapping provider records onto canonical users.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The password credential of a user could not be decoded.
    #[error("create users[{index}] ID {user_id:?}: {source}")]
    Credential {
        index: usize,
        user_id: String,
        #[source]
        source: CredentialError,
    },
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors from encoding or writing the import document.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The document could not be encoded as JSON.
    #[error("failed to encode import data: {0}")]
    Encode(#[from] serde_json::Error),

    /// The destination file could not be written.
    #[error("failed to write import data to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// A duration string could not be parsed.
    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    /// Generic I/O error reading or writing the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
