//! Error types for iconsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required setting was not supplied by any layer.
    #[error("missing required setting `{field}` (set {hint})")]
    Missing {
        field: &'static str,
        hint: &'static str,
    },

    /// A setting was supplied but is out of range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures reported by an [`crate::IconSource`] implementation.
///
/// `Fetch` and `Export` abort a sync run; `Download` is recorded per node.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Document fetch failed (transport error or non-success status).
    #[error("failed to fetch document '{file_id}': {message}")]
    Fetch { file_id: String, message: String },

    /// The batched export-URL request failed outright.
    #[error("failed to request export URLs: {message}")]
    Export { message: String },

    /// A single asset download failed.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// A response body could not be decoded.
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}
