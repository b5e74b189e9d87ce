//! Error types for iconsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use iconsync_core::RemoteError;

/// Fatal errors that abort a sync run.
///
/// Per-node problems are not errors; they are reported as
/// [`crate::SyncWarning`]s.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The target page is not a top-level page of the document.
    #[error("page '{page}' not found; available pages: {}", list_or_none(.available))]
    PageNotFound {
        page: String,
        available: Vec<String>,
    },

    /// Document fetch or export-URL request failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest serialization error.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The latest manifest exists but is not valid JSON.
    #[error("failed to parse manifest at {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
