//! Per-item problems that do not abort a run.

use std::fmt;
use std::path::PathBuf;

use iconsync_core::NodeId;

/// A recoverable or structural problem recorded during a run.
///
/// Every warning is logged when it is recorded and returned in the
/// [`crate::SyncReport`] so callers can summarise skipped items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// The export service returned no URL for this node.
    MissingExportUrl { id: NodeId, name: String },

    /// The node had a URL but its download failed.
    DownloadFailed {
        id: NodeId,
        name: String,
        message: String,
    },

    /// Two source names sanitized to the same identifier; the later one was
    /// given a numeric suffix.
    NameCollision {
        identifier: String,
        first: String,
        second: String,
        assigned: String,
    },

    /// The source name sanitized to nothing and was given a placeholder.
    EmptyName { id: NodeId, name: String },

    /// The version anchor could not be read; the baseline version was used.
    CorruptVersion { path: PathBuf, detail: String },
}

impl SyncWarning {
    /// `true` for warnings that mean an icon is absent from the result.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            SyncWarning::MissingExportUrl { .. } | SyncWarning::DownloadFailed { .. }
        )
    }
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::MissingExportUrl { id, name } => {
                write!(f, "no export URL for '{name}' ({id}); skipped")
            }
            SyncWarning::DownloadFailed { id, name, message } => {
                write!(f, "download failed for '{name}' ({id}): {message}; skipped")
            }
            SyncWarning::NameCollision {
                identifier,
                first,
                second,
                assigned,
            } => write!(
                f,
                "'{second}' and '{first}' both sanitize to '{identifier}'; '{second}' saved as '{assigned}'"
            ),
            SyncWarning::EmptyName { id, name } => {
                write!(f, "name '{name}' ({id}) has no usable characters")
            }
            SyncWarning::CorruptVersion { path, detail } => write!(
                f,
                "unreadable version record at {}: {detail}; using baseline",
                path.display()
            ),
        }
    }
}
