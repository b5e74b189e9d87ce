//! Manifest versioner.
//!
//! Two identical JSON documents are persisted per run:
//!
//! - the **version anchor**, read back by the next run to compute its version;
//! - the **latest manifest**, consumed by downstream build tooling.
//!
//! Versions have the form `<major>.<minor>` with the minor zero-padded to two
//! digits. Every run bumps the minor by one. The minor does not roll into the
//! major: `1.99` is followed by `1.100`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use iconsync_core::Manifest;

use crate::fs::AssetFs;
use crate::{SyncError, SyncWarning};

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// A `<major>.<minor>` manifest version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Assumed when no usable previous version exists.
    pub const BASELINE: Version = Version { major: 1, minor: 0 };

    pub fn bump(self) -> Version {
        Version {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = String;

    /// Accepts `<digits>.<two or more digits>`; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("'{s}' has no '.' separator"))?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(major) || !all_digits(minor) || minor.len() < 2 {
            return Err(format!("'{s}' is not <major>.<2-digit minor>"));
        }
        Ok(Version {
            major: major.parse().map_err(|e| format!("major in '{s}': {e}"))?,
            minor: minor.parse().map_err(|e| format!("minor in '{s}': {e}"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Anchor loading
// ---------------------------------------------------------------------------

/// What the version anchor held at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// No anchor file.
    Absent,
    /// A JSON object with a `version` string.
    Record { path: PathBuf, version: String },
    /// The file exists but could not be read or has no `version` string.
    Unreadable { path: PathBuf, detail: String },
}

/// The only part of the anchor that matters for versioning. Other fields
/// (`generated_at`, `icons`) are ignored so they cannot invalidate it.
#[derive(Debug, Deserialize)]
struct AnchorRecord {
    version: String,
}

/// Read the version anchor. Never fails: a missing file is
/// [`Anchor::Absent`], anything else that does not yield a version is
/// [`Anchor::Unreadable`].
pub fn load_anchor(fs: &dyn AssetFs, path: &Path) -> Anchor {
    let unreadable = |detail: String| Anchor::Unreadable {
        path: path.to_path_buf(),
        detail,
    };
    let bytes = match fs.read(path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Anchor::Absent,
        Err(err) => return unreadable(err.to_string()),
    };
    match serde_json::from_slice::<AnchorRecord>(&bytes) {
        Ok(record) => Anchor::Record {
            path: path.to_path_buf(),
            version: record.version,
        },
        Err(err) => unreadable(err.to_string()),
    }
}

/// Read the latest manifest; `None` if it does not exist.
pub fn load_latest(fs: &dyn AssetFs, path: &Path) -> Result<Option<Manifest>, SyncError> {
    let Some(bytes) = fs.read(path)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| SyncError::Manifest {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Next manifest
// ---------------------------------------------------------------------------

/// Result of [`next_manifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub manifest: Manifest,
    /// The version parsed from the anchor, if any.
    pub previous: Option<Version>,
    pub warning: Option<SyncWarning>,
}

/// Compute the manifest for this run. Never fails: an unusable anchor falls
/// back to [`Version::BASELINE`] and yields a warning.
pub fn next_manifest(anchor: &Anchor, icons: Vec<String>, now: DateTime<Utc>) -> Versioned {
    let (previous, warning) = match anchor {
        Anchor::Absent => (None, None),
        Anchor::Record { path, version } => match version.parse::<Version>() {
            Ok(version) => (Some(version), None),
            Err(detail) => (
                None,
                Some(SyncWarning::CorruptVersion {
                    path: path.clone(),
                    detail,
                }),
            ),
        },
        Anchor::Unreadable { path, detail } => (
            None,
            Some(SyncWarning::CorruptVersion {
                path: path.clone(),
                detail: detail.clone(),
            }),
        ),
    };

    let version = previous.unwrap_or(Version::BASELINE).bump();
    Versioned {
        manifest: Manifest {
            version: version.to_string(),
            generated_at: now,
            icons,
        },
        previous,
        warning,
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Write `manifest` to the anchor, then to the latest path.
///
/// Anchor first: if the second write fails, the next run bumps past this
/// version instead of reissuing it.
pub fn persist(
    fs: &dyn AssetFs,
    manifest: &Manifest,
    latest_path: &Path,
    anchor_path: &Path,
) -> Result<(), SyncError> {
    let mut json = serde_json::to_vec_pretty(manifest)?;
    json.push(b'\n');
    for path in [anchor_path, latest_path] {
        fs.write(path, &json)?;
        tracing::info!("manifest {} written to {}", manifest.version, path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
