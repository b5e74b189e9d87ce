//! Local drift check between the latest manifest and the icons directory.
//!
//! Signal precedence:
//! 1. `NeverSynced` (no latest manifest)
//! 2. `Missing` (manifest lists files that are not on disk)
//! 3. `Untracked` (asset files on disk that the manifest does not list)
//! 4. `Current`
//!
//! No network access; this only reads local state.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use iconsync_core::{Manifest, Settings};

use crate::fs::{list_assets, AssetFs};
use crate::{manifest, SyncError};

/// Drift classification for the icons directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSignal {
    NeverSynced,
    Current,
    Missing { files: Vec<String> },
    Untracked { files: Vec<String> },
}

/// Result of [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub signal: StatusSignal,
    pub manifest: Option<Manifest>,
    /// Asset files currently in the icons directory.
    pub on_disk: usize,
}

pub fn check(fs: &dyn AssetFs, settings: &Settings) -> Result<StatusReport, SyncError> {
    let on_disk = list_assets(fs, &settings.icons_dir)?;
    let Some(manifest) = manifest::load_latest(fs, &settings.manifest_path)? else {
        return Ok(StatusReport {
            signal: StatusSignal::NeverSynced,
            manifest: None,
            on_disk: on_disk.len(),
        });
    };

    let listed: BTreeSet<&str> = manifest.icons.iter().map(String::as_str).collect();
    let missing: Vec<String> = listed
        .iter()
        .filter(|name| !on_disk.contains(**name))
        .map(|name| name.to_string())
        .collect();
    let untracked: Vec<String> = on_disk
        .iter()
        .filter(|name| !listed.contains(name.as_str()))
        .cloned()
        .collect();

    let signal = if !missing.is_empty() {
        StatusSignal::Missing { files: missing }
    } else if !untracked.is_empty() {
        StatusSignal::Untracked { files: untracked }
    } else {
        StatusSignal::Current
    };

    Ok(StatusReport {
        signal,
        on_disk: on_disk.len(),
        manifest: Some(manifest),
    })
}

/// Format age from a chrono timestamp (manifest `generated_at`).
pub fn format_datetime_age(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let age = now.signed_duration_since(timestamp).num_seconds().max(0) as u64;
    format_seconds(age)
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use iconsync_core::ConfigLayer;
    use tempfile::TempDir;

    use crate::fs::LocalFs;

    fn settings(root: &Path) -> Settings {
        Settings::resolve_local(ConfigLayer {
            icons_dir: Some(root.join("icons")),
            manifest_path: Some(root.join("icons.json")),
            version_path: Some(root.join("icons.version.json")),
            ..ConfigLayer::default()
        })
        .expect("settings")
    }

    fn write_manifest(settings: &Settings, icons: &[&str]) {
        let m = Manifest {
            version: "1.03".to_string(),
            generated_at: Utc::now(),
            icons: icons.iter().map(|s| s.to_string()).collect(),
        };
        manifest::persist(&LocalFs, &m, &settings.manifest_path, &settings.version_path).unwrap();
    }

    fn write_icons(settings: &Settings, names: &[&str]) {
        fs::create_dir_all(&settings.icons_dir).unwrap();
        for name in names {
            fs::write(settings.icons_dir.join(name), "<svg/>").unwrap();
        }
    }

    #[test]
    fn never_synced_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        write_icons(&settings, &["a.svg"]);
        let report = check(&LocalFs, &settings).unwrap();
        assert_eq!(report.signal, StatusSignal::NeverSynced);
        assert_eq!(report.on_disk, 1);
    }

    #[test]
    fn current_when_manifest_matches() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        write_icons(&settings, &["a.svg", "b.svg"]);
        write_manifest(&settings, &["a.svg", "b.svg"]);
        let report = check(&LocalFs, &settings).unwrap();
        assert_eq!(report.signal, StatusSignal::Current);
        assert_eq!(report.manifest.unwrap().version, "1.03");
    }

    #[test]
    fn missing_takes_precedence_over_untracked() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        write_icons(&settings, &["a.svg", "extra.svg"]);
        write_manifest(&settings, &["a.svg", "b.svg"]);
        let report = check(&LocalFs, &settings).unwrap();
        assert_eq!(
            report.signal,
            StatusSignal::Missing {
                files: vec!["b.svg".to_string()]
            }
        );
    }

    #[test]
    fn untracked_svg_reported() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        write_icons(&settings, &["a.svg", "extra.svg", "README.md"]);
        write_manifest(&settings, &["a.svg"]);
        let report = check(&LocalFs, &settings).unwrap();
        assert_eq!(
            report.signal,
            StatusSignal::Untracked {
                files: vec!["extra.svg".to_string()]
            }
        );
    }

    #[test]
    fn age_formatting() {
        assert_eq!(format_seconds(5), "5s");
        assert_eq!(format_seconds(120), "2m");
        assert_eq!(format_seconds(7200), "2h");
        assert_eq!(format_seconds(3 * 86_400), "3d");
    }
}
