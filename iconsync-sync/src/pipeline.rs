//! Sync pipeline entrypoint used by the CLI.
//!
//! Order of observable effects:
//!
//! 1. Remote snapshot is built completely (fatal errors stop here, nothing on
//!    disk has changed).
//! 2. Version anchor is read.
//! 3. Asset writes, then deletes.
//! 4. Manifest persisted (anchor, then latest).
//!
//! A failure in step 3 or 4 leaves the previous manifest in place. Re-running
//! converges because every step is idempotent.

use chrono::{DateTime, Utc};
use serde::Serialize;

use iconsync_core::{IconSource, Manifest, Settings, SyncConfig};

use crate::fs::{list_assets, AssetFs};
use crate::manifest::{self, Version};
use crate::reconcile::{apply, reconcile, ApplyReport};
use crate::snapshot::SnapshotBuilder;
use crate::{SyncError, SyncWarning};

/// Outcome of a full sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub page_name: String,
    /// Exportable nodes found on the page.
    pub collected: usize,
    pub apply: ApplyReport,
    /// The manifest persisted by this run (or that would be, in dry-run).
    pub manifest: Manifest,
    pub previous_version: Option<String>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncReport {
    pub fn dry_run(&self) -> bool {
        self.apply.dry_run
    }

    /// Nodes that were collected but are not in the result.
    pub fn skipped(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_skip()).count()
    }
}

/// Run a full sync: snapshot, reconcile, apply, version.
pub fn run(
    source: &dyn IconSource,
    settings: &Settings,
    fs: &dyn AssetFs,
    dry_run: bool,
    now: DateTime<Utc>,
) -> Result<SyncReport, SyncError> {
    let snapshot = SnapshotBuilder::new(source, settings.remote.clone())
        .with_concurrency(settings.concurrency)
        .build()?;

    let anchor = manifest::load_anchor(fs, &settings.version_path);
    let current = list_assets(fs, &settings.icons_dir)?;

    let changes = reconcile(&snapshot, &current);
    tracing::info!(
        "{} asset(s) to write, {} to delete",
        changes.to_write.len(),
        changes.to_delete.len()
    );
    let applied = apply(&changes, fs, &settings.icons_dir, dry_run)?;

    let versioned = manifest::next_manifest(&anchor, changes.final_filenames.clone(), now);
    let mut warnings = snapshot.warnings.clone();
    if let Some(warning) = versioned.warning {
        tracing::warn!("{warning}");
        warnings.push(warning);
    }

    if dry_run {
        tracing::info!(
            "[dry-run] would write manifest {} to {}",
            versioned.manifest.version,
            settings.manifest_path.display()
        );
    } else {
        manifest::persist(
            fs,
            &versioned.manifest,
            &settings.manifest_path,
            &settings.version_path,
        )?;
    }

    Ok(SyncReport {
        page_name: settings.remote.page_name.clone(),
        collected: snapshot.collected,
        apply: applied,
        manifest: versioned.manifest,
        previous_version: versioned.previous.map(|v: Version| v.to_string()),
        warnings,
    })
}

/// A top-level page of the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub name: String,
    pub kind: String,
    pub children: usize,
}

/// Fetch the document and list its top-level children.
pub fn list_pages(source: &dyn IconSource, config: &SyncConfig) -> Result<Vec<PageInfo>, SyncError> {
    let root = source.fetch_document(config)?;
    Ok(root
        .children
        .iter()
        .map(|child| PageInfo {
            name: child.name.clone(),
            kind: child.kind.to_string(),
            children: child.children.len(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
