//! Reconciler: pure diff of snapshot vs. directory, then a single apply step.
//!
//! [`reconcile`] touches nothing. [`apply`] performs every write before any
//! delete, so an interrupted run leaves a superset of the required assets.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Serialize;

use iconsync_core::AssetRecord;

use crate::fs::AssetFs;
use crate::snapshot::Snapshot;
use crate::SyncError;

/// How a written asset relates to what was on disk before the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// No file existed under this name.
    Added,
    /// A file existed with different bytes.
    Updated,
    /// A file existed with identical bytes (rewritten regardless).
    Unchanged,
}

/// Computed change set for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<'a> {
    /// Every record in the snapshot, in snapshot order.
    pub to_write: Vec<&'a AssetRecord>,
    /// Current asset files with no record in the snapshot, sorted.
    pub to_delete: Vec<String>,
    /// Manifest `icons` value: snapshot filenames in snapshot order.
    pub final_filenames: Vec<String>,
    /// Final filenames that already existed on disk.
    pub retained: BTreeSet<String>,
}

impl ChangeSet<'_> {
    pub fn is_noop_on_membership(&self) -> bool {
        self.to_delete.is_empty() && self.retained.len() == self.final_filenames.len()
    }
}

/// Diff `snapshot` against the asset filenames currently in the directory.
pub fn reconcile<'a>(snapshot: &'a Snapshot, current: &BTreeSet<String>) -> ChangeSet<'a> {
    let to_write: Vec<&AssetRecord> = snapshot.records.iter().collect();
    let final_filenames: Vec<String> = to_write.iter().map(|r| r.file_name()).collect();
    let wanted: HashSet<&str> = final_filenames.iter().map(String::as_str).collect();

    let to_delete = current
        .iter()
        .filter(|name| !wanted.contains(name.as_str()))
        .cloned()
        .collect();
    let retained = final_filenames
        .iter()
        .filter(|name| current.contains(*name))
        .cloned()
        .collect();

    ChangeSet {
        to_write,
        to_delete,
        final_filenames,
        retained,
    }
}

/// One asset write performed (or previewed) by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetWrite {
    pub file_name: String,
    pub kind: ChangeKind,
}

/// Outcome of [`apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub writes: Vec<AssetWrite>,
    pub deleted: Vec<String>,
    pub dry_run: bool,
}

impl ApplyReport {
    pub fn added(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    pub fn updated(&self) -> usize {
        self.count(ChangeKind::Updated)
    }

    pub fn unchanged(&self) -> usize {
        self.count(ChangeKind::Unchanged)
    }

    pub fn removed(&self) -> usize {
        self.deleted.len()
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.writes.iter().filter(|w| w.kind == kind).count()
    }
}

/// Apply `changes` under `dir`: all writes, then all deletes.
///
/// With `dry_run` nothing is written or deleted; the report still classifies
/// each write and lists the files that would be removed.
pub fn apply(
    changes: &ChangeSet<'_>,
    fs: &dyn AssetFs,
    dir: &Path,
    dry_run: bool,
) -> Result<ApplyReport, SyncError> {
    let mut report = ApplyReport {
        dry_run,
        ..ApplyReport::default()
    };

    if !dry_run {
        fs.ensure_dir(dir)?;
    }

    for record in &changes.to_write {
        let file_name = record.file_name();
        let path = dir.join(&file_name);
        let kind = if changes.retained.contains(&file_name) {
            match fs.read(&path)? {
                Some(existing) if existing == record.content => ChangeKind::Unchanged,
                Some(_) => ChangeKind::Updated,
                None => ChangeKind::Added,
            }
        } else {
            ChangeKind::Added
        };

        if dry_run {
            tracing::info!("[dry-run] would write: {}", path.display());
        } else {
            fs.write(&path, &record.content)?;
            tracing::info!("wrote: {}", path.display());
        }
        report.writes.push(AssetWrite { file_name, kind });
    }

    for file_name in &changes.to_delete {
        let path = dir.join(file_name);
        if dry_run {
            tracing::info!("[dry-run] would delete: {}", path.display());
        } else {
            fs.delete(&path)?;
            tracing::info!("deleted: {}", path.display());
        }
        report.deleted.push(file_name.clone());
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use crate::fs::{list_assets, LocalFs};

    fn record(identifier: &str, content: &str) -> AssetRecord {
        AssetRecord {
            identifier: identifier.to_string(),
            source_name: identifier.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    fn snapshot(records: Vec<AssetRecord>) -> Snapshot {
        Snapshot {
            collected: records.len(),
            records,
            warnings: vec![],
        }
    }

    fn files(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Wraps [`LocalFs`] and records every mutating call in order.
    #[derive(Default)]
    struct RecordingFs {
        ops: RefCell<Vec<String>>,
    }

    impl AssetFs for RecordingFs {
        fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError> {
            LocalFs.ensure_dir(dir)
        }
        fn list_dir(&self, dir: &Path) -> Result<BTreeSet<String>, SyncError> {
            LocalFs.list_dir(dir)
        }
        fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
            LocalFs.read(path)
        }
        fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
            self.ops.borrow_mut().push(format!("write {}", name_of(path)));
            LocalFs.write(path, bytes)
        }
        fn delete(&self, path: &Path) -> Result<(), SyncError> {
            self.ops.borrow_mut().push(format!("delete {}", name_of(path)));
            LocalFs.delete(path)
        }
    }

    fn name_of(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn scenario_write_two_delete_one() {
        let snap = snapshot(vec![record("icon-a", "A"), record("icon-b", "B")]);
        let changes = reconcile(&snap, &files(&["icon-a.svg", "icon-c.svg"]));

        let written: Vec<_> = changes.to_write.iter().map(|r| r.file_name()).collect();
        assert_eq!(written, vec!["icon-a.svg", "icon-b.svg"]);
        assert_eq!(changes.to_delete, vec!["icon-c.svg"]);
        assert_eq!(changes.final_filenames, vec!["icon-a.svg", "icon-b.svg"]);
        assert_eq!(changes.retained, files(&["icon-a.svg"]));
    }

    #[test]
    fn delete_iff_identifier_absent_from_snapshot() {
        let snap = snapshot(vec![record("keep", "k"), record("new", "n")]);
        let current = files(&["keep.svg", "gone.svg", "also-gone.svg"]);
        let changes = reconcile(&snap, &current);

        for name in &current {
            let in_snapshot = snap.get(name.trim_end_matches(".svg")).is_some();
            assert_eq!(
                changes.to_delete.contains(name),
                !in_snapshot,
                "wrong delete decision for {name}"
            );
        }
    }

    #[test]
    fn empty_snapshot_deletes_everything() {
        let snap = snapshot(vec![]);
        let changes = reconcile(&snap, &files(&["old-icon.svg"]));
        assert!(changes.to_write.is_empty());
        assert_eq!(changes.to_delete, vec!["old-icon.svg"]);
        assert!(changes.final_filenames.is_empty());
    }

    #[test]
    fn reconcile_is_idempotent_for_unchanged_snapshot() {
        let tmp = TempDir::new().unwrap();
        let snap = snapshot(vec![record("a", "1"), record("b", "2")]);

        let first = reconcile(&snap, &list_assets(&LocalFs, tmp.path()).unwrap());
        apply(&first, &LocalFs, tmp.path(), false).unwrap();

        let second = reconcile(&snap, &list_assets(&LocalFs, tmp.path()).unwrap());
        assert_eq!(second.to_write.len(), 2, "every asset is rewritten");
        assert!(second.to_delete.is_empty());
        assert_eq!(second.final_filenames, first.final_filenames);

        let report = apply(&second, &LocalFs, tmp.path(), false).unwrap();
        assert_eq!(report.unchanged(), 2);
        assert!(second.is_noop_on_membership());
    }

    #[test]
    fn apply_writes_before_deletes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("stale.svg"), "old").unwrap();
        let snap = snapshot(vec![record("a", "1"), record("b", "2")]);
        let changes = reconcile(&snap, &files(&["stale.svg"]));

        let recording = RecordingFs::default();
        apply(&changes, &recording, tmp.path(), false).unwrap();

        assert_eq!(
            *recording.ops.borrow(),
            vec!["write a.svg", "write b.svg", "delete stale.svg"]
        );
        assert!(!tmp.path().join("stale.svg").exists());
    }

    #[test]
    fn apply_classifies_writes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("same.svg"), "S").unwrap();
        fs::write(tmp.path().join("edited.svg"), "old").unwrap();
        let snap = snapshot(vec![
            record("same", "S"),
            record("edited", "new"),
            record("fresh", "F"),
        ]);
        let current = list_assets(&LocalFs, tmp.path()).unwrap();
        let report = apply(&reconcile(&snap, &current), &LocalFs, tmp.path(), false).unwrap();

        let kinds: Vec<_> = report.writes.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Unchanged, ChangeKind::Updated, ChangeKind::Added]
        );
        assert_eq!(fs::read_to_string(tmp.path().join("edited.svg")).unwrap(), "new");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let dir: PathBuf = tmp.path().join("icons");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("old.svg"), "o").unwrap();
        let snap = snapshot(vec![record("a", "1")]);
        let changes = reconcile(&snap, &files(&["old.svg"]));

        let recording = RecordingFs::default();
        let report = apply(&changes, &recording, &dir, true).unwrap();

        assert!(recording.ops.borrow().is_empty());
        assert!(report.dry_run);
        assert_eq!(report.added(), 1);
        assert_eq!(report.deleted, vec!["old.svg"]);
        assert!(dir.join("old.svg").exists());
        assert!(!dir.join("a.svg").exists());
    }
}
