//! # iconsync-sync
//!
//! Reconciliation engine: turns a remote icon page into a local directory of
//! SVG files plus a versioned manifest.
//!
//! ```text
//! SnapshotBuilder::build ──► reconcile ──► apply ──► manifest::persist
//!   (fetch, collect,          (pure diff)   (writes,    (anchor, then
//!    export, download)                       then       latest)
//!                                            deletes)
//! ```
//!
//! Call [`pipeline::run`] for a complete run, or [`status::check`] for a
//! local-only comparison of the manifest against the icons directory.

pub mod collect;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod pipeline;
pub mod reconcile;
pub mod sanitize;
pub mod snapshot;
pub mod status;
pub mod warning;

pub use error::SyncError;
pub use fs::{AssetFs, LocalFs};
pub use pipeline::{run, SyncReport};
pub use reconcile::{ApplyReport, AssetWrite, ChangeKind, ChangeSet};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use status::{StatusReport, StatusSignal};
pub use warning::SyncWarning;
