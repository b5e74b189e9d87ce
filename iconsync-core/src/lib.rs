//! iconsync core library: domain types, collaborator traits, configuration.
//!
//! Public API surface:
//! - [`types`]: node tree, asset records, manifest
//! - [`source`]: the [`IconSource`] collaborator trait
//! - [`config`]: [`SyncConfig`], [`Settings`], config-file layering
//! - [`error`]: [`ConfigError`], [`RemoteError`]

pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::{ConfigLayer, Settings, SyncConfig};
pub use error::{ConfigError, RemoteError};
pub use source::IconSource;
pub use types::{
    AssetRecord, Document, ExportableNode, Manifest, NodeId, NodeKind, RemoteNode,
    ASSET_EXTENSION,
};
