//! Domain types for an icon sync run.
//!
//! [`RemoteNode`], [`ExportableNode`] and [`AssetRecord`] live for one run only.
//! [`Manifest`] is the persisted record read back by the next run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File extension of every managed asset in the icons directory.
pub const ASSET_EXTENSION: &str = "svg";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a node in the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote document tree
// ---------------------------------------------------------------------------

/// The `type` discriminator of a remote node.
///
/// Anything that is not a document, page or exportable component is
/// [`NodeKind::Other`] (frames, groups, vectors, text ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    Component,
    Instance,
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// `true` for the kinds that are exported as icons.
    pub fn is_exportable(self) -> bool {
        matches!(self, NodeKind::Component | NodeKind::Instance)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Document => write!(f, "DOCUMENT"),
            NodeKind::Canvas => write!(f, "CANVAS"),
            NodeKind::Component => write!(f, "COMPONENT"),
            NodeKind::Instance => write!(f, "INSTANCE"),
            NodeKind::Other => write!(f, "OTHER"),
        }
    }
}

/// A node of the remote document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<RemoteNode>,
}

impl RemoteNode {
    /// Direct children that are pages (canvases).
    pub fn pages(&self) -> impl Iterator<Item = &RemoteNode> {
        self.children.iter().filter(|c| c.kind == NodeKind::Canvas)
    }
}

/// Envelope returned by the document endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: String,
    pub document: RemoteNode,
}

/// A component or instance flattened out of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportableNode {
    pub id: NodeId,
    pub name: String,
}

impl From<&RemoteNode> for ExportableNode {
    fn from(node: &RemoteNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assets and manifest
// ---------------------------------------------------------------------------

/// A downloaded asset keyed by its sanitized, run-unique identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub identifier: String,
    pub source_name: String,
    pub content: Vec<u8>,
}

impl AssetRecord {
    /// `<identifier>.svg`
    pub fn file_name(&self) -> String {
        format!("{}.{ASSET_EXTENSION}", self.identifier)
    }
}

/// Persisted description of the icon set.
///
/// Written twice per run: the latest manifest for downstream tooling and the
/// version anchor read back by the next run. Both copies are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub icons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
