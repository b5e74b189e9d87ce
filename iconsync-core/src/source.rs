//! The remote collaborator consumed by the snapshot builder.

use std::collections::HashMap;

use crate::config::SyncConfig;
use crate::error::RemoteError;
use crate::types::{NodeId, RemoteNode};

/// Access to the remote design document and its image export service.
///
/// Implementations perform no retries; retry policy belongs to the caller.
/// `Sync` is required because downloads are fanned out across threads.
pub trait IconSource: Send + Sync {
    /// Fetch the full document tree rooted at the document node.
    fn fetch_document(&self, config: &SyncConfig) -> Result<RemoteNode, RemoteError>;

    /// Resolve export URLs for `ids` in one batched request.
    ///
    /// Ids the service could not render are absent from the returned map.
    fn request_export_urls(
        &self,
        config: &SyncConfig,
        ids: &[NodeId],
    ) -> Result<HashMap<NodeId, String>, RemoteError>;

    /// Download the bytes behind an export URL.
    fn download_content(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}
