//! Remote snapshot builder: fetch → collect → export → download.
//!
//! Only the document fetch, page lookup and export-URL request can fail the
//! build. A node without an export URL or with a failed download becomes a
//! [`SyncWarning`] and is left out of the snapshot.

use std::collections::HashSet;
use std::thread;

use iconsync_core::{AssetRecord, ExportableNode, IconSource, NodeId, RemoteError, SyncConfig};

use crate::collect::collect;
use crate::sanitize::IdentifierAllocator;
use crate::{SyncError, SyncWarning};

/// Everything one fetch cycle produced, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Unique by `identifier`.
    pub records: Vec<AssetRecord>,
    pub warnings: Vec<SyncWarning>,
    /// Number of exportable nodes found on the page, including skipped ones.
    pub collected: usize,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.identifier.as_str())
    }
}

/// A collected node with its run-unique identifier.
#[derive(Debug)]
struct Planned {
    node: ExportableNode,
    identifier: String,
}

/// Builds a [`Snapshot`] from an [`IconSource`].
pub struct SnapshotBuilder<'a, S: IconSource + ?Sized> {
    source: &'a S,
    config: SyncConfig,
    concurrency: usize,
}

impl<'a, S: IconSource + ?Sized> SnapshotBuilder<'a, S> {
    pub fn new(source: &'a S, config: SyncConfig) -> Self {
        Self {
            source,
            config,
            concurrency: 1,
        }
    }

    /// Maximum number of parallel downloads (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn build(&self) -> Result<Snapshot, SyncError> {
        let root = self.source.fetch_document(&self.config)?;
        let page_names: Vec<&str> = root.pages().map(|p| p.name.as_str()).collect();
        tracing::info!("available pages: {}", page_names.join(", "));

        let nodes = collect(&root, &self.config.page_name)?;
        tracing::info!(
            "found {} exportable node(s) on page '{}'",
            nodes.len(),
            self.config.page_name
        );

        let mut snapshot = Snapshot {
            collected: nodes.len(),
            ..Snapshot::default()
        };
        if nodes.is_empty() {
            return Ok(snapshot);
        }

        let planned = assign_identifiers(nodes, &mut snapshot.warnings);

        let ids: Vec<NodeId> = planned.iter().map(|p| p.node.id.clone()).collect();
        let urls = self.source.request_export_urls(&self.config, &dedup(ids))?;

        let mut jobs = Vec::with_capacity(planned.len());
        for (index, plan) in planned.iter().enumerate() {
            match urls.get(&plan.node.id) {
                Some(url) => jobs.push((index, url.as_str())),
                None => record(
                    &mut snapshot.warnings,
                    SyncWarning::MissingExportUrl {
                        id: plan.node.id.clone(),
                        name: plan.node.name.clone(),
                    },
                ),
            }
        }

        let downloads = self.download_all(&jobs, &planned);
        for ((index, _), result) in jobs.iter().zip(downloads) {
            let plan = &planned[*index];
            match result {
                Ok(content) => snapshot.records.push(AssetRecord {
                    identifier: plan.identifier.clone(),
                    source_name: plan.node.name.clone(),
                    content,
                }),
                Err(err) => record(
                    &mut snapshot.warnings,
                    SyncWarning::DownloadFailed {
                        id: plan.node.id.clone(),
                        name: plan.node.name.clone(),
                        message: err.to_string(),
                    },
                ),
            }
        }

        Ok(snapshot)
    }

    /// Download every job; results come back in job order.
    fn download_all(
        &self,
        jobs: &[(usize, &str)],
        planned: &[Planned],
    ) -> Vec<Result<Vec<u8>, RemoteError>> {
        let fetch = |(index, url): &(usize, &str)| {
            tracing::debug!("downloading: {}", planned[*index].node.name);
            self.source.download_content(url)
        };

        if self.concurrency == 1 || jobs.len() <= 1 {
            return jobs.iter().map(fetch).collect();
        }

        let chunk_size = jobs.len().div_ceil(self.concurrency);
        thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || chunk.iter().map(fetch).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

fn assign_identifiers(nodes: Vec<ExportableNode>, warnings: &mut Vec<SyncWarning>) -> Vec<Planned> {
    let mut allocator = IdentifierAllocator::new();
    nodes
        .into_iter()
        .map(|node| {
            let allocation = allocator.allocate(&node.name);
            if allocation.was_empty {
                record(
                    warnings,
                    SyncWarning::EmptyName {
                        id: node.id.clone(),
                        name: node.name.clone(),
                    },
                );
            }
            if let Some((base, first)) = allocation.collided_with {
                record(
                    warnings,
                    SyncWarning::NameCollision {
                        identifier: base,
                        first,
                        second: node.name.clone(),
                        assigned: allocation.identifier.clone(),
                    },
                );
            }
            Planned {
                node,
                identifier: allocation.identifier,
            }
        })
        .collect()
}

fn dedup(ids: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

fn record(warnings: &mut Vec<SyncWarning>, warning: SyncWarning) {
    tracing::warn!("{warning}");
    warnings.push(warning);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
