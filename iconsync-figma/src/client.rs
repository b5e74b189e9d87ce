//! Blocking Figma REST client.
//!
//! Endpoints used:
//!
//! ```text
//! GET {base}/v1/files/{file_id}                       -> Document
//! GET {base}/v1/images/{file_id}?ids=a,b&format=svg   -> ImagesResponse
//! GET {export url}                                    -> raw SVG bytes
//! ```
//!
//! No retries happen here; a failed call surfaces as a [`RemoteError`].

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use iconsync_core::{Document, IconSource, NodeId, RemoteError, RemoteNode, SyncConfig};

use crate::response::{ErrorBody, ImagesResponse};

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Upper bound on a single downloaded asset.
pub const MAX_ASSET_BYTES: u64 = 8 * 1024 * 1024;

/// HTTP client for the Figma file and image endpoints.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    agent: ureq::Agent,
    api_base: String,
}

impl FigmaClient {
    /// Build a client against `api_base` (e.g. `https://api.figma.com`).
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("iconsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/v1/files/{file_id}", self.api_base)
    }

    fn images_url(&self, file_id: &str) -> String {
        format!("{}/v1/images/{file_id}", self.api_base)
    }
}

impl IconSource for FigmaClient {
    fn fetch_document(&self, config: &SyncConfig) -> Result<RemoteNode, RemoteError> {
        let url = self.file_url(&config.file_id);
        tracing::debug!("GET {url}");
        let response = self
            .agent
            .get(&url)
            .set(TOKEN_HEADER, &config.token)
            .call()
            .map_err(|err| RemoteError::Fetch {
                file_id: config.file_id.clone(),
                message: describe(err),
            })?;
        let doc: Document = response.into_json().map_err(|err| RemoteError::Decode {
            endpoint: url.clone(),
            message: err.to_string(),
        })?;
        tracing::debug!("fetched document '{}'", doc.name);
        Ok(doc.document)
    }

    fn request_export_urls(
        &self,
        config: &SyncConfig,
        ids: &[NodeId],
    ) -> Result<HashMap<NodeId, String>, RemoteError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let url = self.images_url(&config.file_id);
        let joined = ids
            .iter()
            .map(|id| id.0.as_str())
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!("GET {url} ({} ids)", ids.len());
        let response = self
            .agent
            .get(&url)
            .set(TOKEN_HEADER, &config.token)
            .query("ids", &joined)
            .query("format", "svg")
            .call()
            .map_err(|err| RemoteError::Export {
                message: describe(err),
            })?;
        let body: ImagesResponse = response.into_json().map_err(|err| RemoteError::Decode {
            endpoint: url.clone(),
            message: err.to_string(),
        })?;
        body.into_urls()
    }

    fn download_content(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.agent.get(url).call().map_err(|err| RemoteError::Download {
            url: url.to_string(),
            message: describe(err),
        })?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ASSET_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|err| RemoteError::Download {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        if bytes.len() as u64 > MAX_ASSET_BYTES {
            return Err(RemoteError::Download {
                url: url.to_string(),
                message: format!("asset exceeds {MAX_ASSET_BYTES} bytes"),
            });
        }
        Ok(bytes)
    }
}

/// Render a ureq error, pulling Figma's `err` text out of error bodies.
fn describe(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let status_text = response.status_text().to_string();
            let detail = response
                .into_string()
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                .and_then(|body| body.text().map(str::to_string));
            match detail {
                Some(detail) => format!("HTTP {code} {status_text}: {detail}"),
                None => format!("HTTP {code} {status_text}"),
            }
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}
