//! Wire shapes of Figma API responses that are not core domain types.

use std::collections::HashMap;

use serde::Deserialize;

use iconsync_core::{NodeId, RemoteError};

/// Body of `GET /v1/images/:file_id`.
///
/// Ids the service failed to render map to `null`.
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: HashMap<NodeId, Option<String>>,
}

impl ImagesResponse {
    /// Drop `null` entries; a populated `err` fails the whole batch.
    pub fn into_urls(self) -> Result<HashMap<NodeId, String>, RemoteError> {
        if let Some(message) = self.err.filter(|m| !m.is_empty()) {
            return Err(RemoteError::Export { message });
        }
        Ok(self
            .images
            .into_iter()
            .filter_map(|(id, url)| url.filter(|u| !u.is_empty()).map(|u| (id, u)))
            .collect())
    }
}

/// Error body Figma returns with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.err.as_deref().or(self.message.as_deref())
    }
}
