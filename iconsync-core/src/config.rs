//! Run configuration.
//!
//! # Layering
//!
//! Settings come from up to three [`ConfigLayer`]s, highest precedence first:
//!
//! ```text
//! CLI flags / environment   (built by the binary, clap resolves env vars)
//! iconsync.yaml             (optional; relative paths resolve against its directory)
//! defaults                  (see Settings::DEFAULT_*)
//! ```
//!
//! Library code never reads the process environment; it receives a resolved
//! [`Settings`] or [`SyncConfig`].

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "iconsync.yaml";

// ---------------------------------------------------------------------------
// SyncConfig
// ---------------------------------------------------------------------------

/// Remote coordinates handed to the snapshot builder at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub file_id: String,
    pub token: String,
    pub page_name: String,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("file_id", &self.file_id)
            .field("token", &"<redacted>")
            .field("page_name", &self.page_name)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ConfigLayer
// ---------------------------------------------------------------------------

/// One partial source of settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub file_id: Option<String>,
    pub token: Option<String>,
    pub page_name: Option<String>,
    pub icons_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub version_path: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Parse a YAML config file. Relative paths inside it are resolved
    /// against the file's parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut layer: ConfigLayer =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            layer.rebase(base);
        }
        Ok(layer)
    }

    /// Load `<dir>/iconsync.yaml` if present.
    pub fn discover_at(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        match std::fs::metadata(&path) {
            Ok(_) => Self::load(&path).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Fill every unset field of `self` from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            file_id: self.file_id.or(lower.file_id),
            token: self.token.or(lower.token),
            page_name: self.page_name.or(lower.page_name),
            icons_dir: self.icons_dir.or(lower.icons_dir),
            manifest_path: self.manifest_path.or(lower.manifest_path),
            version_path: self.version_path.or(lower.version_path),
            concurrency: self.concurrency.or(lower.concurrency),
            api_base: self.api_base.or(lower.api_base),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
        }
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.icons_dir,
            &mut self.manifest_path,
            &mut self.version_path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub remote: SyncConfig,
    pub icons_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub version_path: PathBuf,
    pub concurrency: usize,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Settings {
    pub const DEFAULT_PAGE_NAME: &'static str = "Icons";
    pub const DEFAULT_ICONS_DIR: &'static str = "icons";
    pub const DEFAULT_MANIFEST_PATH: &'static str = "icons.json";
    pub const DEFAULT_VERSION_PATH: &'static str = "icons.version.json";
    pub const DEFAULT_CONCURRENCY: usize = 8;
    pub const DEFAULT_API_BASE: &'static str = "https://api.figma.com";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Resolve a merged layer into settings, applying defaults.
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let file_id = layer.file_id.filter(|s| !s.is_empty()).ok_or(ConfigError::Missing {
            field: "file_id",
            hint: "--file-id or FILE_ID",
        })?;
        let token = layer.token.filter(|s| !s.is_empty()).ok_or(ConfigError::Missing {
            field: "token",
            hint: "--token or FIGMA_TOKEN",
        })?;
        let settings = Self::resolve_local(ConfigLayer {
            file_id: Some(file_id),
            token: Some(token),
            ..layer
        })?;
        Ok(settings)
    }

    /// Resolve without requiring remote credentials.
    ///
    /// Used by local-only commands; `remote.file_id` / `remote.token` may be empty.
    pub fn resolve_local(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let concurrency = layer.concurrency.unwrap_or(Self::DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        let timeout_secs = layer.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Settings {
            remote: SyncConfig {
                file_id: layer.file_id.unwrap_or_default(),
                token: layer.token.unwrap_or_default(),
                page_name: layer
                    .page_name
                    .unwrap_or_else(|| Self::DEFAULT_PAGE_NAME.to_string()),
            },
            icons_dir: layer
                .icons_dir
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_ICONS_DIR)),
            manifest_path: layer
                .manifest_path
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_MANIFEST_PATH)),
            version_path: layer
                .version_path
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_VERSION_PATH)),
            concurrency,
            api_base: layer
                .api_base
                .unwrap_or_else(|| Self::DEFAULT_API_BASE.to_string()),
            timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
