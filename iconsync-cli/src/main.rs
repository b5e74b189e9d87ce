//! iconsync: mirror an icon page of a Figma file into a local directory.
//!
//! # Usage
//!
//! ```text
//! iconsync sync [--dry-run] [--json]
//! iconsync pages [--json]
//! iconsync status [--json]
//! ```
//!
//! Remote settings come from flags, then `FILE_ID` / `FIGMA_TOKEN` /
//! `ICONSYNC_PAGE`, then `iconsync.yaml`, then defaults.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{pages::PagesArgs, status::StatusArgs, sync::SyncArgs};
use iconsync_core::{ConfigLayer, Settings};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "iconsync",
    version,
    about = "Sync vector icons from a Figma page into a local directory",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the icon page and reconcile the local directory and manifest.
    Sync(SyncArgs),

    /// List the top-level pages of the Figma file.
    Pages(PagesArgs),

    /// Compare the latest manifest with the icons directory (no network).
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Shared configuration flags
// ---------------------------------------------------------------------------

/// Settings flags shared by every subcommand. Each overrides `iconsync.yaml`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Path to a YAML config file (default: ./iconsync.yaml if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Figma file key.
    #[arg(long, global = true, env = "FILE_ID")]
    pub file_id: Option<String>,

    /// Figma personal access token.
    #[arg(long, global = true, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name of the page holding the icons (default: Icons).
    #[arg(long, global = true, env = "ICONSYNC_PAGE")]
    pub page: Option<String>,

    /// Directory the SVG files are mirrored into.
    #[arg(long, global = true, value_name = "DIR")]
    pub icons_dir: Option<PathBuf>,

    /// Latest manifest path.
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Version anchor path.
    #[arg(long, global = true, value_name = "PATH")]
    pub version_file: Option<PathBuf>,

    /// Maximum parallel downloads.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Figma API base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ConfigArgs {
    /// Merge flags over the config file.
    pub fn layer(&self) -> Result<ConfigLayer> {
        let file = match &self.config {
            Some(path) => ConfigLayer::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?,
            None => {
                let cwd = std::env::current_dir().context("could not determine working directory")?;
                ConfigLayer::discover_at(&cwd)?.unwrap_or_default()
            }
        };
        let cli = ConfigLayer {
            file_id: self.file_id.clone(),
            token: self.token.clone(),
            page_name: self.page.clone(),
            icons_dir: self.icons_dir.clone(),
            manifest_path: self.manifest.clone(),
            version_path: self.version_file.clone(),
            concurrency: self.concurrency,
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout,
        };
        Ok(cli.or(file))
    }

    /// Settings for commands that talk to Figma.
    pub fn remote_settings(&self) -> Result<Settings> {
        Settings::resolve(self.layer()?).context("incomplete configuration")
    }

    /// Settings for local-only commands.
    pub fn local_settings(&self) -> Result<Settings> {
        Settings::resolve_local(self.layer()?).context("invalid configuration")
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(&cli.config),
        Commands::Pages(args) => args.run(&cli.config),
        Commands::Status(args) => args.run(&cli.config),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
