//! `iconsync sync`: mirror the icon page into the local directory.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use iconsync_sync::{pipeline, AssetWrite, ChangeKind, LocalFs, SyncReport};

use crate::ConfigArgs;

/// Arguments for `iconsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Show what would be written and deleted without touching any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self, config: &ConfigArgs) -> Result<()> {
        let settings = config.remote_settings()?;
        tracing::debug!("resolved settings: {settings:?}");

        let client = super::client(&settings);
        let report = pipeline::run(&client, &settings, &LocalFs, self.dry_run, Utc::now())
            .with_context(|| format!("sync failed for page '{}'", settings.remote.page_name))?;

        if self.json {
            print_json(&report)
        } else {
            print_results(&report);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct SyncReportJson<'a> {
    page: &'a str,
    dry_run: bool,
    version: &'a str,
    previous_version: Option<&'a str>,
    collected: usize,
    added: usize,
    updated: usize,
    unchanged: usize,
    removed: usize,
    skipped: usize,
    writes: &'a [AssetWrite],
    deleted: &'a [String],
    warnings: Vec<String>,
}

fn print_json(report: &SyncReport) -> Result<()> {
    let payload = SyncReportJson {
        page: &report.page_name,
        dry_run: report.dry_run(),
        version: &report.manifest.version,
        previous_version: report.previous_version.as_deref(),
        collected: report.collected,
        added: report.apply.added(),
        updated: report.apply.updated(),
        unchanged: report.apply.unchanged(),
        removed: report.apply.removed(),
        skipped: report.skipped(),
        writes: &report.apply.writes,
        deleted: &report.apply.deleted,
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize sync JSON")?
    );
    Ok(())
}

fn print_results(report: &SyncReport) {
    let prefix = if report.dry_run() { "[dry-run] " } else { "" };
    let version = match &report.previous_version {
        Some(previous) => format!("{previous} → {}", report.manifest.version),
        None => report.manifest.version.clone(),
    };

    println!(
        "{prefix}✓ '{}' synced as {} ({} added, {} updated, {} unchanged, {} removed, {} skipped)",
        report.page_name,
        version.bold(),
        report.apply.added(),
        report.apply.updated(),
        report.apply.unchanged(),
        report.apply.removed(),
        report.skipped(),
    );

    for write in &report.apply.writes {
        match write.kind {
            ChangeKind::Added => println!("  {}  {}", "+".green(), write.file_name),
            ChangeKind::Updated => println!("  {}  {}", "✎".yellow(), write.file_name),
            ChangeKind::Unchanged => println!("  {}  {}", "·".bright_black(), write.file_name),
        }
    }
    for name in &report.apply.deleted {
        println!("  {}  {}", "-".red(), name);
    }

    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}
