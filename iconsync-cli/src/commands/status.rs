//! `iconsync status`: drift between the latest manifest and the icons directory.

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use iconsync_sync::{
    status::{check, format_datetime_age},
    LocalFs, StatusReport, StatusSignal,
};

use crate::ConfigArgs;

/// Arguments for `iconsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, config: &ConfigArgs) -> Result<()> {
        let settings = config.local_settings()?;
        let report = check(&LocalFs, &settings).with_context(|| {
            format!(
                "status check failed for '{}'",
                settings.icons_dir.display()
            )
        })?;

        if self.json {
            return print_json(&report);
        }
        print_table(&report, &settings.icons_dir.display().to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson<'a> {
    status: &'static str,
    version: Option<&'a str>,
    generated_at: Option<String>,
    last_sync_age: String,
    listed: usize,
    on_disk: usize,
    files: &'a [String],
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "directory")]
    directory: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "last sync")]
    last_sync: String,
    #[tabled(rename = "icons")]
    icons: String,
}

fn print_json(report: &StatusReport) -> Result<()> {
    let payload = StatusJson {
        status: signal_key(&report.signal),
        version: report.manifest.as_ref().map(|m| m.version.as_str()),
        generated_at: report.manifest.as_ref().map(|m| m.generated_at.to_rfc3339()),
        last_sync_age: last_sync_age(report),
        listed: report.manifest.as_ref().map_or(0, |m| m.icons.len()),
        on_disk: report.on_disk,
        files: signal_files(&report.signal),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &StatusReport, directory: &str) {
    let listed = report.manifest.as_ref().map_or(0, |m| m.icons.len());
    let row = StatusRow {
        directory: directory.to_string(),
        status: signal_label(&report.signal).to_string(),
        version: report
            .manifest
            .as_ref()
            .map_or_else(|| "-".to_string(), |m| m.version.clone()),
        last_sync: last_sync_age(report),
        icons: format!("{listed} listed / {} on disk", report.on_disk),
    };
    let mut table = Table::new([row]);
    table.with(Style::rounded());
    println!("{table}");

    for file in signal_files(&report.signal) {
        println!("  {}  {file}", signal_indicator(&report.signal));
    }

    if !matches!(report.signal, StatusSignal::Current) {
        println!("Run 'iconsync sync' to bring the directory up to date.");
    }
}

fn last_sync_age(report: &StatusReport) -> String {
    report
        .manifest
        .as_ref()
        .map_or_else(|| "never".to_string(), |m| format_datetime_age(m.generated_at))
}

fn signal_files(signal: &StatusSignal) -> &[String] {
    match signal {
        StatusSignal::Missing { files } | StatusSignal::Untracked { files } => files,
        StatusSignal::NeverSynced | StatusSignal::Current => &[],
    }
}

fn signal_key(signal: &StatusSignal) -> &'static str {
    match signal {
        StatusSignal::NeverSynced => "never_synced",
        StatusSignal::Current => "current",
        StatusSignal::Missing { .. } => "missing",
        StatusSignal::Untracked { .. } => "untracked",
    }
}

fn signal_label(signal: &StatusSignal) -> ColoredString {
    match signal {
        StatusSignal::NeverSynced => "NEVER SYNCED".bright_black(),
        StatusSignal::Current => "CURRENT".green(),
        StatusSignal::Missing { .. } => "MISSING".red(),
        StatusSignal::Untracked { .. } => "UNTRACKED".yellow(),
    }
}

fn signal_indicator(signal: &StatusSignal) -> ColoredString {
    match signal {
        StatusSignal::Missing { .. } => "-".red(),
        StatusSignal::Untracked { .. } => "?".yellow(),
        StatusSignal::NeverSynced | StatusSignal::Current => "·".normal(),
    }
}
