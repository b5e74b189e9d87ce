//! `iconsync pages`: list the top-level pages of the Figma file.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use iconsync_sync::pipeline::{list_pages, PageInfo};

use crate::ConfigArgs;

/// Arguments for `iconsync pages`.
#[derive(Args, Debug)]
pub struct PagesArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "page")]
    name: String,
    #[tabled(rename = "type")]
    kind: String,
    #[tabled(rename = "children")]
    children: usize,
    #[tabled(rename = "selected")]
    selected: String,
}

impl PagesArgs {
    pub fn run(self, config: &ConfigArgs) -> Result<()> {
        let settings = config.remote_settings()?;
        let client = super::client(&settings);
        let pages = list_pages(&client, &settings.remote).with_context(|| {
            format!("failed to fetch pages of file '{}'", settings.remote.file_id)
        })?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&pages).context("failed to serialize pages JSON")?
            );
            return Ok(());
        }

        print_table(pages, &settings.remote.page_name);
        Ok(())
    }
}

fn print_table(pages: Vec<PageInfo>, selected: &str) {
    if pages.is_empty() {
        println!("The document has no pages.");
        return;
    }
    let rows: Vec<PageRow> = pages
        .into_iter()
        .map(|page| PageRow {
            selected: (if page.name == selected { "✓" } else { "" }).to_string(),
            name: page.name,
            kind: page.kind,
            children: page.children,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
