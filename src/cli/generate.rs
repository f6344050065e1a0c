//! Batch page generation.
//!
//! Walks the full identity space of the catalog - every brand related to a
//! family, crossed with the family's products and the six keywords - and
//! materializes the pages that do not exist yet. Already-materialized
//! identities are skipped without counting against `--limit`, so an
//! interrupted run is resumed by simply invoking the command again.
//!
//! ```bash
//! pagegen generate                          # everything
//! pagegen generate --family home-appliances # one family
//! pagegen generate --limit 200              # bounded invocation
//! pagegen generate --json                   # machine-readable report
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::cache::NoopPageCache;
use crate::constants::DEFAULT_BATCH_LIMIT;
use crate::materializer::{BatchReport, Materializer};
use crate::utils::progress::ProgressBar;

/// Command to batch-generate landing pages from the catalog.
#[derive(Args)]
pub struct GenerateCommand {
    /// Restrict generation to one family by slug
    ///
    /// Without this flag every family in the catalog is visited.
    #[arg(long)]
    pub family: Option<String>,

    /// Maximum number of pages this invocation may generate
    ///
    /// Skipped pages do not count. When the cutoff stops the run early the
    /// report says so; re-invoking resumes where it stopped.
    #[arg(long, default_value_t = DEFAULT_BATCH_LIMIT)]
    pub limit: usize,

    /// Emit the batch report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Execute batch generation against the catalog at `catalog_path`.
    pub async fn execute(self, catalog_path: &Path, config_path: Option<&Path>) -> Result<()> {
        let (catalog, site) = super::load_inputs(catalog_path, config_path).await?;
        let materializer =
            Materializer::new(Arc::new(catalog), Arc::new(NoopPageCache), site)?;

        let extent = materializer.batch_extent(self.family.as_deref()).await?;
        let progress = if self.json {
            None
        } else {
            let bar = ProgressBar::new(extent);
            bar.set_message("Generating pages");
            Some(bar)
        };

        let report = materializer
            .generate_batch(self.family.as_deref(), self.limit, progress.as_ref())
            .await?;

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &BatchReport) {
    for family in &report.families {
        println!(
            "  {} {}: {} generated, {} skipped, {} failed",
            "✓".green(),
            family.family_slug.bold(),
            family.generated,
            family.skipped,
            family.failed
        );
    }

    let totals = format!(
        "{} generated, {} skipped, {} failed",
        report.generated(),
        report.skipped(),
        report.failed()
    );
    if report.failed() > 0 {
        println!("\n{} {totals}", "⚠".yellow());
    } else {
        println!("\n{} {totals}", "✓".green());
    }

    if report.limit_reached {
        println!(
            "{} generation limit reached; run the command again to continue",
            "⚠".yellow()
        );
    }
}
