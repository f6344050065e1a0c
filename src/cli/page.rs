//! Single-page materialization.
//!
//! Resolves one slug triple against the catalog, materializes the page
//! (or force-refreshes it), and prints the result. The text view is a short
//! operator summary; `--json` prints the complete rendered page the way the
//! rendering layer receives it.
//!
//! ```bash
//! pagegen page lg washing-machine maintenance
//! pagegen page lg washing-machine maintenance --force
//! pagegen page lg washing-machine maintenance --json > page.json
//! ```

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::cache::NoopPageCache;
use crate::service::{PageService, RenderedPage};

/// Command to materialize and print one page.
#[derive(Args)]
pub struct PageCommand {
    /// Brand slug of the page identity
    pub brand: String,

    /// Product slug of the page identity
    pub product: String,

    /// Keyword slug of the page identity (one of the six fixed keywords)
    pub keyword: String,

    /// Re-run synthesis and overwrite the stored page
    #[arg(long)]
    pub force: bool,

    /// Print the full rendered page as JSON
    #[arg(long)]
    pub json: bool,
}

impl PageCommand {
    /// Execute against the catalog at `catalog_path`.
    pub async fn execute(self, catalog_path: &Path, config_path: Option<&Path>) -> Result<()> {
        let (catalog, site) = super::load_inputs(catalog_path, config_path).await?;
        let service = PageService::new(Arc::new(catalog), Arc::new(NoopPageCache), site)?;

        let page = if self.force {
            service.refresh(&self.brand, &self.product, &self.keyword).await?
        } else {
            service.get(&self.brand, &self.product, &self.keyword).await?.ok_or_else(
                || {
                    anyhow!(
                        "no page exists for /{}/{}/{}",
                        self.brand,
                        self.product,
                        self.keyword
                    )
                },
            )?
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&page)?);
        } else {
            print_summary(&page);
        }
        Ok(())
    }
}

fn print_summary(page: &RenderedPage) {
    println!("{} {}", "✓".green(), page.identity.path().bold());
    println!("  title:     {}", page.seo.title);
    println!("  canonical: {}", page.seo.canonical_url);
    println!("  sections:  {}", page.content.body_sections.len());
    println!("  schema:    {} records", page.content.schema_objects.len());
    if let Some(ref prev) = page.neighbors.prev {
        println!("  prev:      {}", prev.path());
    }
    if let Some(ref next) = page.neighbors.next {
        println!("  next:      {}", next.path());
    }
    println!("  generated: {}", page.content.generated_at.to_rfc3339());
}
