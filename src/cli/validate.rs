//! Catalog validation.
//!
//! Loads a catalog file through the same loader the other commands use -
//! so dangling slugs, duplicate slugs, and cross-family product-slug
//! collisions already fail hard - then reports structural warnings that are
//! legal but probably unintended:
//!
//! - families with no products (nothing to generate)
//! - brands related to no family (unreachable from every URL)
//! - families with no related brand (an orphaned product line)
//!
//! ```bash
//! pagegen validate
//! pagegen validate --format json
//! pagegen validate --strict        # warnings fail the command, for CI
//! ```

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::catalog::{self, CatalogStore};
use crate::keyword::Keyword;

/// Output format options for validation results.
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// Structured JSON output for automation
    Json,
}

/// Aggregated validation results.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    /// Whether the catalog loaded and no warnings were found
    pub valid: bool,
    /// Number of families in the catalog
    pub families: usize,
    /// Number of brands in the catalog
    pub brands: usize,
    /// Number of products in the catalog
    pub products: usize,
    /// Total page identities the catalog can produce
    pub page_extent: u64,
    /// Structural warnings (legal but probably unintended)
    pub warnings: Vec<String>,
}

/// Command to validate a catalog file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    ///
    /// Useful for CI pipelines that gate on catalog hygiene.
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Validate the catalog at `catalog_path`.
    pub async fn execute(self, catalog_path: &Path) -> Result<()> {
        let catalog = catalog::load_catalog(catalog_path).await?;
        let results = inspect(&catalog).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => print_results(&results),
        }

        if self.strict && !results.warnings.is_empty() {
            return Err(anyhow!(
                "catalog has {} warning(s) and --strict is set",
                results.warnings.len()
            ));
        }
        Ok(())
    }
}

/// Walk the loaded catalog and collect counts and warnings.
async fn inspect<S: CatalogStore>(catalog: &S) -> Result<ValidationResults> {
    let families = catalog.list_families().await?;
    let brands = catalog.list_brands().await?;

    let mut results = ValidationResults {
        families: families.len(),
        brands: brands.len(),
        ..Default::default()
    };

    for family in &families {
        let products = catalog.products_by_family(family.id).await?;
        let relations = catalog.relations_by_family(family.id).await?;
        results.products += products.len();
        results.page_extent +=
            (relations.len() * products.len() * Keyword::ALL.len()) as u64;

        if products.is_empty() {
            results
                .warnings
                .push(format!("family '{}' has no products", family.slug));
        }
        if relations.is_empty() {
            results
                .warnings
                .push(format!("family '{}' has no related brand", family.slug));
        }
    }

    for brand in &brands {
        if catalog.relations_by_brand(brand.id).await?.is_empty() {
            results.warnings.push(format!(
                "brand '{}' is related to no family and is unreachable",
                brand.slug
            ));
        }
    }

    results.valid = results.warnings.is_empty();
    Ok(results)
}

fn print_results(results: &ValidationResults) {
    println!("{} catalog loaded", "✓".green());
    println!(
        "  {} families, {} brands, {} products, {} possible pages",
        results.families, results.brands, results.products, results.page_extent
    );
    for warning in &results.warnings {
        println!("{} {warning}", "⚠".yellow());
    }
}
