//! Command-line interface for pagegen
//!
//! The CLI drives the materialization pipeline from a TOML catalog file
//! instead of a live datastore. Three subcommands cover the operational
//! surface:
//!
//! - `generate` - batch-generate pages for one family or the whole catalog
//! - `page` - materialize and print a single page by its slug triple
//! - `validate` - load a catalog file and report structural problems
//!
//! # Global Options
//!
//! All subcommands inherit:
//! - **Verbosity control**: `--verbose` and `--quiet`
//! - **Inputs**: `--catalog` for the catalog file, `--config` for the site
//!   configuration file
//! - **UI control**: `--no-progress` for automation-friendly output
//!
//! ```bash
//! pagegen generate --family home-appliances --limit 200
//! pagegen page lg washing-machine maintenance --json
//! pagegen --catalog ./catalog.toml validate
//! ```

mod generate;
mod page;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::catalog::{self, MemoryCatalog};
use crate::config::SiteConfig;

/// Runtime configuration for CLI execution.
///
/// Holds what would otherwise be set directly as environment variables,
/// so tests and programmatic callers can control CLI behavior without
/// touching global state until [`CliConfig::apply_to_env`] runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the `RUST_LOG` environment variable.
    ///
    /// When `None`, the existing `RUST_LOG` value is preserved and the
    /// subscriber stays silent without one.
    pub log_level: Option<String>,

    /// Whether to disable progress indicators and animated output.
    pub no_progress: bool,

    /// Custom path to the site configuration file, exported as
    /// `PAGEGEN_CONFIG_PATH`.
    pub config_path: Option<String>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this configuration to the process environment.
    ///
    /// Not thread-safe; call once from the main thread before spawning
    /// tasks.
    pub fn apply_to_env(&self) {
        // SAFETY: called once at startup, before any worker threads exist.
        if let Some(ref level) = self.log_level {
            unsafe { std::env::set_var("RUST_LOG", level) };
        }
        if self.no_progress {
            unsafe { std::env::set_var("PAGEGEN_NO_PROGRESS", "1") };
        }
        if let Some(ref path) = self.config_path {
            unsafe { std::env::set_var("PAGEGEN_CONFIG_PATH", path) };
        }
    }
}

/// Main CLI structure for pagegen.
///
/// Root command plus the global options every subcommand inherits. Uses the
/// `clap` derive API; `--verbose` and `--quiet` are mutually exclusive.
#[derive(Parser)]
#[command(
    name = "pagegen",
    about = "Programmatic landing-page generator for brand/product/keyword catalogs",
    version,
    long_about = "pagegen validates (brand, product, keyword) page identities against a \
catalog and synthesizes SEO artifacts, structured data, and body content for each valid \
page, persisting every page at most once."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors, for automation.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the site configuration file.
    ///
    /// Overrides the `PAGEGEN_CONFIG_PATH` / `./pagegen.toml` resolution.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the catalog file.
    ///
    /// Defaults to `PAGEGEN_CATALOG_PATH` when set, then `./catalog.toml`.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Disable progress bars and spinners for automation.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Batch-generate pages for one family or the whole catalog.
    ///
    /// Walks the cross-product of related brands, family products, and the
    /// six keywords, skipping pages that already exist. Safe to interrupt
    /// and re-invoke. See [`generate::GenerateCommand`].
    Generate(generate::GenerateCommand),

    /// Materialize and print a single page by its slug triple.
    ///
    /// See [`page::PageCommand`].
    Page(page::PageCommand),

    /// Load a catalog file and report structural problems.
    ///
    /// See [`validate::ValidateCommand`].
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed arguments.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    ///
    /// Verbose maps to `debug`, quiet disables logging, the default is
    /// `info`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an injected configuration, for tests and programmatic
    /// callers.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        init_logging(&config);

        let catalog_path = self.catalog_path();
        let config_path = self.config.clone().map(PathBuf::from);
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&catalog_path, config_path.as_deref()).await,
            Commands::Page(cmd) => cmd.execute(&catalog_path, config_path.as_deref()).await,
            Commands::Validate(cmd) => cmd.execute(&catalog_path).await,
        }
    }

    /// Resolve the catalog file location.
    ///
    /// `--catalog` wins over `PAGEGEN_CATALOG_PATH`, which wins over
    /// `./catalog.toml`.
    fn catalog_path(&self) -> PathBuf {
        if let Some(ref path) = self.catalog {
            return path.clone();
        }
        if let Ok(path) = std::env::var("PAGEGEN_CATALOG_PATH") {
            return PathBuf::from(path);
        }
        PathBuf::from("catalog.toml")
    }
}

/// Initialize the tracing subscriber once for the process.
///
/// Silent when the configuration carries no level and `RUST_LOG` is unset
/// (the `--quiet` path).
fn init_logging(config: &CliConfig) {
    let filter = if let Some(ref level) = config.log_level {
        EnvFilter::new(level.clone())
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the catalog and site configuration the subcommands share.
///
/// `config_path` is the `--config` value when given; passing it through as
/// the explicit location makes a typoed flag fail instead of silently
/// falling back to the default site identity.
pub(crate) async fn load_inputs(
    catalog_path: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> Result<(MemoryCatalog, SiteConfig)> {
    let catalog = catalog::load_catalog(catalog_path).await?;
    let site = SiteConfig::load(config_path).await?;
    Ok((catalog, site))
}
