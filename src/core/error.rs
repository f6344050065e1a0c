//! Error handling for pagegen
//!
//! This module provides the error types and user-friendly error reporting for
//! the page generation pipeline. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`PagegenError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Page resolution**: [`PagegenError::KeywordNotFound`],
//!   [`PagegenError::BrandNotFound`], [`PagegenError::ProductNotFound`],
//!   [`PagegenError::Unrelated`] - all surfaced to the route layer as a
//!   standard not-found outcome, never as a synthesis failure.
//! - **Catalog authoring**: [`PagegenError::SlugCollision`],
//!   [`PagegenError::CatalogParse`] - fatal at load time, require operator
//!   intervention.
//! - **Configuration**: [`PagegenError::Config`], plus automatic conversions
//!   from [`std::io::Error`] and [`toml::de::Error`].
//!
//! Note what is *not* here: a duplicate page-content insert is recovered
//! locally by the materializer as "already materialized" (see
//! [`crate::catalog::InsertOutcome`]), and an individual identity failing
//! mid-batch is logged and skipped. Neither is an error variant.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pagegen_cli::core::{PagegenError, user_friendly_error};
//!
//! fn resolve_page() -> Result<(), PagegenError> {
//!     Err(PagegenError::BrandNotFound { slug: "samsnug".to_string() })
//! }
//!
//! match resolve_page() {
//!     Ok(_) => println!("ok"),
//!     Err(e) if e.is_not_found() => println!("404"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display();
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pagegen operations
///
/// Each variant represents a specific failure mode with enough context for
/// both programmatic handling and user-facing display. Variants that denote
/// "this URL simply doesn't exist" answer `true` from
/// [`is_not_found`](Self::is_not_found) so the route layer can map them to a
/// not-found response without inspecting individual variants.
#[derive(Error, Debug)]
pub enum PagegenError {
    /// The keyword slug is not one of the six fixed service keywords.
    ///
    /// The keyword set is a closed enumeration; anything outside it makes the
    /// whole triple unaddressable.
    #[error("unknown service keyword '{slug}'")]
    KeywordNotFound {
        /// The keyword slug that failed to parse
        slug: String,
    },

    /// No brand row exists for the given slug.
    #[error("brand '{slug}' not found in catalog")]
    BrandNotFound {
        /// The brand slug that did not resolve
        slug: String,
    },

    /// No product row exists for the given slug.
    #[error("product '{slug}' not found in catalog")]
    ProductNotFound {
        /// The product slug that did not resolve
        slug: String,
    },

    /// Brand and product both exist, but no brand-family relation connects
    /// them. This is a deliberate narrowing of the URL space: the brand does
    /// not sell that product line, so the page does not exist.
    #[error("brand '{brand_slug}' does not sell product '{product_slug}' (no family relation)")]
    Unrelated {
        /// The brand slug of the rejected pair
        brand_slug: String,
        /// The product slug of the rejected pair
        product_slug: String,
    },

    /// Two products resolve to the same global slug.
    ///
    /// Product slugs must be unique across the entire catalog, not merely
    /// within a family. This is fatal at catalog-authoring time and must be
    /// fixed by the operator; it is never silently tolerated at synthesis
    /// time.
    #[error(
        "product slug collision: '{slug}' is used by both '{existing}' and '{conflicting}'"
    )]
    SlugCollision {
        /// The colliding slug
        slug: String,
        /// Name of the product that already owns the slug
        existing: String,
        /// Name of the product attempting to reuse it
        conflicting: String,
    },

    /// A catalog file could not be parsed or referenced a missing entity.
    #[error("invalid catalog file '{file}': {reason}")]
    CatalogParse {
        /// Path of the catalog file
        file: String,
        /// Human-readable parse or reference failure
        reason: String,
    },

    /// A configuration file could not be loaded or parsed.
    #[error("configuration error in '{file}': {reason}")]
    Config {
        /// Path of the configuration file
        file: String,
        /// Human-readable failure description
        reason: String,
    },

    /// I/O error from [`std::io::Error`]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A body-section template failed to render.
    ///
    /// The built-in template set is fixed, so this indicates a programming
    /// error rather than bad catalog data.
    #[error("template rendering failed for section '{section}': {reason}")]
    Template {
        /// Section kind whose template failed
        section: String,
        /// Underlying Tera error message
        reason: String,
    },

    /// Catch-all wrapper for store or orchestration failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PagegenError {
    /// Whether this error should surface as a standard not-found outcome.
    ///
    /// Covers the unknown-keyword, unknown-brand, unknown-product, and
    /// unrelated-pair cases. Everything else is a real failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeywordNotFound { .. }
                | Self::BrandNotFound { .. }
                | Self::ProductNotFound { .. }
                | Self::Unrelated { .. }
        )
    }
}

/// Error wrapper that adds user-friendly context for CLI display
///
/// Wraps a [`PagegenError`] with an optional actionable suggestion (shown in
/// green) and optional additional details (shown in yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying pagegen error
    pub error: PagegenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`PagegenError`]
    #[must_use]
    pub const fn new(error: PagegenError) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Add an actionable suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error with terminal colors on stderr
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{} {}", "Details:".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "Suggestion:".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`] with suggestions
///
/// This is the main entry point for converting arbitrary errors into
/// user-friendly messages for CLI display. [`PagegenError`] variants get
/// tailored suggestions; other errors pass through with generic context.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<PagegenError>() {
        Ok(pagegen_error) => create_error_context(pagegen_error),
        Err(error) => {
            if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
                return ErrorContext::new(PagegenError::CatalogParse {
                    file: "catalog.toml".to_string(),
                    reason: toml_error.to_string(),
                })
                .with_suggestion(
                    "Check the TOML syntax. Verify quotes, brackets, and table headers",
                );
            }
            ErrorContext::new(PagegenError::Other(error))
        }
    }
}

fn create_error_context(error: PagegenError) -> ErrorContext {
    match &error {
        PagegenError::KeywordNotFound { .. } => ErrorContext::new(error).with_suggestion(
            "Valid keywords are: agency, customer-service, hotline, maintenance, numbers, warranty",
        ),
        PagegenError::BrandNotFound { slug } => {
            let suggestion = format!(
                "Run 'pagegen validate' to list known brands, or add '{slug}' to the catalog file"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        PagegenError::ProductNotFound { slug } => {
            let suggestion = format!(
                "Run 'pagegen validate' to list known products, or add '{slug}' to the catalog file"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        PagegenError::Unrelated { brand_slug, .. } => {
            let suggestion = format!(
                "Add a [[relations]] entry linking brand '{brand_slug}' to the product's family if this page should exist"
            );
            ErrorContext::new(error)
                .with_details("Pages only exist for products reachable through a brand-family relation")
                .with_suggestion(suggestion)
        }
        PagegenError::SlugCollision { .. } => ErrorContext::new(error)
            .with_details("Product slugs must be unique across the whole catalog, not just within a family")
            .with_suggestion("Rename one of the products so every slug is globally unique"),
        PagegenError::Config { .. } => ErrorContext::new(error)
            .with_suggestion("Check pagegen.toml, or unset PAGEGEN_CONFIG_PATH to use defaults"),
        _ => ErrorContext::new(error),
    }
}
