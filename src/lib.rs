//! pagegen - programmatic landing-page generation
//!
//! pagegen turns a catalog of brands, products, and product families into a
//! large set of keyword landing pages. Every page is addressed by a
//! (brand slug, product slug, keyword slug) triple; the keyword comes from a
//! closed six-element service vocabulary (maintenance, agency, hotline,
//! customer service, numbers, warranty). The pipeline validates the triple,
//! synthesizes SEO metadata, schema.org structured data, and Arabic body
//! content deterministically from catalog entities, and persists each page
//! at most once no matter how many requests race for it.
//!
//! # Architecture Overview
//!
//! The pipeline is a straight line with one gate and one write:
//!
//! 1. [`resolver`] validates the triple against the catalog, including the
//!    brand-family relation that decides whether a brand sells a product
//!    line at all.
//! 2. [`seo`] and [`content`] are pure synthesis stages: the same catalog
//!    rows always produce the same artifacts.
//! 3. [`materializer`] coordinates single-flight synthesis per identity and
//!    persists through an insert-if-absent, so a page is generated exactly
//!    once and an interrupted batch is safely re-invocable.
//! 4. [`service`] is the route-facing facade: get-or-materialize, plus
//!    prev/next navigation from [`navigation`].
//!
//! # Core Modules
//!
//! ## Pipeline
//! - [`keyword`] - the closed keyword vocabulary and its fixed order
//! - [`resolver`] - page-identity validation against the catalog
//! - [`seo`] - titles, meta, Open Graph, Twitter cards, schema.org records
//! - [`content`] - body-section synthesis, overrides, keyword emphasis
//! - [`navigation`] - prev/next across keywords and product boundaries
//! - [`materializer`] - at-most-once materialization and batch generation
//! - [`service`] - the route surface
//!
//! ## Supporting Modules
//! - [`catalog`] - catalog entities, the store capability, file loading
//! - [`cache`] - the hosting-cache revalidation capability
//! - [`cli`] - command-line interface (`generate`, `page`, `validate`)
//! - [`config`] - site identity and runtime configuration
//! - [`core`] - error types and user-facing error presentation
//! - [`utils`] - progress indicators
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Generate every page the catalog describes
//! pagegen generate
//!
//! # Generate one family, bounded per invocation
//! pagegen generate --family home-appliances --limit 200
//!
//! # Materialize and inspect a single page
//! pagegen page lg washing-machine maintenance --json
//!
//! # Check catalog hygiene
//! pagegen validate --strict
//! ```

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod core;
pub mod keyword;
pub mod materializer;
pub mod navigation;
pub mod resolver;
pub mod seo;
pub mod service;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
