//! Integration test suite for pagegen.
//!
//! `common` holds the shared test-project helper; the sibling modules cover
//! the pipeline through the library API and the CLI through the compiled
//! binary.

mod common;

mod cli;
mod pipeline;
