//! Shared utilities
//!
//! # Modules
//!
//! - [`progress`] - Progress bars and spinners for long-running operations
//!
//! Progress indicators automatically disable in non-interactive
//! environments; see the module docs for the `PAGEGEN_NO_PROGRESS`
//! convention.

pub mod progress;

pub use progress::ProgressBar;
