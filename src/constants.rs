//! Global constants used throughout the pagegen codebase.
//!
//! This module contains the fixed site identity defaults, the cache
//! revalidation window, and the numeric constants shared by the
//! synthesis and materialization modules. Defining them centrally
//! improves maintainability and makes magic numbers more discoverable.

use std::time::Duration;

/// Default site display name injected into Open Graph and schema.org records.
pub const DEFAULT_SITE_NAME: &str = "مركز صيانة مصر";

/// Default base URL for canonical links when no config file is present.
pub const DEFAULT_BASE_URL: &str = "https://www.sianamisr.com";

/// Default locale for Open Graph metadata.
pub const DEFAULT_LOCALE: &str = "ar_EG";

/// Time-based revalidation window for cached rendered pages (1 hour).
///
/// After this window a cached page becomes eligible for background
/// refresh on next access. The hosting runtime owns the actual timer;
/// pagegen only hands the window to it.
pub const REVALIDATE_WINDOW: Duration = Duration::from_secs(3600);

/// Placeholder rating used when no rating row exists for a
/// (brand, product) pair. This is a designed fallback, not an error.
pub const DEFAULT_RATING_VALUE: f64 = 4.7;

/// Review count paired with [`DEFAULT_RATING_VALUE`].
pub const DEFAULT_RATING_COUNT: u32 = 100;

/// Number of visual treatments in the keyword-emphasis palette.
///
/// A marker phrase at index `i` in the fixed marker order is styled
/// with treatment `i % EMPHASIS_PALETTE_SIZE`.
pub const EMPHASIS_PALETTE_SIZE: usize = 4;

/// Default per-invocation cutoff for batch generation when the caller
/// does not supply one. Bounds the cost of a single `pagegen generate`
/// run; the skip-if-materialized rule makes re-invocation resume where
/// the previous run stopped.
pub const DEFAULT_BATCH_LIMIT: usize = 500;

/// Timeout for waiting on an in-flight materialization of the same
/// page identity before proceeding anyway (the store's uniqueness
/// constraint still guarantees at-most-once persistence).
pub const IN_FLIGHT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);
