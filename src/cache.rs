//! Cache revalidation surface.
//!
//! The hosting runtime owns the actual rendered-page cache; pagegen only
//! consumes a path-invalidation hook from it, fired after a forced
//! re-materialization. The hook is modeled as an injected capability so the
//! pipeline never talks to the runtime directly. The time-based
//! revalidation window is configuration, not a cache property; it lives in
//! [`crate::config::SiteConfig`] and reaches the rendering layer through
//! [`crate::service::PageService::revalidate_window`].

use anyhow::Result;
use tracing::debug;

/// Capability to invalidate a cached rendered page by route path.
#[allow(async_fn_in_trait)]
pub trait PageCache: Send + Sync {
    /// Invalidate the cached page at `path` so the next request re-renders.
    async fn revalidate(&self, path: &str) -> Result<()>;
}

/// No-op cache used by the CLI and tests.
///
/// Invalidation is logged and dropped; there is no cache behind the CLI.
#[derive(Debug, Default, Clone)]
pub struct NoopPageCache;

impl PageCache for NoopPageCache {
    async fn revalidate(&self, path: &str) -> Result<()> {
        debug!(path, "revalidate requested (noop cache)");
        Ok(())
    }
}

/// Test cache that records every revalidated path.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingPageCache {
    paths: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingPageCache {
    /// Paths revalidated so far, in call order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("cache path log poisoned").clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl PageCache for RecordingPageCache {
    async fn revalidate(&self, path: &str) -> Result<()> {
        self.paths.lock().expect("cache path log poisoned").push(path.to_string());
        Ok(())
    }
}
