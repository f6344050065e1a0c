//! The page route surface.
//!
//! `/{brandSlug}/{productSlug}/{keywordSlug}` resolves here. The service
//! glues the pipeline together for the rendering layer: validate the triple,
//! materialize on first access (blocking fallback - the first-ever request
//! for an identity waits for synthesis and persistence to complete),
//! recompute the cheap pure head artifacts, and attach prev/next
//! navigation. Subsequent requests find the stored row and skip synthesis
//! entirely; the hosting runtime's cache sits in front of all of it with
//! the revalidation window exposed by [`PageService::revalidate_window`].
//!
//! Not-found outcomes - unknown slugs, unknown keyword, unrelated
//! brand-product pair - come back as `Ok(None)`, never as errors: the URL
//! space is deliberately narrow and falling outside it is normal control
//! flow.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::PageCache;
use crate::catalog::{CatalogStore, PageContent, PageIdentity};
use crate::config::SiteConfig;
use crate::core::PagegenError;
use crate::materializer::Materializer;
use crate::navigation::{self, Neighbors};
use crate::resolver;
use crate::seo::{self, SeoArtifacts};

/// Everything the rendering layer needs for one page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    /// The validated identity the page was served for
    pub identity: PageIdentity,
    /// The materialized artifact (body sections, schema records, ...)
    pub content: PageContent,
    /// Head artifacts - canonical, Open Graph, Twitter card
    pub seo: SeoArtifacts,
    /// Prev/next navigation references
    pub neighbors: Neighbors,
}

/// Route-facing facade over the materialization pipeline.
pub struct PageService<S, C> {
    materializer: Materializer<S, C>,
    site: SiteConfig,
}

impl<S: CatalogStore, C: PageCache> PageService<S, C> {
    /// Build a service over an injected store and cache.
    pub fn new(store: Arc<S>, cache: Arc<C>, site: SiteConfig) -> Result<Self, PagegenError> {
        let materializer = Materializer::new(store, cache, site.clone())?;
        Ok(Self { materializer, site })
    }

    /// The materializer behind this service, for operational tooling.
    #[must_use]
    pub fn materializer(&self) -> &Materializer<S, C> {
        &self.materializer
    }

    /// Serve the page for a slug triple, or `None` for a not-found outcome.
    ///
    /// First-ever access materializes synchronously (single-flight with any
    /// concurrent requests for the same identity); later accesses read the
    /// stored artifact.
    pub async fn get(
        &self,
        brand_slug: &str,
        product_slug: &str,
        keyword_slug: &str,
    ) -> Result<Option<RenderedPage>> {
        match self.serve(brand_slug, product_slug, keyword_slug, false).await {
            Ok(page) => Ok(Some(page)),
            Err(e) if e.is_not_found() => {
                debug!(brand_slug, product_slug, keyword_slug, "page not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Force-refresh the page for a slug triple after a catalog edit.
    ///
    /// Re-runs synthesis, overwrites the stored artifact, and invalidates
    /// the cached rendered page. Not-found outcomes are errors here: there
    /// is nothing to refresh.
    pub async fn refresh(
        &self,
        brand_slug: &str,
        product_slug: &str,
        keyword_slug: &str,
    ) -> Result<RenderedPage, PagegenError> {
        self.serve(brand_slug, product_slug, keyword_slug, true).await
    }

    /// The time-based revalidation window the hosting cache should apply.
    #[must_use]
    pub fn revalidate_window(&self) -> Duration {
        Duration::from_secs(self.site.revalidate_secs)
    }

    async fn serve(
        &self,
        brand_slug: &str,
        product_slug: &str,
        keyword_slug: &str,
        force: bool,
    ) -> Result<RenderedPage, PagegenError> {
        let store = self.materializer.store().clone();
        let page = resolver::resolve(store.as_ref(), brand_slug, product_slug, keyword_slug)
            .await?;

        let content = self.materializer.materialize_resolved(&page, force).await?;

        // Head artifacts are pure and cheap; recomputing them beats storing
        // redundant copies of the canonical and card fields.
        let rating = store
            .rating(page.brand.id, page.product.id)
            .await
            .map_err(PagegenError::Other)?
            .unwrap_or_else(|| {
                crate::catalog::Rating::placeholder(page.brand.id, page.product.id)
            });
        let artifacts = seo::synthesize(&page, &rating, &self.site);

        let neighbors =
            navigation::neighbors(store.as_ref(), &page.brand, &page.product, page.keyword())
                .await
                .map_err(PagegenError::Other)?;

        Ok(RenderedPage { identity: page.identity, content, seo: artifacts, neighbors })
    }
}
