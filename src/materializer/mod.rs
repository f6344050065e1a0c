//! Page materialization with at-most-once persistence.
//!
//! The materializer orchestrates the whole pipeline for one page identity:
//! validate, synthesize SEO artifacts and body content, persist. Its job is
//! making that happen exactly once per identity no matter how many callers
//! race for it, using two mechanisms and nothing else:
//!
//! - **Single-flight per identity** (in-process): a `DashMap` of in-flight
//!   registrations keyed by [`PageIdentity`], coordinated with
//!   `tokio::sync::Notify`. The first caller claims the slot and runs the
//!   synthesis; callers arriving while it is in flight wait for the
//!   notification and then observe the stored result instead of triggering
//!   a second synthesis. A waiter that times out proceeds anyway - the
//!   store constraint below still keeps persistence at-most-once.
//! - **Insert-if-absent** (cross-process): the store's uniqueness
//!   constraint on (brand id, product id, keyword). A duplicate insert
//!   resolves to [`InsertOutcome::Exists`] and is treated as "already
//!   materialized", never as an error.
//!
//! There is no application-level locking anywhere.
//!
//! # State machine
//!
//! `Unmaterialized -> (validate, synthesize) -> Materialized`, and
//! `Materialized` is terminal unless `force = true`, which re-runs the
//! synthesis, overwrites the stored artifact, and fires the cache
//! revalidation hook for the page's path.
//!
//! # Batch mode
//!
//! [`Materializer::generate_batch`] walks the cross-product of
//! {brands related to a family} x {family products} x {6 keywords} for one
//! family or all of them, skipping identities that are already
//! materialized, honoring a per-invocation cutoff, and reporting
//! generated/skipped/failed counts per family. An identity failing mid-walk
//! is logged and skipped; the batch continues. Because of the
//! skip-if-materialized rule an interrupted batch is safely re-invocable -
//! a half-completed run leaves the catalog valid and resumable.

use anyhow::{Context, anyhow};
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::cache::PageCache;
use crate::catalog::{
    CatalogStore, Family, InsertOutcome, PageContent, PageIdentity, Rating,
};
use crate::config::SiteConfig;
use crate::constants::IN_FLIGHT_WAIT_TIMEOUT;
use crate::content::TemplateEngine;
use crate::core::PagegenError;
use crate::keyword::Keyword;
use crate::resolver::{self, ResolvedPage};
use crate::utils::progress::ProgressBar;
use crate::{content, seo};

/// Per-family counters from a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyBatchReport {
    /// Family the counters belong to
    pub family_slug: String,
    /// Pages synthesized and persisted by this run
    pub generated: usize,
    /// Pages skipped because they were already materialized
    pub skipped: usize,
    /// Pages that failed synthesis and were skipped (logged, not fatal)
    pub failed: usize,
}

/// Outcome of one batch invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Per-family counters, in family slug order
    pub families: Vec<FamilyBatchReport>,
    /// Whether the per-invocation cutoff stopped the run early
    pub limit_reached: bool,
}

impl BatchReport {
    /// Total pages generated across all families.
    #[must_use]
    pub fn generated(&self) -> usize {
        self.families.iter().map(|f| f.generated).sum()
    }

    /// Total pages skipped across all families.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.families.iter().map(|f| f.skipped).sum()
    }

    /// Total pages that failed synthesis across all families.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.families.iter().map(|f| f.failed).sum()
    }
}

/// Orchestrates validation, synthesis, and idempotent persistence.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and the
/// synthesis stages it drives are pure, so any number of materializations
/// for different or identical identities may run concurrently.
pub struct Materializer<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    site: SiteConfig,
    templates: TemplateEngine,
    in_flight: DashMap<PageIdentity, Arc<Notify>>,
}

impl<S: CatalogStore, C: PageCache> Materializer<S, C> {
    /// Build a materializer over an injected store and cache capability.
    pub fn new(store: Arc<S>, cache: Arc<C>, site: SiteConfig) -> Result<Self, PagegenError> {
        Ok(Self {
            store,
            cache,
            site,
            templates: TemplateEngine::new()?,
            in_flight: DashMap::new(),
        })
    }

    /// The store this materializer persists into.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The cache capability revalidations go to.
    #[must_use]
    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Materialize one page identity.
    ///
    /// With `force = false` this is idempotent: the first call synthesizes
    /// and persists, every later call returns the stored artifact, and
    /// concurrent calls collapse into a single synthesis. With
    /// `force = true` the synthesis re-runs, the stored artifact is
    /// overwritten, and the cache path is revalidated.
    ///
    /// # Errors
    ///
    /// Not-found and unrelated identities surface the resolver's errors;
    /// see [`resolver::resolve`].
    pub async fn materialize(
        &self,
        identity: &PageIdentity,
        force: bool,
    ) -> Result<PageContent, PagegenError> {
        let page = resolver::resolve(
            self.store.as_ref(),
            &identity.brand_slug,
            &identity.product_slug,
            identity.keyword.slug(),
        )
        .await?;

        self.materialize_resolved(&page, force).await
    }

    /// Materialize an already resolved page, skipping re-resolution.
    ///
    /// Callers that hold a [`ResolvedPage`] (the service after routing, the
    /// batch walk after loading a family's entities) come in here directly
    /// so resolution runs once per request, not once per stage. Same
    /// idempotence and single-flight guarantees as [`Materializer::materialize`].
    pub async fn materialize_resolved(
        &self,
        page: &ResolvedPage,
        force: bool,
    ) -> Result<PageContent, PagegenError> {
        let identity = &page.identity;
        let notify = Arc::new(Notify::new());
        let mut holds_slot = false;

        loop {
            if !force {
                let existing = self
                    .store
                    .page_content(page.brand.id, page.product.id, page.keyword())
                    .await
                    .context("checking for materialized page content")?;
                if let Some(content) = existing {
                    debug!(identity = %identity, "already materialized");
                    return Ok(content);
                }
            }

            match self.in_flight.entry(identity.clone()) {
                dashmap::mapref::entry::Entry::Occupied(entry) => {
                    let existing_notify = entry.get().clone();
                    // Create the notified future before dropping the entry;
                    // Notify only wakes futures that are already waiting.
                    let notified = existing_notify.notified();
                    drop(entry);

                    debug!(identity = %identity, "waiting for in-flight materialization");
                    tokio::select! {
                        () = notified => continue,
                        () = tokio::time::sleep(IN_FLIGHT_WAIT_TIMEOUT) => {
                            // The holder may be stuck; proceed without the
                            // slot. Insert-if-absent still guarantees a
                            // single stored row.
                            warn!(
                                identity = %identity,
                                "timeout waiting for in-flight materialization, proceeding"
                            );
                            break;
                        }
                    }
                }
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(notify.clone());
                    holds_slot = true;
                    break;
                }
            }
        }

        let result = self.synthesize_and_store(page, force).await;

        if holds_slot {
            self.in_flight.remove(identity);
            notify.notify_waiters();
        }

        result
    }

    /// Run the pure synthesis stages and persist the artifact.
    async fn synthesize_and_store(
        &self,
        page: &ResolvedPage,
        force: bool,
    ) -> Result<PageContent, PagegenError> {
        let rating = self
            .store
            .rating(page.brand.id, page.product.id)
            .await
            .context("querying rating")?
            .unwrap_or_else(|| Rating::placeholder(page.brand.id, page.product.id));

        let artifacts = seo::synthesize(page, &rating, &self.site);

        let overrides = self
            .store
            .content_overrides(page.brand.id, page.product.id, page.keyword())
            .await
            .context("querying content overrides")?;

        let body_sections: Vec<content::BodySection> = self.templates.render(
            &page.brand,
            &page.product,
            &page.family,
            page.keyword(),
            &self.site.gallery_images,
            &overrides,
        )?;

        let content = PageContent {
            brand_id: page.brand.id,
            product_id: page.product.id,
            keyword: page.keyword(),
            title: artifacts.title,
            meta_description: artifacts.meta_description,
            h1: artifacts.h1,
            body_sections,
            schema_objects: artifacts.schema_objects,
            generated_at: Utc::now(),
        };

        if force {
            self.store
                .replace_page_content(content.clone())
                .await
                .context("overwriting page content")?;
            let path = page.identity.path();
            self.cache.revalidate(&path).await.context("revalidating cached page")?;
            info!(identity = %page.identity, "page re-materialized (forced)");
            return Ok(content);
        }

        match self
            .store
            .insert_page_content(content.clone())
            .await
            .context("persisting page content")?
        {
            InsertOutcome::Inserted => {
                info!(identity = %page.identity, "page materialized");
                Ok(content)
            }
            // Someone else won the insert race; their row is the page.
            InsertOutcome::Exists(stored) => {
                debug!(identity = %page.identity, "duplicate insert resolved as materialized");
                Ok(stored)
            }
        }
    }

    /// Batch-generate pages for one family or all families.
    ///
    /// `limit` caps how many pages this invocation may generate; already
    /// materialized identities are skipped without counting against it.
    /// Returns per-family counters. A `progress` bar, when supplied, ticks
    /// once per visited identity.
    pub async fn generate_batch(
        &self,
        family_filter: Option<&str>,
        limit: usize,
        progress: Option<&ProgressBar>,
    ) -> Result<BatchReport, PagegenError> {
        let families = self.target_families(family_filter).await?;
        let mut report = BatchReport::default();
        let mut generated_total = 0usize;

        'families: for family in families {
            let mut counters = FamilyBatchReport {
                family_slug: family.slug.clone(),
                generated: 0,
                skipped: 0,
                failed: 0,
            };

            let relations = self
                .store
                .relations_by_family(family.id)
                .await
                .context("querying family relations")?;
            let products = self
                .store
                .products_by_family(family.id)
                .await
                .context("querying family products")?;

            for relation in &relations {
                let Some(brand) = self
                    .store
                    .brand_by_id(relation.brand_id)
                    .await
                    .context("querying related brand")?
                else {
                    warn!(
                        brand_id = relation.brand_id,
                        family = %family.slug,
                        "relation references missing brand, skipping"
                    );
                    continue;
                };

                for product in &products {
                    for keyword in Keyword::ALL {
                        if generated_total >= limit {
                            report.limit_reached = true;
                            report.families.push(counters);
                            break 'families;
                        }

                        if let Some(bar) = progress {
                            bar.inc(1);
                        }

                        let already = self
                            .store
                            .page_content(brand.id, product.id, keyword)
                            .await
                            .context("checking batch identity")?;
                        if already.is_some() {
                            counters.skipped += 1;
                            continue;
                        }

                        // The walk already holds the entities, so no
                        // per-identity re-resolution.
                        let page = ResolvedPage {
                            identity: PageIdentity::new(&brand.slug, &product.slug, keyword),
                            brand: brand.clone(),
                            product: product.clone(),
                            family: family.clone(),
                        };
                        match self.materialize_resolved(&page, false).await {
                            Ok(_) => {
                                counters.generated += 1;
                                generated_total += 1;
                            }
                            // One bad identity never aborts the batch.
                            Err(e) => {
                                warn!(
                                    identity = %page.identity,
                                    error = %e,
                                    "batch synthesis failed for identity, skipping"
                                );
                                counters.failed += 1;
                            }
                        }
                    }
                }
            }

            report.families.push(counters);
        }

        info!(
            generated = report.generated(),
            skipped = report.skipped(),
            failed = report.failed(),
            limit_reached = report.limit_reached,
            "batch generation finished"
        );
        Ok(report)
    }

    /// Upper bound on identities a batch over `family_filter` can visit.
    /// Used to size the CLI progress bar.
    pub async fn batch_extent(&self, family_filter: Option<&str>) -> Result<u64, PagegenError> {
        let families = self.target_families(family_filter).await?;
        let mut extent = 0u64;
        for family in families {
            let brands = self
                .store
                .relations_by_family(family.id)
                .await
                .context("counting family relations")?
                .len() as u64;
            let products = self
                .store
                .products_by_family(family.id)
                .await
                .context("counting family products")?
                .len() as u64;
            extent += brands * products * Keyword::ALL.len() as u64;
        }
        Ok(extent)
    }

    async fn target_families(
        &self,
        family_filter: Option<&str>,
    ) -> Result<Vec<Family>, PagegenError> {
        match family_filter {
            Some(slug) => {
                let family = self
                    .store
                    .family_by_slug(slug)
                    .await
                    .context("querying batch family")?
                    .ok_or_else(|| {
                        PagegenError::Other(anyhow!("unknown family slug '{slug}'"))
                    })?;
                Ok(vec![family])
            }
            None => Ok(self.store.list_families().await.context("listing families")?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RecordingPageCache;
    use crate::test_utils::{CountingCatalog, fixture_catalog};

    fn materializer() -> Materializer<crate::catalog::MemoryCatalog, RecordingPageCache> {
        Materializer::new(
            Arc::new(fixture_catalog()),
            Arc::new(RecordingPageCache::default()),
            SiteConfig::default(),
        )
        .unwrap()
    }

    fn identity() -> PageIdentity {
        PageIdentity::new("lg", "washing-machine", Keyword::Maintenance)
    }

    #[tokio::test]
    async fn second_materialize_is_a_no_op_returning_the_first_result() {
        let m = materializer();

        let first = m.materialize(&identity(), false).await.unwrap();
        let second = m.materialize(&identity(), false).await.unwrap();

        assert_eq!(first.generated_at, second.generated_at);
        assert_eq!(first.title, second.title);
        assert_eq!(m.store().page_count(), 1);
    }

    #[tokio::test]
    async fn force_overwrites_and_revalidates_the_cache_path() {
        let m = materializer();

        let first = m.materialize(&identity(), false).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let refreshed = m.materialize(&identity(), true).await.unwrap();

        assert!(refreshed.generated_at > first.generated_at);
        assert_eq!(m.store().page_count(), 1);
        assert_eq!(m.cache.paths(), ["/lg/washing-machine/maintenance"]);
    }

    #[tokio::test]
    async fn invalid_identity_surfaces_not_found() {
        let m = materializer();
        let bad = PageIdentity::new("nokia", "washing-machine", Keyword::Agency);
        let err = m.materialize(&bad, false).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn concurrent_materialize_collapses_to_one_synthesis() {
        let store = Arc::new(CountingCatalog::new(fixture_catalog()));
        let m = Arc::new(
            Materializer::new(
                Arc::clone(&store),
                Arc::new(RecordingPageCache::default()),
                SiteConfig::default(),
            )
            .unwrap(),
        );

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let m = Arc::clone(&m);
                tokio::spawn(async move { m.materialize(&identity(), false).await })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap().unwrap());
        }

        assert_eq!(store.page_count(), 1);
        // One synthesis ran; the row count alone would also pass with
        // sixteen redundant syntheses losing the insert race.
        assert_eq!(store.insert_attempts(), 1);
        // Every caller observed the same stored artifact.
        let first = &results[0];
        assert!(results.iter().all(|r| r.generated_at == first.generated_at));
    }

    #[tokio::test]
    async fn batch_reuses_the_entities_it_walked() {
        let store = Arc::new(CountingCatalog::new(fixture_catalog()));
        let m = Materializer::new(
            Arc::clone(&store),
            Arc::new(RecordingPageCache::default()),
            SiteConfig::default(),
        )
        .unwrap();

        let report = m.generate_batch(Some("laundry"), usize::MAX, None).await.unwrap();

        assert!(report.generated() > 0);
        // The walk loads brands by id once per relation; nothing re-resolves
        // identities by slug afterwards.
        assert_eq!(store.brand_lookups(), 0);
    }

    #[tokio::test]
    async fn batch_generates_then_skips_on_rerun() {
        let m = materializer();

        let first = m.generate_batch(Some("laundry"), 1000, None).await.unwrap();
        assert!(first.generated() > 0);
        assert_eq!(first.skipped(), 0);
        assert_eq!(first.failed(), 0);

        let second = m.generate_batch(Some("laundry"), 1000, None).await.unwrap();
        assert_eq!(second.generated(), 0);
        assert_eq!(second.skipped(), first.generated());
    }

    #[tokio::test]
    async fn batch_honors_the_cutoff_and_resumes() {
        let m = materializer();
        let extent = m.batch_extent(Some("laundry")).await.unwrap() as usize;
        assert!(extent > 4);

        let first = m.generate_batch(Some("laundry"), 4, None).await.unwrap();
        assert_eq!(first.generated(), 4);
        assert!(first.limit_reached);

        // Re-invocation picks up where the cutoff stopped.
        let second = m.generate_batch(Some("laundry"), usize::MAX, None).await.unwrap();
        assert_eq!(second.generated(), extent - 4);
        assert_eq!(second.skipped(), 4);
        assert!(!second.limit_reached);
    }

    #[tokio::test]
    async fn batch_covers_all_families_without_a_filter() {
        let m = materializer();
        let report = m.generate_batch(None, usize::MAX, None).await.unwrap();
        let extent = m.batch_extent(None).await.unwrap() as usize;

        assert_eq!(report.generated(), extent);
        assert_eq!(report.families.len(), 2);
    }

    #[tokio::test]
    async fn unknown_family_filter_is_an_error() {
        let m = materializer();
        assert!(m.generate_batch(Some("electronics"), 10, None).await.is_err());
    }
}
