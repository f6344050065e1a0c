//! Test utilities for pagegen
//!
//! Shared fixtures for the unit and integration suites plus one-time test
//! logging setup. Everything here is compiled only for tests or behind the
//! `test-utils` feature so the integration binary can reuse the same catalog.
//!
//! # Fixture Catalog
//!
//! [`fixture_catalog`] builds a small but structurally complete catalog:
//!
//! - family `kitchen` with products `dishwasher` and `refrigerator`
//! - family `laundry` with products `dryer` and `washing-machine`
//! - brand `lg` related to both families (so its reachable products sort
//!   as dishwasher, dryer, refrigerator, washing-machine)
//! - brand `tornado` related to `kitchen` only, giving the suites an
//!   existing-but-unrelated pair to probe
//!
//! Per family that leaves a per-brand extent of 2 products x 6 keywords;
//! `laundry` alone yields 12 pages, the whole catalog 36.

use anyhow::Result;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::catalog::{
    Brand, BrandFamilyRelation, CatalogStore, ContentOverride, Family, InsertOutcome,
    MemoryCatalog, PageContent, PageIdentity, Product, Rating,
};
use crate::keyword::Keyword;
use crate::resolver::ResolvedPage;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests, once per process.
///
/// Respects `RUST_LOG` when set; otherwise uses the provided level, or stays
/// silent when neither is given.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// The brand most tests resolve against: LG, id 1, related to both families.
#[must_use]
pub fn fixture_brand() -> Brand {
    Brand {
        id: 1,
        name: "LG".to_string(),
        slug: "lg".to_string(),
        logo_ref: Some("brands/lg/logo.webp".to_string()),
        banner_ref: Some("brands/lg/banner.webp".to_string()),
        meta_title: None,
        meta_description: None,
    }
}

/// The product most tests resolve against: the laundry washing machine.
#[must_use]
pub fn fixture_product() -> Product {
    Product {
        id: 4,
        name: "Washing Machine".to_string(),
        slug: "washing-machine".to_string(),
        family_id: 2,
    }
}

/// The family owning [`fixture_product`].
#[must_use]
pub fn fixture_family() -> Family {
    Family {
        id: 2,
        name: "Laundry".to_string(),
        slug: "laundry".to_string(),
        description: "أجهزة غسيل وتجفيف الملابس".to_string(),
    }
}

/// A [`ResolvedPage`] for `/lg/washing-machine/{keyword}` built from the
/// fixture entities, skipping the resolver.
#[must_use]
pub fn fixture_resolved_page(keyword: Keyword) -> ResolvedPage {
    let brand = fixture_brand();
    let product = fixture_product();
    let identity = PageIdentity::new(&brand.slug, &product.slug, keyword);
    ResolvedPage { identity, brand, product, family: fixture_family() }
}

/// Build the fixture catalog described in the module docs.
///
/// # Panics
///
/// Panics on insertion failure, which for the fixed fixture data would be a
/// bug in the fixture itself.
#[must_use]
pub fn fixture_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();

    catalog
        .insert_family(Family {
            id: 1,
            name: "Kitchen".to_string(),
            slug: "kitchen".to_string(),
            description: "أجهزة المطبخ المنزلية".to_string(),
        })
        .unwrap();
    catalog.insert_family(fixture_family()).unwrap();

    catalog.insert_brand(fixture_brand()).unwrap();
    catalog
        .insert_brand(Brand {
            id: 2,
            name: "Tornado".to_string(),
            slug: "tornado".to_string(),
            logo_ref: None,
            banner_ref: None,
            meta_title: None,
            meta_description: None,
        })
        .unwrap();

    let products = [
        (1, "Dishwasher", "dishwasher", 1),
        (2, "Refrigerator", "refrigerator", 1),
        (3, "Dryer", "dryer", 2),
        (4, "Washing Machine", "washing-machine", 2),
    ];
    for (id, name, slug, family_id) in products {
        catalog
            .insert_product(Product {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                family_id,
            })
            .unwrap();
    }

    // LG sells everything; Tornado only the kitchen line.
    catalog.relate(1, 1).unwrap();
    catalog.relate(1, 2).unwrap();
    catalog.relate(2, 1).unwrap();

    // One real rating so the placeholder path stays distinguishable.
    catalog.insert_rating(Rating { brand_id: 1, product_id: 1, value: 4.2, count: 37 });

    catalog
}

/// Store wrapper that counts pipeline-side calls.
///
/// Row counts alone cannot distinguish "one synthesis" from "N redundant
/// syntheses whose duplicate inserts resolved to the stored row", so the
/// suites wrap the fixture catalog in this and assert on the call counters:
/// one persistence attempt per identity, one slug resolution per request.
#[derive(Debug)]
pub struct CountingCatalog {
    inner: MemoryCatalog,
    insert_attempts: AtomicUsize,
    brand_lookups: AtomicUsize,
}

impl CountingCatalog {
    /// Wrap a catalog, starting all counters at zero.
    #[must_use]
    pub fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            insert_attempts: AtomicUsize::new(0),
            brand_lookups: AtomicUsize::new(0),
        }
    }

    /// How many times `insert_page_content` was called. Every completed
    /// synthesis attempts exactly one insert.
    #[must_use]
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// How many times a brand was resolved by slug. Only the validity
    /// resolver queries brands this way.
    #[must_use]
    pub fn brand_lookups(&self) -> usize {
        self.brand_lookups.load(Ordering::SeqCst)
    }

    /// Number of stored page-content rows, from the wrapped catalog.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.inner.page_count()
    }
}

impl CatalogStore for CountingCatalog {
    async fn family_by_id(&self, id: i64) -> Result<Option<Family>> {
        self.inner.family_by_id(id).await
    }

    async fn family_by_slug(&self, slug: &str) -> Result<Option<Family>> {
        self.inner.family_by_slug(slug).await
    }

    async fn list_families(&self) -> Result<Vec<Family>> {
        self.inner.list_families().await
    }

    async fn brand_by_id(&self, id: i64) -> Result<Option<Brand>> {
        self.inner.brand_by_id(id).await
    }

    async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>> {
        self.brand_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.brand_by_slug(slug).await
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        self.inner.list_brands().await
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        self.inner.product_by_slug(slug).await
    }

    async fn products_by_family(&self, family_id: i64) -> Result<Vec<Product>> {
        self.inner.products_by_family(family_id).await
    }

    async fn relations_by_brand(&self, brand_id: i64) -> Result<Vec<BrandFamilyRelation>> {
        self.inner.relations_by_brand(brand_id).await
    }

    async fn relations_by_family(&self, family_id: i64) -> Result<Vec<BrandFamilyRelation>> {
        self.inner.relations_by_family(family_id).await
    }

    async fn rating(&self, brand_id: i64, product_id: i64) -> Result<Option<Rating>> {
        self.inner.rating(brand_id, product_id).await
    }

    async fn content_overrides(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Vec<ContentOverride>> {
        self.inner.content_overrides(brand_id, product_id, keyword).await
    }

    async fn page_content(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Option<PageContent>> {
        self.inner.page_content(brand_id, product_id, keyword).await
    }

    async fn insert_page_content(&self, content: PageContent) -> Result<InsertOutcome> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_page_content(content).await
    }

    async fn replace_page_content(&self, content: PageContent) -> Result<()> {
        self.inner.replace_page_content(content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_catalog_matches_its_documented_shape() {
        init_test_logging(None);
        let catalog = fixture_catalog();

        assert_eq!(catalog.list_families().await.unwrap().len(), 2);
        assert_eq!(catalog.list_brands().await.unwrap().len(), 2);
        assert_eq!(catalog.relations_by_brand(1).await.unwrap().len(), 2);
        assert_eq!(catalog.relations_by_brand(2).await.unwrap().len(), 1);

        let laundry = catalog.family_by_slug("laundry").await.unwrap().unwrap();
        let slugs: Vec<_> = catalog
            .products_by_family(laundry.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, ["dryer", "washing-machine"]);
    }

    #[tokio::test]
    async fn counting_catalog_tracks_the_watched_calls() {
        let catalog = CountingCatalog::new(fixture_catalog());

        catalog.brand_by_slug("lg").await.unwrap();
        catalog.brand_by_id(1).await.unwrap();

        assert_eq!(catalog.brand_lookups(), 1);
        assert_eq!(catalog.insert_attempts(), 0);
        assert_eq!(catalog.page_count(), 0);
    }

    #[test]
    fn resolved_page_fixture_is_internally_consistent() {
        let page = fixture_resolved_page(Keyword::Hotline);
        assert_eq!(page.identity.brand_slug, page.brand.slug);
        assert_eq!(page.identity.product_slug, page.product.slug);
        assert_eq!(page.product.family_id, page.family.id);
    }
}
