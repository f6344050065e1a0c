//! Catalog entities and the injected store capability.
//!
//! The catalog - families, brands, products, brand-family relations, plus
//! optional ratings and per-section content overrides - is owned by an
//! external datastore. pagegen never owns it; every pipeline component
//! receives a read-mostly [`CatalogStore`] capability and queries it. No
//! component holds ambient or global state.
//!
//! # Data Model
//!
//! - [`Family`] groups products by category ("home appliances").
//! - [`Product`] belongs to exactly one family; its slug is **globally**
//!   unique across the catalog, not merely within its family.
//! - [`Brand`] is a manufacturer entity with display metadata.
//! - [`BrandFamilyRelation`] is the many-to-many join that is the single
//!   authority for "does this brand sell this product line". A product is
//!   reachable from a brand only through its family being related.
//! - [`PageIdentity`] is the composite natural key
//!   (brand slug, product slug, keyword) addressing one page.
//! - [`PageContent`] is the materialized artifact, unique per identity,
//!   owned by the materializer.
//!
//! # Write Surface
//!
//! The only writes the pipeline performs are on page content:
//! [`CatalogStore::insert_page_content`] is an insert-if-absent backed by the
//! store's uniqueness constraint on (brand id, product id, keyword) and
//! reports a duplicate via [`InsertOutcome::Exists`] rather than an error -
//! that value is the whole concurrency-control mechanism for
//! materialization. [`CatalogStore::replace_page_content`] overwrites and is
//! only reached through an explicit force-refresh.

pub mod loader;
pub mod memory;

pub use loader::load_catalog;
pub use memory::MemoryCatalog;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{BodySection, SectionKind};
use crate::keyword::Keyword;

/// A product category grouping (e.g. "home appliances").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Catalog row id
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL slug, unique among families
    pub slug: String,
    /// Short description used in body copy
    pub description: String,
}

/// A specific product line belonging to one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog row id
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL slug, unique across the **entire** catalog
    pub slug: String,
    /// Owning family id
    pub family_id: i64,
}

/// A manufacturer/trademark entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Catalog row id
    pub id: i64,
    /// Display name (e.g. "LG")
    pub name: String,
    /// URL slug, unique among brands
    pub slug: String,
    /// Reference to the brand logo in external image storage
    #[serde(default)]
    pub logo_ref: Option<String>,
    /// Reference to the brand banner in external image storage
    #[serde(default)]
    pub banner_ref: Option<String>,
    /// Optional hand-written meta title, used ahead of the synthesized one
    /// on brand-level surfaces (not per-keyword pages)
    #[serde(default)]
    pub meta_title: Option<String>,
    /// Optional hand-written meta description, same scope as `meta_title`
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Many-to-many join between brands and families.
///
/// This join is the authority for brand-product reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFamilyRelation {
    /// Brand side of the relation
    pub brand_id: i64,
    /// Family side of the relation
    pub family_id: i64,
}

/// An aggregate rating for a (brand, product) pair.
///
/// Optional everywhere it is consumed; [`Rating::placeholder`] supplies the
/// designed fallback when the catalog has no row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Brand side of the rated pair
    pub brand_id: i64,
    /// Product side of the rated pair
    pub product_id: i64,
    /// Rating value on a 0-5 scale, carried unrounded into structured data
    pub value: f64,
    /// Number of reviews behind the value
    pub count: u32,
}

impl Rating {
    /// The fixed placeholder rating used when no catalog row exists.
    #[must_use]
    pub const fn placeholder(brand_id: i64, product_id: i64) -> Self {
        Self {
            brand_id,
            product_id,
            value: crate::constants::DEFAULT_RATING_VALUE,
            count: crate::constants::DEFAULT_RATING_COUNT,
        }
    }

    /// Star count for display: value rounded to the nearest integer,
    /// clamped to [0, 5]. Display-only; structured data keeps the raw value.
    #[must_use]
    pub fn stars(&self) -> u8 {
        let rounded = self.value.round();
        rounded.clamp(0.0, 5.0) as u8
    }
}

/// Manually authored content that supersedes one synthesized section of one
/// page. Override wins; synthesized text is the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOverride {
    /// Brand scope of the override
    pub brand_id: i64,
    /// Product scope of the override
    pub product_id: i64,
    /// Keyword scope of the override
    pub keyword: Keyword,
    /// Which generated section the override replaces
    pub section: SectionKind,
    /// Replacement body text, used verbatim in place of the synthesized text
    pub body: String,
}

/// The composite natural key addressing one page.
///
/// Two identities are equal iff all three components are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageIdentity {
    /// Brand slug component
    pub brand_slug: String,
    /// Product slug component
    pub product_slug: String,
    /// Keyword component
    pub keyword: Keyword,
}

impl PageIdentity {
    /// Build an identity from its three components.
    pub fn new(
        brand_slug: impl Into<String>,
        product_slug: impl Into<String>,
        keyword: Keyword,
    ) -> Self {
        Self { brand_slug: brand_slug.into(), product_slug: product_slug.into(), keyword }
    }

    /// The route path for this identity: `/{brand}/{product}/{keyword}`.
    ///
    /// Derived purely from the three slugs; the canonical URL is this path
    /// joined under the configured site base URL.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}/{}", self.brand_slug, self.product_slug, self.keyword.slug())
    }
}

impl std::fmt::Display for PageIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// The materialized artifact for one page identity.
///
/// Created on first successful synthesis, never duplicated (the store keeps
/// a uniqueness constraint on (brand id, product id, keyword)), and only
/// refreshed by an explicit force revalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Brand component of the unique key
    pub brand_id: i64,
    /// Product component of the unique key
    pub product_id: i64,
    /// Keyword component of the unique key
    pub keyword: Keyword,
    /// Synthesized page title
    pub title: String,
    /// Synthesized meta description
    pub meta_description: String,
    /// Synthesized H1 heading
    pub h1: String,
    /// Ordered body sections, overrides already applied and emphasis
    /// markup already woven in
    pub body_sections: Vec<BodySection>,
    /// schema.org structured-data records for the page
    pub schema_objects: Vec<Value>,
    /// When this artifact was synthesized
    pub generated_at: DateTime<Utc>,
}

/// Result of an insert-if-absent on the page-content table.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The row was inserted; this call materialized the page.
    Inserted,
    /// A row already existed for the identity; the stored artifact is
    /// returned so the caller can serve it. Not an error.
    Exists(PageContent),
}

/// Read-mostly query capability over the external catalog datastore.
///
/// Injected into every pipeline component; implementations must be safe to
/// call concurrently without coordination. The only mutating methods are the
/// two page-content writes documented at the module level.
#[allow(async_fn_in_trait)]
pub trait CatalogStore: Send + Sync {
    /// Fetch a family by row id.
    async fn family_by_id(&self, id: i64) -> Result<Option<Family>>;

    /// Fetch a family by slug.
    async fn family_by_slug(&self, slug: &str) -> Result<Option<Family>>;

    /// List all families.
    async fn list_families(&self) -> Result<Vec<Family>>;

    /// Fetch a brand by row id.
    async fn brand_by_id(&self, id: i64) -> Result<Option<Brand>>;

    /// Fetch a brand by slug.
    async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>>;

    /// List all brands.
    async fn list_brands(&self) -> Result<Vec<Brand>>;

    /// Fetch a product by its globally unique slug.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>>;

    /// List a family's products.
    async fn products_by_family(&self, family_id: i64) -> Result<Vec<Product>>;

    /// List brand-family relations for one brand.
    async fn relations_by_brand(&self, brand_id: i64) -> Result<Vec<BrandFamilyRelation>>;

    /// List brand-family relations for one family.
    async fn relations_by_family(&self, family_id: i64) -> Result<Vec<BrandFamilyRelation>>;

    /// Fetch the rating for a (brand, product) pair, if any.
    async fn rating(&self, brand_id: i64, product_id: i64) -> Result<Option<Rating>>;

    /// List manual content overrides scoped to one page identity.
    async fn content_overrides(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Vec<ContentOverride>>;

    /// Fetch stored page content by its unique key, if materialized.
    async fn page_content(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Option<PageContent>>;

    /// Insert page content if no row exists for its key.
    ///
    /// A concurrent or repeated insert for the same key must atomically
    /// resolve to [`InsertOutcome::Exists`] carrying the stored row.
    async fn insert_page_content(&self, content: PageContent) -> Result<InsertOutcome>;

    /// Overwrite page content for its key, inserting if absent.
    ///
    /// Only reached through an explicit force revalidation.
    async fn replace_page_content(&self, content: PageContent) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equality_is_component_wise() {
        let a = PageIdentity::new("lg", "washing-machine", Keyword::Maintenance);
        let b = PageIdentity::new("lg", "washing-machine", Keyword::Maintenance);
        let c = PageIdentity::new("lg", "washing-machine", Keyword::Warranty);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn identity_path_joins_the_three_slugs() {
        let id = PageIdentity::new("lg", "washing-machine", Keyword::Maintenance);
        assert_eq!(id.path(), "/lg/washing-machine/maintenance");
    }

    #[test]
    fn placeholder_rating_is_the_designed_fallback() {
        let rating = Rating::placeholder(1, 2);
        assert!((rating.value - 4.7).abs() < f64::EPSILON);
        assert_eq!(rating.count, 100);
    }

    #[test]
    fn stars_round_and_clamp() {
        let mut rating = Rating::placeholder(1, 2);
        assert_eq!(rating.stars(), 5); // 4.7 rounds up

        rating.value = 4.4;
        assert_eq!(rating.stars(), 4);

        rating.value = 7.2;
        assert_eq!(rating.stars(), 5);

        rating.value = -1.0;
        assert_eq!(rating.stars(), 0);
    }
}
