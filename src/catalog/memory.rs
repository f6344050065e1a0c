//! In-memory catalog store.
//!
//! Backs the CLI (after loading a catalog file) and the test suites. The
//! entity tables are built once during the load phase through the `insert_*`
//! methods and are immutable afterwards; only the page-content table mutates
//! at runtime, through a `DashMap` whose entry API gives the atomic
//! insert-if-absent the materializer relies on.
//!
//! Global product-slug uniqueness is enforced here, at write time:
//! [`MemoryCatalog::insert_product`] rejects a slug already used anywhere in
//! the catalog with [`PagegenError::SlugCollision`]. A collision is fatal for
//! the load, never silently disambiguated.

use anyhow::{Result, anyhow};
use dashmap::DashMap;
use std::collections::HashMap;

use super::{
    Brand, BrandFamilyRelation, CatalogStore, ContentOverride, Family, InsertOutcome, PageContent,
    Product, Rating,
};
use crate::core::PagegenError;
use crate::keyword::Keyword;

/// In-memory implementation of [`CatalogStore`].
///
/// Cheap to clone the `Arc` it is usually wrapped in; safe for concurrent
/// queries. See the module docs for the build-then-query lifecycle.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    families: HashMap<i64, Family>,
    family_slugs: HashMap<String, i64>,
    brands: HashMap<i64, Brand>,
    brand_slugs: HashMap<String, i64>,
    products: HashMap<i64, Product>,
    product_slugs: HashMap<String, i64>,
    relations: Vec<BrandFamilyRelation>,
    ratings: HashMap<(i64, i64), Rating>,
    overrides: Vec<ContentOverride>,
    pages: DashMap<(i64, i64, Keyword), PageContent>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a family. Fails on duplicate id or slug.
    pub fn insert_family(&mut self, family: Family) -> Result<()> {
        if self.families.contains_key(&family.id) {
            return Err(anyhow!("duplicate family id {}", family.id));
        }
        if self.family_slugs.contains_key(&family.slug) {
            return Err(anyhow!("duplicate family slug '{}'", family.slug));
        }
        self.family_slugs.insert(family.slug.clone(), family.id);
        self.families.insert(family.id, family);
        Ok(())
    }

    /// Add a brand. Fails on duplicate id or slug.
    pub fn insert_brand(&mut self, brand: Brand) -> Result<()> {
        if self.brands.contains_key(&brand.id) {
            return Err(anyhow!("duplicate brand id {}", brand.id));
        }
        if self.brand_slugs.contains_key(&brand.slug) {
            return Err(anyhow!("duplicate brand slug '{}'", brand.slug));
        }
        self.brand_slugs.insert(brand.slug.clone(), brand.id);
        self.brands.insert(brand.id, brand);
        Ok(())
    }

    /// Add a product, enforcing global slug uniqueness.
    ///
    /// A slug reused anywhere in the catalog - including by a product in a
    /// *different* family - fails with [`PagegenError::SlugCollision`]. The
    /// owning family must already exist.
    pub fn insert_product(&mut self, product: Product) -> Result<(), PagegenError> {
        if let Some(&existing_id) = self.product_slugs.get(&product.slug) {
            let existing = self
                .products
                .get(&existing_id)
                .map_or_else(|| "<unknown>".to_string(), |p| p.name.clone());
            return Err(PagegenError::SlugCollision {
                slug: product.slug,
                existing,
                conflicting: product.name,
            });
        }
        if !self.families.contains_key(&product.family_id) {
            return Err(PagegenError::CatalogParse {
                file: "<catalog>".to_string(),
                reason: format!(
                    "product '{}' references missing family id {}",
                    product.slug, product.family_id
                ),
            });
        }
        self.product_slugs.insert(product.slug.clone(), product.id);
        self.products.insert(product.id, product);
        Ok(())
    }

    /// Relate a brand to a family. Both must already exist.
    pub fn relate(&mut self, brand_id: i64, family_id: i64) -> Result<()> {
        if !self.brands.contains_key(&brand_id) {
            return Err(anyhow!("relation references missing brand id {brand_id}"));
        }
        if !self.families.contains_key(&family_id) {
            return Err(anyhow!("relation references missing family id {family_id}"));
        }
        let relation = BrandFamilyRelation { brand_id, family_id };
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        Ok(())
    }

    /// Add a rating row for a (brand, product) pair.
    pub fn insert_rating(&mut self, rating: Rating) {
        self.ratings.insert((rating.brand_id, rating.product_id), rating);
    }

    /// Add a manual content override.
    pub fn insert_override(&mut self, content_override: ContentOverride) {
        self.overrides.push(content_override);
    }

    /// Number of stored page-content rows. Used by tests and batch reports.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl CatalogStore for MemoryCatalog {
    async fn family_by_id(&self, id: i64) -> Result<Option<Family>> {
        Ok(self.families.get(&id).cloned())
    }

    async fn family_by_slug(&self, slug: &str) -> Result<Option<Family>> {
        Ok(self.family_slugs.get(slug).and_then(|id| self.families.get(id)).cloned())
    }

    async fn list_families(&self) -> Result<Vec<Family>> {
        let mut families: Vec<_> = self.families.values().cloned().collect();
        families.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(families)
    }

    async fn brand_by_id(&self, id: i64) -> Result<Option<Brand>> {
        Ok(self.brands.get(&id).cloned())
    }

    async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>> {
        Ok(self.brand_slugs.get(slug).and_then(|id| self.brands.get(id)).cloned())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        let mut brands: Vec<_> = self.brands.values().cloned().collect();
        brands.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(brands)
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        Ok(self.product_slugs.get(slug).and_then(|id| self.products.get(id)).cloned())
    }

    async fn products_by_family(&self, family_id: i64) -> Result<Vec<Product>> {
        let mut products: Vec<_> =
            self.products.values().filter(|p| p.family_id == family_id).cloned().collect();
        products.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(products)
    }

    async fn relations_by_brand(&self, brand_id: i64) -> Result<Vec<BrandFamilyRelation>> {
        Ok(self.relations.iter().filter(|r| r.brand_id == brand_id).copied().collect())
    }

    async fn relations_by_family(&self, family_id: i64) -> Result<Vec<BrandFamilyRelation>> {
        Ok(self.relations.iter().filter(|r| r.family_id == family_id).copied().collect())
    }

    async fn rating(&self, brand_id: i64, product_id: i64) -> Result<Option<Rating>> {
        Ok(self.ratings.get(&(brand_id, product_id)).copied())
    }

    async fn content_overrides(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Vec<ContentOverride>> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| {
                o.brand_id == brand_id && o.product_id == product_id && o.keyword == keyword
            })
            .cloned()
            .collect())
    }

    async fn page_content(
        &self,
        brand_id: i64,
        product_id: i64,
        keyword: Keyword,
    ) -> Result<Option<PageContent>> {
        Ok(self.pages.get(&(brand_id, product_id, keyword)).map(|entry| entry.value().clone()))
    }

    async fn insert_page_content(&self, content: PageContent) -> Result<InsertOutcome> {
        let key = (content.brand_id, content.product_id, content.keyword);
        // Entry API makes the check-and-insert atomic, standing in for the
        // relational store's uniqueness constraint.
        match self.pages.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                Ok(InsertOutcome::Exists(entry.get().clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(content);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn replace_page_content(&self, content: PageContent) -> Result<()> {
        let key = (content.brand_id, content.product_id, content.keyword);
        self.pages.insert(key, content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn family(id: i64, slug: &str) -> Family {
        Family {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        }
    }

    fn product(id: i64, slug: &str, family_id: i64) -> Product {
        Product { id, name: slug.to_string(), slug: slug.to_string(), family_id }
    }

    fn content(brand_id: i64, product_id: i64, keyword: Keyword, title: &str) -> PageContent {
        PageContent {
            brand_id,
            product_id,
            keyword,
            title: title.to_string(),
            meta_description: String::new(),
            h1: String::new(),
            body_sections: Vec::new(),
            schema_objects: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn cross_family_slug_collision_is_rejected() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert_family(family(1, "kitchen")).unwrap();
        catalog.insert_family(family(2, "laundry")).unwrap();
        catalog.insert_product(product(1, "mixer", 1)).unwrap();

        let err = catalog.insert_product(product(2, "mixer", 2)).unwrap_err();
        assert!(matches!(err, PagegenError::SlugCollision { .. }));
    }

    #[test]
    fn product_requires_existing_family() {
        let mut catalog = MemoryCatalog::new();
        let err = catalog.insert_product(product(1, "tv", 9)).unwrap_err();
        assert!(matches!(err, PagegenError::CatalogParse { .. }));
    }

    #[tokio::test]
    async fn insert_if_absent_returns_first_row_on_duplicate() {
        let catalog = MemoryCatalog::new();
        let first = content(1, 1, Keyword::Maintenance, "first");

        let outcome = catalog.insert_page_content(first.clone()).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted));

        let duplicate = content(1, 1, Keyword::Maintenance, "second");
        match catalog.insert_page_content(duplicate).await.unwrap() {
            InsertOutcome::Exists(stored) => assert_eq!(stored.title, "first"),
            InsertOutcome::Inserted => panic!("duplicate insert must not create a second row"),
        }
        assert_eq!(catalog.page_count(), 1);
    }

    #[tokio::test]
    async fn replace_overwrites_the_stored_row() {
        let catalog = MemoryCatalog::new();
        catalog.insert_page_content(content(1, 1, Keyword::Warranty, "old")).await.unwrap();
        catalog.replace_page_content(content(1, 1, Keyword::Warranty, "new")).await.unwrap();

        let stored = catalog.page_content(1, 1, Keyword::Warranty).await.unwrap().unwrap();
        assert_eq!(stored.title, "new");
        assert_eq!(catalog.page_count(), 1);
    }

    #[tokio::test]
    async fn products_by_family_sorts_by_slug() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert_family(family(1, "appliances")).unwrap();
        catalog.insert_product(product(1, "washing-machine", 1)).unwrap();
        catalog.insert_product(product(2, "dishwasher", 1)).unwrap();
        catalog.insert_product(product(3, "refrigerator", 1)).unwrap();

        let slugs: Vec<_> = catalog
            .products_by_family(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, ["dishwasher", "refrigerator", "washing-machine"]);
    }
}
