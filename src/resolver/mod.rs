//! Page-identity resolution.
//!
//! The resolver decides whether a (brand, product, keyword) slug triple
//! denotes a legitimate page. It is the gate in front of every synthesis
//! stage: nothing downstream runs for a triple that does not pass here.
//!
//! Three checks, in order of increasing cost:
//!
//! 1. the keyword slug must parse into the closed six-element set,
//! 2. brand and product slugs must resolve to existing catalog rows,
//! 3. the product's family must be related to the brand through the
//!    brand-family join.
//!
//! The third check runs even when brand and product individually exist.
//! Its failure ([`PagegenError::Unrelated`]) is a deliberate "page does not
//! exist" outcome - the brand does not sell that product line - and surfaces
//! to the route layer as not-found, the same as a missing slug. The resolver
//! is read-only and safe to call from any number of tasks concurrently.
//!
//! On success the resolved entities are bundled into a [`ResolvedPage`] so
//! downstream stages never re-fetch what resolution already loaded.

use anyhow::Context;
use tracing::debug;

use crate::catalog::{Brand, CatalogStore, Family, PageIdentity, Product};
use crate::core::PagegenError;
use crate::keyword::Keyword;

/// A validated page identity bundled with its catalog entities.
///
/// Produced only by [`resolve`]; holding one is proof the triple passed all
/// three validity checks against the catalog snapshot it was resolved from.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    /// The validated composite key
    pub identity: PageIdentity,
    /// The resolved brand row
    pub brand: Brand,
    /// The resolved product row
    pub product: Product,
    /// The product's family row
    pub family: Family,
}

impl ResolvedPage {
    /// The keyword component of the identity.
    #[must_use]
    pub fn keyword(&self) -> Keyword {
        self.identity.keyword
    }
}

/// Resolve a slug triple into a [`ResolvedPage`], or a not-found error.
///
/// # Errors
///
/// - [`PagegenError::KeywordNotFound`] when the keyword slug is outside the
///   fixed set
/// - [`PagegenError::BrandNotFound`] / [`PagegenError::ProductNotFound`]
///   when a slug has no catalog row
/// - [`PagegenError::Unrelated`] when brand and product exist but no family
///   relation connects them
///
/// All four answer `true` from [`PagegenError::is_not_found`]. Store
/// failures pass through as [`PagegenError::Other`].
pub async fn resolve<S: CatalogStore>(
    store: &S,
    brand_slug: &str,
    product_slug: &str,
    keyword_slug: &str,
) -> Result<ResolvedPage, PagegenError> {
    // Cheapest check first: no catalog round-trip for a bad keyword.
    let keyword: Keyword = keyword_slug.parse()?;

    let brand = store
        .brand_by_slug(brand_slug)
        .await
        .context("querying brand by slug")?
        .ok_or_else(|| PagegenError::BrandNotFound { slug: brand_slug.to_string() })?;

    let product = store
        .product_by_slug(product_slug)
        .await
        .context("querying product by slug")?
        .ok_or_else(|| PagegenError::ProductNotFound { slug: product_slug.to_string() })?;

    // Reachability: the brand must be related to the product's family.
    // Checked even though brand and product both exist - absence of the
    // relation narrows the URL space on purpose.
    let relations = store
        .relations_by_brand(brand.id)
        .await
        .context("querying brand-family relations")?;
    if !relations.iter().any(|r| r.family_id == product.family_id) {
        debug!(
            brand = %brand.slug,
            product = %product.slug,
            "brand-product pair rejected: no family relation"
        );
        return Err(PagegenError::Unrelated {
            brand_slug: brand.slug,
            product_slug: product.slug,
        });
    }

    let family = store
        .family_by_id(product.family_id)
        .await
        .context("querying product family")?
        .ok_or_else(|| {
            // A product pointing at a missing family is catalog corruption,
            // not a user-facing not-found.
            PagegenError::Other(anyhow::anyhow!(
                "product '{}' references missing family id {}",
                product.slug,
                product.family_id
            ))
        })?;

    let identity = PageIdentity::new(&brand.slug, &product.slug, keyword);
    Ok(ResolvedPage { identity, brand, product, family })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_catalog;

    #[tokio::test]
    async fn resolves_a_valid_triple() {
        let catalog = fixture_catalog();
        let page = resolve(&catalog, "lg", "washing-machine", "maintenance").await.unwrap();

        assert_eq!(page.identity.path(), "/lg/washing-machine/maintenance");
        assert_eq!(page.brand.name, "LG");
        assert_eq!(page.product.name, "Washing Machine");
        assert_eq!(page.family.id, page.product.family_id);
    }

    #[tokio::test]
    async fn unknown_keyword_fails_before_catalog_lookups() {
        let catalog = fixture_catalog();
        let err = resolve(&catalog, "lg", "washing-machine", "repair").await.unwrap_err();
        assert!(matches!(err, PagegenError::KeywordNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_brand_and_product_are_not_found() {
        let catalog = fixture_catalog();

        let err = resolve(&catalog, "nokia", "washing-machine", "agency").await.unwrap_err();
        assert!(matches!(err, PagegenError::BrandNotFound { .. }));

        let err = resolve(&catalog, "lg", "lawnmower", "agency").await.unwrap_err();
        assert!(matches!(err, PagegenError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn existing_but_unrelated_pair_is_rejected() {
        // The fixture relates "tornado" only to the kitchen family, so the
        // laundry products exist but are unreachable from it.
        let catalog = fixture_catalog();
        let err = resolve(&catalog, "tornado", "washing-machine", "warranty").await.unwrap_err();
        assert!(matches!(err, PagegenError::Unrelated { .. }));
        assert!(err.is_not_found());
    }
}
