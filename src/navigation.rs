//! Prev/next navigation between sibling pages.
//!
//! The six keywords have one fixed total order ([`Keyword::ALL`]); within a
//! (brand, product) pair, a navigation step simply moves one position in
//! that order. At the edges of the order the step crosses into the adjacent
//! product - alphabetically previous/next by slug among the products
//! reachable from the same brand - landing on that product's *last* keyword
//! (going backward) or *first* keyword (going forward).
//!
//! Resolution is split into two explicit steps on purpose:
//!
//! 1. [`step`] is pure and O(1): it inspects only the keyword and reports
//!    either the in-product neighbor or a [`NeighborHint::CrossProduct`]
//!    flag. The hint variant *is* the `needs_product_fetch` signal.
//! 2. [`resolve`] completes the hints against the catalog, paying the
//!    product-list lookup only when a hint actually crosses a boundary.
//!
//! When no adjacent product exists (the brand's first or last product at
//! the matching keyword edge) the neighbor degrades to `None` - a valid
//! terminal state, not an error. For a fixed catalog snapshot the whole
//! resolution is a pure function; alphabetical product slug order is the
//! only tie-break.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Brand, CatalogStore, Product};
use crate::keyword::Keyword;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the previous page
    Prev,
    /// Toward the next page
    Next,
}

/// First-pass neighbor computation for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborHint {
    /// Neighbor is within the same product, at this keyword.
    Step(Keyword),
    /// Neighbor lies in the adjacent product; resolving it needs a catalog
    /// lookup beyond the current product row.
    CrossProduct(Direction),
}

impl NeighborHint {
    /// Whether completing this hint requires fetching the brand's product
    /// list.
    #[must_use]
    pub const fn needs_product_fetch(&self) -> bool {
        matches!(self, Self::CrossProduct(_))
    }
}

/// The pair of first-pass hints for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborHints {
    /// Hint toward the previous page
    pub prev: NeighborHint,
    /// Hint toward the next page
    pub next: NeighborHint,
}

/// A fully resolved neighbor reference, enough to build its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// Brand slug of the neighbor
    pub brand_slug: String,
    /// Product slug of the neighbor
    pub product_slug: String,
    /// Product display name, for anchor labels
    pub product_name: String,
    /// Keyword of the neighbor
    pub keyword: Keyword,
}

impl PageRef {
    /// Route path of the neighbor page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}/{}", self.brand_slug, self.product_slug, self.keyword.slug())
    }
}

/// Resolved prev/next neighbors; `None` marks a global boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Neighbors {
    /// The previous page, if one exists
    pub prev: Option<PageRef>,
    /// The next page, if one exists
    pub next: Option<PageRef>,
}

/// Pure O(1) first pass: step one position in the keyword order, flagging
/// boundary crossings instead of resolving them.
#[must_use]
pub fn step(keyword: Keyword) -> NeighborHints {
    NeighborHints {
        prev: keyword
            .prev()
            .map_or(NeighborHint::CrossProduct(Direction::Prev), NeighborHint::Step),
        next: keyword
            .next()
            .map_or(NeighborHint::CrossProduct(Direction::Next), NeighborHint::Step),
    }
}

/// Second pass: complete both hints against the catalog.
///
/// The product-list lookup runs at most once, and only when at least one
/// hint crosses a product boundary.
pub async fn resolve<S: CatalogStore>(
    store: &S,
    brand: &Brand,
    product: &Product,
    hints: NeighborHints,
) -> Result<Neighbors> {
    let needs_fetch = hints.prev.needs_product_fetch() || hints.next.needs_product_fetch();
    let siblings = if needs_fetch { Some(reachable_products(store, brand).await?) } else { None };

    let complete = |hint: NeighborHint| -> Option<PageRef> {
        match hint {
            NeighborHint::Step(keyword) => Some(PageRef {
                brand_slug: brand.slug.clone(),
                product_slug: product.slug.clone(),
                product_name: product.name.clone(),
                keyword,
            }),
            NeighborHint::CrossProduct(direction) => {
                let siblings = siblings.as_ref()?;
                let adjacent = adjacent_product(siblings, &product.slug, direction)?;
                let keyword = match direction {
                    Direction::Prev => Keyword::last(),
                    Direction::Next => Keyword::first(),
                };
                Some(PageRef {
                    brand_slug: brand.slug.clone(),
                    product_slug: adjacent.slug.clone(),
                    product_name: adjacent.name.clone(),
                    keyword,
                })
            }
        }
    };

    Ok(Neighbors { prev: complete(hints.prev), next: complete(hints.next) })
}

/// Convenience wrapper running both passes.
pub async fn neighbors<S: CatalogStore>(
    store: &S,
    brand: &Brand,
    product: &Product,
    keyword: Keyword,
) -> Result<Neighbors> {
    resolve(store, brand, product, step(keyword)).await
}

/// All products reachable from the brand through its family relations,
/// sorted by slug. `BTreeMap` keyed on slug gives the alphabetical order
/// and deduplicates should two families ever share a product.
async fn reachable_products<S: CatalogStore>(store: &S, brand: &Brand) -> Result<Vec<Product>> {
    let relations = store
        .relations_by_brand(brand.id)
        .await
        .context("querying brand relations for navigation")?;

    let mut by_slug = BTreeMap::new();
    for relation in relations {
        let products = store
            .products_by_family(relation.family_id)
            .await
            .context("querying family products for navigation")?;
        for product in products {
            by_slug.insert(product.slug.clone(), product);
        }
    }
    Ok(by_slug.into_values().collect())
}

fn adjacent_product<'a>(
    siblings: &'a [Product],
    current_slug: &str,
    direction: Direction,
) -> Option<&'a Product> {
    let position = siblings.iter().position(|p| p.slug == current_slug)?;
    match direction {
        Direction::Prev => position.checked_sub(1).map(|i| &siblings[i]),
        Direction::Next => siblings.get(position + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_catalog;

    async fn fixture_pair(
        catalog: &crate::catalog::MemoryCatalog,
        product_slug: &str,
    ) -> (Brand, Product) {
        let brand = catalog.brand_by_slug("lg").await.unwrap().unwrap();
        let product = catalog.product_by_slug(product_slug).await.unwrap().unwrap();
        (brand, product)
    }

    #[test]
    fn mid_order_step_stays_within_the_product() {
        let hints = step(Keyword::Maintenance);
        assert_eq!(hints.prev, NeighborHint::Step(Keyword::Hotline));
        assert_eq!(hints.next, NeighborHint::Step(Keyword::Numbers));
        assert!(!hints.prev.needs_product_fetch());
    }

    #[test]
    fn order_edges_flag_a_product_fetch() {
        let first = step(Keyword::Agency);
        assert!(first.prev.needs_product_fetch());
        assert_eq!(first.next, NeighborHint::Step(Keyword::CustomerService));

        let last = step(Keyword::Warranty);
        assert_eq!(last.prev, NeighborHint::Step(Keyword::Numbers));
        assert!(last.next.needs_product_fetch());
    }

    #[tokio::test]
    async fn crossing_backward_lands_on_previous_products_last_keyword() {
        // LG's reachable products sort as: dishwasher, dryer, refrigerator,
        // washing-machine.
        let catalog = fixture_catalog();
        let (brand, product) = fixture_pair(&catalog, "washing-machine").await;

        let result = neighbors(&catalog, &brand, &product, Keyword::Agency).await.unwrap();
        let prev = result.prev.unwrap();
        assert_eq!(prev.product_slug, "refrigerator");
        assert_eq!(prev.keyword, Keyword::Warranty);
    }

    #[tokio::test]
    async fn crossing_forward_lands_on_next_products_first_keyword() {
        let catalog = fixture_catalog();
        let (brand, product) = fixture_pair(&catalog, "dishwasher").await;

        let result = neighbors(&catalog, &brand, &product, Keyword::Warranty).await.unwrap();
        let next = result.next.unwrap();
        assert_eq!(next.product_slug, "dryer");
        assert_eq!(next.keyword, Keyword::Agency);
    }

    #[tokio::test]
    async fn global_boundaries_degrade_to_none() {
        let catalog = fixture_catalog();

        // First product, first keyword: nothing before it.
        let (brand, first) = fixture_pair(&catalog, "dishwasher").await;
        let result = neighbors(&catalog, &brand, &first, Keyword::Agency).await.unwrap();
        assert!(result.prev.is_none());
        assert!(result.next.is_some());

        // Last product, last keyword: nothing after it.
        let (brand, last) = fixture_pair(&catalog, "washing-machine").await;
        let result = neighbors(&catalog, &brand, &last, Keyword::Warranty).await.unwrap();
        assert!(result.prev.is_some());
        assert!(result.next.is_none());
    }

    #[tokio::test]
    async fn next_and_prev_are_anti_symmetric_across_the_boundary() {
        let catalog = fixture_catalog();
        let (brand, dishwasher) = fixture_pair(&catalog, "dishwasher").await;
        let (_, dryer) = fixture_pair(&catalog, "dryer").await;

        let forward =
            neighbors(&catalog, &brand, &dishwasher, Keyword::Warranty).await.unwrap();
        let next = forward.next.unwrap();
        assert_eq!(next.path(), "/lg/dryer/agency");

        let backward = neighbors(&catalog, &brand, &dryer, Keyword::Agency).await.unwrap();
        let prev = backward.prev.unwrap();
        assert_eq!(prev.path(), "/lg/dishwasher/warranty");
    }
}
