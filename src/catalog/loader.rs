//! Catalog file loading.
//!
//! The CLI feeds the pipeline from a TOML catalog description. The file is
//! authored with slugs only; row ids are assigned here in declaration order
//! so the rest of the system can key on them the way the real datastore
//! does.
//!
//! ```toml
//! [[families]]
//! name = "Home Appliances"
//! slug = "home-appliances"
//! description = "Large household appliances"
//!
//! [[brands]]
//! name = "LG"
//! slug = "lg"
//!
//! [[products]]
//! name = "Washing Machine"
//! slug = "washing-machine"
//! family = "home-appliances"
//!
//! [[relations]]
//! brand = "lg"
//! family = "home-appliances"
//!
//! [[ratings]]
//! brand = "lg"
//! product = "washing-machine"
//! value = 4.8
//! count = 214
//!
//! [[overrides]]
//! brand = "lg"
//! product = "washing-machine"
//! keyword = "maintenance"
//! section = "intro"
//! body = "نص مخصص يحل محل المقدمة المولدة."
//! ```
//!
//! All cross-references are resolved during the load; a dangling slug or a
//! product-slug collision fails the whole load rather than producing a
//! partially valid catalog.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{Brand, ContentOverride, Family, MemoryCatalog, Product, Rating};
use crate::content::SectionKind;
use crate::core::PagegenError;
use crate::keyword::Keyword;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    families: Vec<FamilyEntry>,
    #[serde(default)]
    brands: Vec<BrandEntry>,
    #[serde(default)]
    products: Vec<ProductEntry>,
    #[serde(default)]
    relations: Vec<RelationEntry>,
    #[serde(default)]
    ratings: Vec<RatingEntry>,
    #[serde(default)]
    overrides: Vec<OverrideEntry>,
}

#[derive(Debug, Deserialize)]
struct FamilyEntry {
    name: String,
    slug: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct BrandEntry {
    name: String,
    slug: String,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    banner: Option<String>,
    #[serde(default)]
    meta_title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    name: String,
    slug: String,
    family: String,
}

#[derive(Debug, Deserialize)]
struct RelationEntry {
    brand: String,
    family: String,
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    brand: String,
    product: String,
    value: f64,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct OverrideEntry {
    brand: String,
    product: String,
    keyword: Keyword,
    section: SectionKind,
    body: String,
}

/// Load a TOML catalog file into a [`MemoryCatalog`].
///
/// Ids are assigned in declaration order starting at 1 per entity kind.
/// Fails on TOML syntax errors, dangling slug references, duplicate slugs,
/// and - fatally, per the global uniqueness invariant - product slug
/// collisions across families.
pub async fn load_catalog(path: &Path) -> Result<MemoryCatalog> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading catalog file {}", path.display()))?;
    let file_name = path.display().to_string();

    let parsed: CatalogFile =
        toml::from_str(&raw).map_err(|e| PagegenError::CatalogParse {
            file: file_name.clone(),
            reason: e.to_string(),
        })?;

    let dangling = |reason: String| PagegenError::CatalogParse {
        file: file_name.clone(),
        reason,
    };

    let mut catalog = MemoryCatalog::new();
    let mut family_ids: HashMap<String, i64> = HashMap::new();
    let mut brand_ids: HashMap<String, i64> = HashMap::new();
    let mut product_ids: HashMap<String, i64> = HashMap::new();

    for (index, entry) in parsed.families.into_iter().enumerate() {
        let id = index as i64 + 1;
        family_ids.insert(entry.slug.clone(), id);
        catalog.insert_family(Family {
            id,
            name: entry.name,
            slug: entry.slug,
            description: entry.description,
        })?;
    }

    for (index, entry) in parsed.brands.into_iter().enumerate() {
        let id = index as i64 + 1;
        brand_ids.insert(entry.slug.clone(), id);
        catalog.insert_brand(Brand {
            id,
            name: entry.name,
            slug: entry.slug,
            logo_ref: entry.logo,
            banner_ref: entry.banner,
            meta_title: entry.meta_title,
            meta_description: entry.meta_description,
        })?;
    }

    for (index, entry) in parsed.products.into_iter().enumerate() {
        let id = index as i64 + 1;
        let family_id = *family_ids
            .get(&entry.family)
            .ok_or_else(|| {
                dangling(format!(
                    "product '{}' references unknown family '{}'",
                    entry.slug, entry.family
                ))
            })?;
        product_ids.insert(entry.slug.clone(), id);
        catalog.insert_product(Product { id, name: entry.name, slug: entry.slug, family_id })?;
    }

    for entry in parsed.relations {
        let brand_id = *brand_ids
            .get(&entry.brand)
            .ok_or_else(|| dangling(format!("relation references unknown brand '{}'", entry.brand)))?;
        let family_id = *family_ids
            .get(&entry.family)
            .ok_or_else(|| {
                dangling(format!("relation references unknown family '{}'", entry.family))
            })?;
        catalog.relate(brand_id, family_id)?;
    }

    for entry in parsed.ratings {
        let brand_id = *brand_ids
            .get(&entry.brand)
            .ok_or_else(|| dangling(format!("rating references unknown brand '{}'", entry.brand)))?;
        let product_id = *product_ids
            .get(&entry.product)
            .ok_or_else(|| {
                dangling(format!("rating references unknown product '{}'", entry.product))
            })?;
        catalog.insert_rating(Rating { brand_id, product_id, value: entry.value, count: entry.count });
    }

    for entry in parsed.overrides {
        let brand_id = *brand_ids
            .get(&entry.brand)
            .ok_or_else(|| dangling(format!("override references unknown brand '{}'", entry.brand)))?;
        let product_id = *product_ids
            .get(&entry.product)
            .ok_or_else(|| {
                dangling(format!("override references unknown product '{}'", entry.product))
            })?;
        catalog.insert_override(ContentOverride {
            brand_id,
            product_id,
            keyword: entry.keyword,
            section: entry.section,
            body: entry.body,
        });
    }

    debug!(path = %path.display(), "catalog loaded");
    Ok(catalog)
}
