//! schema.org structured-data records.
//!
//! A fixed small set per page, always in the same order: Organization,
//! Product, LocalBusiness, BreadcrumbList, WebPage. All of them are
//! populated from the same three identifiers plus the rating; none of them
//! touches request state.
//!
//! The BreadcrumbList has exactly 4 ordered items - home, brand, product,
//! keyword - and the item order must match the navigational hierarchy
//! exactly; position values are 1-based as schema.org requires.

use serde_json::{Value, json};

use crate::catalog::Rating;
use crate::config::SiteConfig;
use crate::resolver::ResolvedPage;

/// Build the full fixed record set for one page.
#[must_use]
pub fn build_all(
    page: &ResolvedPage,
    rating: &Rating,
    site: &SiteConfig,
    title: &str,
    description: &str,
) -> Vec<Value> {
    let canonical = site.canonical_url(&page.identity.path());
    vec![
        organization(site),
        product(page, rating),
        local_business(page, site),
        breadcrumbs(page, site),
        web_page(title, description, &canonical),
    ]
}

fn organization(site: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": site.site_name,
        "url": site.base_url,
    })
}

fn product(page: &ResolvedPage, rating: &Rating) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": format!("{} {}", page.brand.name, page.product.name),
        "brand": {
            "@type": "Brand",
            "name": page.brand.name,
        },
        "category": page.family.name,
        "aggregateRating": {
            "@type": "AggregateRating",
            // Unrounded by design; display rounding never reaches here.
            "ratingValue": rating.value,
            "reviewCount": rating.count,
            "bestRating": 5,
            "worstRating": 0,
        },
    })
}

fn local_business(page: &ResolvedPage, site: &SiteConfig) -> Value {
    let keyword = page.keyword();
    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": format!("{} {} {}", keyword.display_ar(), page.brand.name, page.product.name),
        "url": site.canonical_url(&page.identity.path()),
        "areaServed": "EG",
        "parentOrganization": {
            "@type": "Organization",
            "name": site.site_name,
        },
    })
}

/// Exactly 4 items: home → brand → product → keyword.
fn breadcrumbs(page: &ResolvedPage, site: &SiteConfig) -> Value {
    let brand_url = site.canonical_url(&format!("/{}", page.brand.slug));
    let product_url =
        site.canonical_url(&format!("/{}/{}", page.brand.slug, page.product.slug));
    let keyword_url = site.canonical_url(&page.identity.path());

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            {
                "@type": "ListItem",
                "position": 1,
                "name": "الرئيسية",
                "item": site.base_url,
            },
            {
                "@type": "ListItem",
                "position": 2,
                "name": page.brand.name,
                "item": brand_url,
            },
            {
                "@type": "ListItem",
                "position": 3,
                "name": page.product.name,
                "item": product_url,
            },
            {
                "@type": "ListItem",
                "position": 4,
                "name": page.keyword().display_ar(),
                "item": keyword_url,
            },
        ],
    })
}

fn web_page(title: &str, description: &str, canonical: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebPage",
        "name": title,
        "description": description,
        "url": canonical,
        "inLanguage": "ar",
    })
}
