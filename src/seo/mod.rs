//! SEO artifact synthesis.
//!
//! Pure, total, deterministic: given resolved catalog entities, a rating
//! (or its designed placeholder), and the fixed site identity, produce every
//! head-of-page artifact - title, H1, meta description, keyword string,
//! canonical URL, Open Graph and Twitter card fields, and the schema.org
//! structured-data records (see [`schema`]).
//!
//! Two properties hold by construction and are asserted by tests:
//!
//! - calling [`synthesize`] twice with the same inputs yields identical
//!   artifacts byte for byte - there is no clock, randomness, or request
//!   state anywhere in this module;
//! - the canonical URL is derived solely from the three slugs and the
//!   configured base URL. Ratings, overrides, and anything else may change
//!   without moving the canonical.

pub mod schema;

use serde::{Deserialize, Serialize};

use crate::catalog::Rating;
use crate::config::SiteConfig;
use crate::keyword::Keyword;
use crate::resolver::ResolvedPage;

/// Open Graph fields for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    /// `og:title`
    pub title: String,
    /// `og:description`
    pub description: String,
    /// `og:url` - mirrors the canonical URL
    pub url: String,
    /// `og:site_name` - fixed site identity
    pub site_name: String,
    /// `og:locale` - fixed site identity
    pub locale: String,
    /// `og:type`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Twitter card fields for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterCard {
    /// `twitter:card`
    pub card: String,
    /// `twitter:site`
    pub site: String,
    /// `twitter:title`
    pub title: String,
    /// `twitter:description`
    pub description: String,
}

/// Everything the head of one page needs, synthesized in one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoArtifacts {
    /// Page title
    pub title: String,
    /// H1 heading (keyword-first, same identifiers as the title)
    pub h1: String,
    /// Meta description
    pub meta_description: String,
    /// Meta keywords string
    pub keywords: String,
    /// Canonical URL - pure function of the three slugs and the base URL
    pub canonical_url: String,
    /// Open Graph fields
    pub open_graph: OpenGraph,
    /// Twitter card fields
    pub twitter: TwitterCard,
    /// schema.org records in fixed order: Organization, Product,
    /// LocalBusiness, BreadcrumbList, WebPage
    pub schema_objects: Vec<serde_json::Value>,
    /// Display star count, rounded from the rating for presentation only
    pub stars: u8,
}

/// Synthesize the full artifact set for one resolved page.
///
/// `rating` should be the catalog row when one exists or
/// [`Rating::placeholder`] otherwise; the caller owns that fallback so this
/// function stays total.
#[must_use]
pub fn synthesize(page: &ResolvedPage, rating: &Rating, site: &SiteConfig) -> SeoArtifacts {
    let brand = &page.brand.name;
    let product = &page.product.name;
    let keyword = page.keyword();
    let kw = keyword.display_ar();

    let title = format!("{kw} {brand} {product} - أفضل خدمة في مصر | {}", site.site_name);
    let h1 = format!("{kw} {brand} {product}");
    let meta_description = format!(
        "{kw} {brand} {product} معتمدة في مصر - فنيون مدربون، قطع غيار أصلية، وضمان على الخدمة. تقييم {:.1} من {} عميل.",
        rating.value, rating.count
    );
    let keywords = build_keywords(keyword, brand, product);
    let canonical_url = site.canonical_url(&page.identity.path());

    let open_graph = OpenGraph {
        title: title.clone(),
        description: meta_description.clone(),
        url: canonical_url.clone(),
        site_name: site.site_name.clone(),
        locale: site.locale.clone(),
        kind: "website".to_string(),
    };

    let twitter = TwitterCard {
        card: "summary_large_image".to_string(),
        site: site.twitter_site.clone(),
        title: title.clone(),
        description: meta_description.clone(),
    };

    let schema_objects = schema::build_all(page, rating, site, &title, &meta_description);

    SeoArtifacts {
        title,
        h1,
        meta_description,
        keywords,
        canonical_url,
        open_graph,
        twitter,
        schema_objects,
        stars: rating.stars(),
    }
}

/// Meta-keywords string: the page's own phrase first, then the sibling
/// keyword phrases for the same pair.
fn build_keywords(current: Keyword, brand: &str, product: &str) -> String {
    let mut phrases = vec![format!("{} {brand} {product}", current.display_ar())];
    phrases.extend(
        Keyword::ALL
            .iter()
            .filter(|k| **k != current)
            .map(|k| format!("{} {brand} {product}", k.display_ar())),
    );
    phrases.join("، ")
}
