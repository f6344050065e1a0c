//! The fixed service-keyword enumeration.
//!
//! Every landing page is addressed by a (brand, product, keyword) triple
//! where the keyword is one of exactly six service-intent tags. The set is
//! immutable at runtime - it is a closed enum, not a catalog table - and it
//! carries two fixed pieces of data per keyword:
//!
//! - a URL slug (`maintenance`), used in routes and canonical URLs
//! - an Arabic display translation (`صيانة`), used in titles, body copy,
//!   and breadcrumbs
//!
//! The declaration order of the variants is the one total order used for
//! prev/next navigation: `agency` is first, `warranty` is last. Both the
//! navigation resolver and the content engine read the order from
//! [`Keyword::ALL`]; it is never duplicated elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::PagegenError;

/// One of the six fixed service-intent keywords.
///
/// Variant order is significant: it defines the navigation order used by
/// [`crate::navigation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Keyword {
    /// Authorized agency pages (توكيل)
    Agency,
    /// Customer service pages (خدمة عملاء)
    CustomerService,
    /// Hotline pages (الخط الساخن)
    Hotline,
    /// Maintenance pages (صيانة)
    Maintenance,
    /// Phone-numbers pages (أرقام)
    Numbers,
    /// Warranty pages (ضمان)
    Warranty,
}

impl Keyword {
    /// All keywords in the fixed navigation order.
    pub const ALL: [Self; 6] = [
        Self::Agency,
        Self::CustomerService,
        Self::Hotline,
        Self::Maintenance,
        Self::Numbers,
        Self::Warranty,
    ];

    /// First keyword in the fixed order.
    #[must_use]
    pub const fn first() -> Self {
        Self::Agency
    }

    /// Last keyword in the fixed order.
    #[must_use]
    pub const fn last() -> Self {
        Self::Warranty
    }

    /// The URL slug for this keyword.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::CustomerService => "customer-service",
            Self::Hotline => "hotline",
            Self::Maintenance => "maintenance",
            Self::Numbers => "numbers",
            Self::Warranty => "warranty",
        }
    }

    /// The fixed Arabic display translation for this keyword.
    #[must_use]
    pub const fn display_ar(self) -> &'static str {
        match self {
            Self::Agency => "توكيل",
            Self::CustomerService => "خدمة عملاء",
            Self::Hotline => "الخط الساخن",
            Self::Maintenance => "صيانة",
            Self::Numbers => "أرقام",
            Self::Warranty => "ضمان",
        }
    }

    /// Position of this keyword in the fixed order (0-based).
    #[must_use]
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// The keyword immediately before this one in the fixed order, if any.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        let pos = self.position();
        if pos == 0 { None } else { Some(Self::ALL[pos - 1]) }
    }

    /// The keyword immediately after this one in the fixed order, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.position() + 1).copied()
    }
}

impl FromStr for Keyword {
    type Err = PagegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|k| k.slug() == s)
            .copied()
            .ok_or_else(|| PagegenError::KeywordNotFound { slug: s.to_string() })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_agency_first_warranty_last() {
        assert_eq!(Keyword::ALL[0], Keyword::Agency);
        assert_eq!(Keyword::ALL[5], Keyword::Warranty);
        assert_eq!(Keyword::first(), Keyword::Agency);
        assert_eq!(Keyword::last(), Keyword::Warranty);
    }

    #[test]
    fn slug_round_trip() {
        for keyword in Keyword::ALL {
            assert_eq!(keyword.slug().parse::<Keyword>().unwrap(), keyword);
        }
    }

    #[test]
    fn unknown_slug_is_keyword_not_found() {
        let err = "repair".parse::<Keyword>().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn prev_next_step_through_the_fixed_order() {
        assert_eq!(Keyword::Agency.prev(), None);
        assert_eq!(Keyword::Agency.next(), Some(Keyword::CustomerService));
        assert_eq!(Keyword::Maintenance.prev(), Some(Keyword::Hotline));
        assert_eq!(Keyword::Warranty.next(), None);
    }

    #[test]
    fn serde_uses_kebab_case_slugs() {
        let json = serde_json::to_string(&Keyword::CustomerService).unwrap();
        assert_eq!(json, "\"customer-service\"");
        let parsed: Keyword = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(parsed, Keyword::Maintenance);
    }
}
