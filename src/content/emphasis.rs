//! Keyword emphasis pass.
//!
//! After section text is assembled (overrides already merged), a second pass
//! scans for occurrences of a fixed ordered list of marker phrases and wraps
//! each case-insensitive match in an inline `<mark>` element. The styling
//! class is chosen by the phrase's index in the marker order, modulo the
//! 4-treatment palette - purely cosmetic, but order-dependent:
//!
//! The marker order is compound-phrases-first (the triple concatenation,
//! then the pairs, then the single phrases). Combined with the regex crate's
//! leftmost-first alternation semantics, a single scan therefore matches
//! "صيانة LG غسالة" as one unit instead of corrupting it into three nested
//! wraps - the longest-phrase-first discipline the ordering exists for.
//! Every replacement happens in one pass over the original text, so already
//! wrapped output is never rescanned.

use regex::RegexBuilder;

use crate::constants::EMPHASIS_PALETTE_SIZE;

/// A marker phrase plus its position in the fixed marker order.
#[derive(Debug, Clone)]
pub struct Marker {
    /// The phrase to match, case-insensitively
    pub phrase: String,
    /// Index in the fixed marker order; `index % 4` picks the treatment
    pub index: usize,
}

impl Marker {
    /// The palette class applied to matches of this marker.
    #[must_use]
    pub fn class(&self) -> String {
        format!("hl-{}", self.index % EMPHASIS_PALETTE_SIZE)
    }
}

/// Build the fixed ordered marker list for one page.
///
/// Order: triple concatenation, then the three pairwise concatenations,
/// then keyword translation, brand name, product name. Longest compounds
/// first - the order the matching pass depends on.
#[must_use]
pub fn marker_phrases(keyword_ar: &str, brand: &str, product: &str) -> Vec<Marker> {
    let phrases = [
        format!("{keyword_ar} {brand} {product}"),
        format!("{keyword_ar} {brand}"),
        format!("{keyword_ar} {product}"),
        format!("{brand} {product}"),
        keyword_ar.to_string(),
        brand.to_string(),
        product.to_string(),
    ];
    phrases
        .into_iter()
        .enumerate()
        .map(|(index, phrase)| Marker { phrase, index })
        .collect()
}

/// Wrap every marker occurrence in `text` in its emphasis element.
///
/// Single alternation scan in marker order; the input ordering guarantee is
/// documented on [`marker_phrases`]. Unmatched text passes through
/// untouched.
#[must_use]
pub fn apply(text: &str, markers: &[Marker]) -> String {
    if markers.is_empty() {
        return text.to_string();
    }

    // Alternation preserves the given order, which the regex engine honors
    // with leftmost-first semantics.
    let pattern = markers
        .iter()
        .map(|m| regex::escape(&m.phrase))
        .collect::<Vec<_>>()
        .join("|");

    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).unicode(true).build() else {
        // Escaped literals always compile; keep the text untouched if they
        // somehow do not.
        return text.to_string();
    };

    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let matched = &caps[0];
        // Same folding the regex matched with; ASCII-only comparison would
        // miss markers containing non-ASCII cased letters.
        let matched_lower = matched.to_lowercase();
        let class = markers
            .iter()
            .find(|m| m.phrase.to_lowercase() == matched_lower)
            .map_or_else(|| "hl-0".to_string(), Marker::class);
        format!("<mark class=\"{class}\">{matched}</mark>")
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<Marker> {
        marker_phrases("صيانة", "LG", "غسالة")
    }

    #[test]
    fn marker_order_is_compounds_first() {
        let markers = markers();
        assert_eq!(markers[0].phrase, "صيانة LG غسالة");
        assert_eq!(markers[3].phrase, "LG غسالة");
        assert_eq!(markers[4].phrase, "صيانة");
        assert_eq!(markers[6].phrase, "غسالة");
    }

    #[test]
    fn palette_wraps_at_four() {
        let markers = markers();
        assert_eq!(markers[0].class(), "hl-0");
        assert_eq!(markers[3].class(), "hl-3");
        assert_eq!(markers[4].class(), "hl-0");
        assert_eq!(markers[6].class(), "hl-2");
    }

    #[test]
    fn compound_phrase_wins_over_its_sub_phrases() {
        let out = apply("نقدم صيانة LG غسالة باحتراف", &markers());
        assert!(out.contains("<mark class=\"hl-0\">صيانة LG غسالة</mark>"));
        // The sub-phrases inside the compound must not be wrapped again.
        assert!(!out.contains("<mark class=\"hl-0\"><mark"));
        assert_eq!(out.matches("<mark").count(), 1);
    }

    #[test]
    fn standalone_phrases_get_their_own_treatment() {
        let out = apply("صيانة ممتازة من LG دائماً", &markers());
        assert!(out.contains("<mark class=\"hl-0\">صيانة</mark>"));
        assert!(out.contains("<mark class=\"hl-1\">LG</mark>"));
    }

    #[test]
    fn matching_is_case_insensitive_but_preserves_original_text() {
        let out = apply("أجهزة lg الأصلية", &markers());
        assert!(out.contains("<mark class=\"hl-1\">lg</mark>"));
    }

    #[test]
    fn non_ascii_case_folds_keep_the_marker_class() {
        let markers = marker_phrases("صيانة", "Électrolux", "غسالة");
        let out = apply("أجهزة électrolux الأصلية", &markers);
        assert!(out.contains("<mark class=\"hl-1\">électrolux</mark>"));
    }

    #[test]
    fn text_without_markers_is_untouched() {
        let text = "لا توجد علامات هنا";
        assert_eq!(apply(text, &markers()), text);
    }
}
