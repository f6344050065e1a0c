//! Body-content synthesis for landing pages.
//!
//! This module turns resolved catalog entities into the ordered sequence of
//! named body sections that make up a page. Section text is produced by
//! Tera template interpolation from a fixed, preregistered template set -
//! there is no external content fetch. Two transformations follow section
//! assembly, in this order:
//!
//! 1. **Override merge** - a manually authored [`ContentOverride`] scoped to
//!    the page identity replaces the matching section's body verbatim
//!    (override wins, synthesized text is the fallback);
//! 2. **Keyword emphasis pass** (see [`emphasis`]) - a separate, explicitly
//!    ordered scan that wraps marker-phrase occurrences in inline emphasis
//!    markup. It runs over override text too, so manual and synthesized
//!    sections get the same visual treatment.
//!
//! Each section is a small data record ([`BodySection`]): a kind tag, a
//! heading, rendered text, and the structured extras (gallery images, FAQ
//! pairs, related-keyword links) for the sections that carry them. The
//! rendering layer decides what markup to wrap around them; this module
//! only owns the text.

pub mod emphasis;

use serde::{Deserialize, Serialize};
use tera::Tera;
use tracing::trace;

use crate::catalog::{Brand, ContentOverride, Family, Product};
use crate::core::PagegenError;
use crate::keyword::Keyword;

/// Identifies one of the eight fixed body sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Opening paragraph
    Intro,
    /// Product image gallery
    Gallery,
    /// About-the-brand section
    Brand,
    /// Offered-services section
    Services,
    /// Contact call-to-action
    Contact,
    /// Frequently asked questions (exactly 3 pairs)
    Faq,
    /// Internal-linking anchors to sibling keyword pages
    RelatedKeywords,
    /// Closing paragraph
    Conclusion,
}

impl SectionKind {
    /// All section kinds in page order.
    pub const ALL: [Self; 8] = [
        Self::Intro,
        Self::Gallery,
        Self::Brand,
        Self::Services,
        Self::Contact,
        Self::Faq,
        Self::RelatedKeywords,
        Self::Conclusion,
    ];
}

/// One question/answer pair in the FAQ section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    /// The question text
    pub question: String,
    /// The answer text (emphasis markup applied like any body text)
    pub answer: String,
}

/// One internal-linking anchor in the related-keywords section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    /// Anchor label ("صيانة LG غسالة")
    pub label: String,
    /// Route path of the sibling page
    pub path: String,
}

/// One rendered body section: a kind tag plus rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySection {
    /// Which of the eight fixed sections this is
    pub kind: SectionKind,
    /// Section heading
    pub heading: String,
    /// Rendered section text, emphasis markup included
    pub body: String,
    /// Gallery image references; empty for non-gallery sections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// FAQ pairs; empty for non-FAQ sections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqItem>,
    /// Related-keyword links; empty outside the related-keywords section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<RelatedLink>,
}

// The fixed template set. Interpolation only - no includes, no inheritance,
// no file system access.
const INTRO_TEMPLATE: &str = "إذا كنت تبحث عن {{ keyword }} {{ brand }} {{ product }} في مصر فأنت في المكان الصحيح. نقدم خدمة {{ keyword }} معتمدة لجميع أجهزة {{ product }} من {{ brand }} ضمن فئة {{ family }}، بفريق مدرب وقطع غيار أصلية وضمان حقيقي على كل عملية.";

const GALLERY_TEMPLATE: &str = "صور من مراكز خدمة {{ brand }} {{ product }} المعتمدة لدينا.";

const BRAND_TEMPLATE: &str = "{{ brand }} من أشهر العلامات التجارية في مصر في مجال {{ family_description }}. تتميز أجهزة {{ product }} من {{ brand }} بالاعتمادية والجودة، ومع ذلك يحتاج أي جهاز إلى {{ keyword }} موثوق عند الحاجة، وهنا يأتي دورنا.";

const SERVICES_TEMPLATE: &str = "نوفر لعملاء {{ brand }} كل ما يخص {{ product }}: صيانة دورية وإصلاح الأعطال، توكيل معتمد، خط ساخن للرد الفوري، خدمة عملاء على مدار الأسبوع، أرقام تواصل مباشرة، وضمان على قطع الغيار. خدمة {{ keyword }} هي تخصصنا الأول لهذه الصفحة.";

const CONTACT_TEMPLATE: &str = "للحصول على {{ keyword }} {{ brand }} {{ product }} اليوم، اتصل بنا أو أرسل رسالة وسيصلك فني معتمد في أقرب وقت. فروعنا تغطي جميع محافظات مصر.";

const CONCLUSION_TEMPLATE: &str = "في النهاية، {{ keyword }} {{ brand }} {{ product }} ليست مجرد خدمة نقدمها بل التزام بجودة تدوم. اختر الخدمة المعتمدة ولا تخاطر بجهازك مع مراكز غير موثوقة.";

const FAQ_QUESTION_TEMPLATES: [&str; 3] = [
    "ما هي تكلفة {{ keyword }} {{ brand }} {{ product }}؟",
    "كم يستغرق {{ keyword }} {{ brand }} {{ product }}؟",
    "هل تتوفر قطع غيار أصلية لأجهزة {{ product }} من {{ brand }}؟",
];

const FAQ_ANSWER_TEMPLATES: [&str; 3] = [
    "تختلف التكلفة حسب حالة الجهاز، لكن المعاينة لخدمة {{ keyword }} {{ brand }} {{ product }} مجانية تماماً عند إتمام الإصلاح.",
    "معظم طلبات {{ keyword }} تُنجز في نفس اليوم، والحالات التي تحتاج قطع غيار خاصة بأجهزة {{ product }} تستغرق من يوم إلى ثلاثة أيام.",
    "نعم، نوفر قطع غيار أصلية ومعتمدة لجميع أجهزة {{ product }} من {{ brand }} مع ضمان عليها.",
];

/// Tera-backed section renderer for the fixed template set.
///
/// Build one and reuse it; the template set never changes at runtime, so a
/// single instance serves any number of concurrent renders (Tera rendering
/// takes `&self`).
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Compile the fixed template set.
    ///
    /// Compilation can only fail on a malformed built-in template, which is
    /// a programming error, but the failure still surfaces as a normal
    /// error instead of a panic.
    pub fn new() -> Result<Self, PagegenError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("intro", INTRO_TEMPLATE),
            ("gallery", GALLERY_TEMPLATE),
            ("brand", BRAND_TEMPLATE),
            ("services", SERVICES_TEMPLATE),
            ("contact", CONTACT_TEMPLATE),
            ("conclusion", CONCLUSION_TEMPLATE),
            ("faq-q-0", FAQ_QUESTION_TEMPLATES[0]),
            ("faq-q-1", FAQ_QUESTION_TEMPLATES[1]),
            ("faq-q-2", FAQ_QUESTION_TEMPLATES[2]),
            ("faq-a-0", FAQ_ANSWER_TEMPLATES[0]),
            ("faq-a-1", FAQ_ANSWER_TEMPLATES[1]),
            ("faq-a-2", FAQ_ANSWER_TEMPLATES[2]),
        ])
        .map_err(|e| PagegenError::Template {
            section: "<template set>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { tera })
    }

    /// Render the full ordered section sequence for one page.
    ///
    /// `images` is the externally supplied gallery list (image storage is a
    /// collaborator, not owned here). `overrides` are the identity-scoped
    /// manual sections; each replaces its synthesized counterpart verbatim
    /// before the emphasis pass runs.
    pub fn render(
        &self,
        brand: &Brand,
        product: &Product,
        family: &Family,
        keyword: Keyword,
        images: &[String],
        overrides: &[ContentOverride],
    ) -> Result<Vec<BodySection>, PagegenError> {
        let context = self.build_context(brand, product, family, keyword);
        let kw = keyword.display_ar();

        let mut sections = vec![
            BodySection {
                kind: SectionKind::Intro,
                heading: format!("{kw} {} {}", brand.name, product.name),
                body: self.render_one("intro", &context)?,
                images: Vec::new(),
                faq: Vec::new(),
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::Gallery,
                heading: format!("صور {} {}", brand.name, product.name),
                body: self.render_one("gallery", &context)?,
                images: images.to_vec(),
                faq: Vec::new(),
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::Brand,
                heading: format!("عن {}", brand.name),
                body: self.render_one("brand", &context)?,
                images: Vec::new(),
                faq: Vec::new(),
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::Services,
                heading: format!("خدمات {} {}", brand.name, product.name),
                body: self.render_one("services", &context)?,
                images: Vec::new(),
                faq: Vec::new(),
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::Contact,
                heading: "تواصل معنا".to_string(),
                body: self.render_one("contact", &context)?,
                images: Vec::new(),
                faq: Vec::new(),
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::Faq,
                heading: "الأسئلة الشائعة".to_string(),
                body: String::new(),
                images: Vec::new(),
                faq: self.render_faq(&context)?,
                links: Vec::new(),
            },
            BodySection {
                kind: SectionKind::RelatedKeywords,
                heading: "خدمات ذات صلة".to_string(),
                body: String::new(),
                images: Vec::new(),
                faq: Vec::new(),
                links: related_links(brand, product, keyword),
            },
            BodySection {
                kind: SectionKind::Conclusion,
                heading: "الخلاصة".to_string(),
                body: self.render_one("conclusion", &context)?,
                images: Vec::new(),
                faq: Vec::new(),
                links: Vec::new(),
            },
        ];

        // Override merge: manual text replaces the synthesized body verbatim.
        for content_override in overrides {
            if let Some(section) =
                sections.iter_mut().find(|s| s.kind == content_override.section)
            {
                trace!(section = ?content_override.section, "applying content override");
                section.body = content_override.body.clone();
            }
        }

        // Second pass, separate from section construction on purpose: the
        // emphasis scan must see the final assembled text, overrides
        // included.
        let markers = emphasis::marker_phrases(kw, &brand.name, &product.name);
        for section in &mut sections {
            if !section.body.is_empty() {
                section.body = emphasis::apply(&section.body, &markers);
            }
            for item in &mut section.faq {
                item.answer = emphasis::apply(&item.answer, &markers);
            }
        }

        Ok(sections)
    }

    fn build_context(
        &self,
        brand: &Brand,
        product: &Product,
        family: &Family,
        keyword: Keyword,
    ) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("brand", &brand.name);
        context.insert("product", &product.name);
        context.insert("family", &family.name);
        context.insert(
            "family_description",
            if family.description.is_empty() { &family.name } else { &family.description },
        );
        context.insert("keyword", keyword.display_ar());
        context
    }

    fn render_one(&self, name: &str, context: &tera::Context) -> Result<String, PagegenError> {
        self.tera.render(name, context).map_err(|e| PagegenError::Template {
            section: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn render_faq(&self, context: &tera::Context) -> Result<Vec<FaqItem>, PagegenError> {
        // Exactly 3 fixed Q/A pairs per page.
        (0..3)
            .map(|i| {
                Ok(FaqItem {
                    question: self.render_one(&format!("faq-q-{i}"), context)?,
                    answer: self.render_one(&format!("faq-a-{i}"), context)?,
                })
            })
            .collect()
    }
}

/// The fixed-shape related-keywords link list: one anchor per sibling
/// keyword of the same (brand, product) pair, in keyword order, current
/// keyword excluded.
fn related_links(brand: &Brand, product: &Product, current: Keyword) -> Vec<RelatedLink> {
    Keyword::ALL
        .iter()
        .filter(|k| **k != current)
        .map(|k| RelatedLink {
            label: format!("{} {} {}", k.display_ar(), brand.name, product.name),
            path: format!("/{}/{}/{}", brand.slug, product.slug, k.slug()),
        })
        .collect()
}
