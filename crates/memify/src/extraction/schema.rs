//! Selector schemas describing where memes live in the page markup.
//!
//! The upstream site changes its layout without notice, so static markup is
//! matched against an ordered list of schemas, most specific first. The
//! rendered DOM has a single known shape.

/// One extraction strategy: which elements are meme containers and where the
/// image and caption sit inside each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSchema {
    /// Short name for logs.
    pub name: &'static str,
    pub container: &'static str,
    pub image: &'static str,
    /// `None` means captions always fall back to the placeholder.
    pub caption: Option<&'static str>,
}

impl SelectorSchema {
    pub const fn new(
        name: &'static str,
        container: &'static str,
        image: &'static str,
        caption: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            container,
            image,
            caption,
        }
    }
}

/// Schemas tried against static markup, in priority order.
pub const STATIC_SCHEMAS: &[SelectorSchema] = &[
    SelectorSchema::new("meme-card", "div.meme-card", "img", Some("div.meme-text")),
    SelectorSchema::new("card", "div.card", "img", None),
    SelectorSchema::new("post", "div.post", "img", None),
    SelectorSchema::new("article", "article", "img", None),
];

/// Schema for the fully rendered DOM.
pub const RENDERED_SCHEMA: SelectorSchema =
    SelectorSchema::new("rendered-meme-card", "div.meme-card", "img", Some("div.meme-text"));

/// Substrings marking layout chrome rather than content. Matched case-insensitively.
pub const IMAGE_DENYLIST: &[&str] = &["logo", "icon", "avatar"];

/// Attributes that may carry the image source, in lookup order.
///
/// Lazy-loading pages often put a `data:` placeholder in `src` and the real
/// URL in one of the `data-*` attributes.
pub const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];
