//! Pull meme candidates out of static or rendered markup.
//!
//! Extraction never fails: unparseable markup, broken selectors and missing
//! attributes all just produce fewer candidates. Everything here is
//! synchronous because the `scraper` crate's types are `!Send`; the pipeline
//! calls in between awaits and never holds a parsed document across one.

pub mod schema;

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::types::{MemeCandidate, DEFAULT_CAPTION};

pub use schema::{
    SelectorSchema, IMAGE_DENYLIST, IMAGE_SOURCE_ATTRS, RENDERED_SCHEMA, STATIC_SCHEMAS,
};

/// Which shape of markup is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Raw HTML as served, no scripts executed.
    Static,
    /// DOM captured from a headless browser after scrolling.
    Rendered,
}

/// Candidates produced by one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMatch {
    pub schema: SelectorSchema,
    pub candidates: Vec<MemeCandidate>,
}

/// Extract candidates for the given mode.
///
/// Static mode walks [`STATIC_SCHEMAS`] and keeps the first schema that
/// produced at least one candidate. Rendered mode only uses [`RENDERED_SCHEMA`].
pub fn extract(html: &str, mode: RenderMode, base_url: &Url) -> Vec<MemeCandidate> {
    match mode {
        RenderMode::Static => extract_static(html, base_url)
            .map(|m| m.candidates)
            .unwrap_or_default(),
        RenderMode::Rendered => extract_with_schema(html, &RENDERED_SCHEMA, base_url),
    }
}

/// Run the static schemas in priority order. First non-empty result wins;
/// later schemas are never merged in.
pub fn extract_static(html: &str, base_url: &Url) -> Option<SchemaMatch> {
    extract_first_match(html, STATIC_SCHEMAS, base_url)
}

/// First-non-empty-wins over an arbitrary schema list.
pub fn extract_first_match(
    html: &str,
    schemas: &[SelectorSchema],
    base_url: &Url,
) -> Option<SchemaMatch> {
    let document = Html::parse_document(html);

    for schema in schemas {
        let candidates = extract_from_document(&document, schema, base_url);
        if candidates.is_empty() {
            debug!("Schema '{}' yielded no candidates", schema.name);
            continue;
        }
        debug!(
            "Schema '{}' yielded {} candidates",
            schema.name,
            candidates.len()
        );
        return Some(SchemaMatch {
            schema: *schema,
            candidates,
        });
    }

    None
}

/// Apply a single schema.
pub fn extract_with_schema(
    html: &str,
    schema: &SelectorSchema,
    base_url: &Url,
) -> Vec<MemeCandidate> {
    let document = Html::parse_document(html);
    extract_from_document(&document, schema, base_url)
}

fn extract_from_document(
    document: &Html,
    schema: &SelectorSchema,
    base_url: &Url,
) -> Vec<MemeCandidate> {
    let Some(container_sel) = parse_selector(schema.container) else {
        return Vec::new();
    };
    let Some(image_sel) = parse_selector(schema.image) else {
        return Vec::new();
    };
    let caption_sel = match schema.caption {
        Some(raw) => match parse_selector(raw) {
            Some(sel) => Some(sel),
            None => return Vec::new(),
        },
        None => None,
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for container in document.select(&container_sel) {
        let Some(image) = container.select(&image_sel).next() else {
            continue;
        };
        let Some(image_url) = resolve_image_source(&image, base_url) else {
            continue;
        };
        if is_layout_chrome(&image_url) {
            debug!("Skipping layout image {image_url}");
            continue;
        }
        if !seen.insert(image_url.clone()) {
            continue;
        }

        let caption = caption_sel
            .as_ref()
            .and_then(|sel| container.select(sel).next())
            .map(element_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_CAPTION.to_string());

        candidates.push(MemeCandidate::new(image_url, caption));
    }

    candidates
}

/// True when the URL looks like a logo, icon or avatar.
pub fn is_layout_chrome(url: &Url) -> bool {
    let lower = url.as_str().to_lowercase();
    IMAGE_DENYLIST.iter().any(|marker| lower.contains(marker))
}

/// First image source attribute that resolves to an absolute http(s) URL.
fn resolve_image_source(image: &ElementRef<'_>, base_url: &Url) -> Option<Url> {
    IMAGE_SOURCE_ATTRS.iter().find_map(|attr| {
        let raw = image.value().attr(attr)?.trim();
        if raw.is_empty() {
            return None;
        }
        let resolved = base_url.join(raw).ok()?;
        matches!(resolved.scheme(), "http" | "https").then_some(resolved)
    })
}

/// Concatenated text content, trimmed at both ends. Interior text is kept as is.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("Invalid selector '{raw}': {e:?}");
            None
        }
    }
}
