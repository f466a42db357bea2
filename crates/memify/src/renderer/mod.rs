//! Renderer abstraction for the heavy fallback path.
//!
//! The pipeline only needs "give me the rendered markup of this URL", so the
//! seam is a single method. Chromium via chromiumoxide is the real engine;
//! [`NoopRenderer`] stands in when no browser is installed.

pub mod chromium;

use async_trait::async_trait;

use crate::types::{RenderError, RenderResult};

pub use chromium::{find_chromium, ChromiumRenderer};

/// Loads a page in a scripted browser and returns its final markup.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `url`, scroll to trigger lazy content, and return the DOM as HTML.
    async fn render(&self, url: &str) -> RenderResult<String>;
}

/// A renderer used when Chromium is unavailable.
///
/// The static path keeps working; the fallback always reports
/// [`RenderError::Unavailable`], which the pipeline turns into "no candidates".
pub struct NoopRenderer;

#[async_trait]
impl PageRenderer for NoopRenderer {
    async fn render(&self, _url: &str) -> RenderResult<String> {
        Err(RenderError::Unavailable)
    }
}
