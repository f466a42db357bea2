//! Pipeline: orchestrates fetch → extract → (render → extract).
//!
//! Never fails outward. Fetch and render errors are logged and absorbed,
//! ending up as [`Acquisition::Empty`] when nothing usable is left.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use url::Url;

use super::PageFetcher;
use crate::extraction::{self, RenderMode};
use crate::renderer::PageRenderer;
use crate::types::MemeCandidate;

/// Which tier produced the candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionPath {
    /// Static HTML matched the named schema.
    Static { schema: &'static str },
    /// Headless browser render.
    Rendered,
}

impl fmt::Display for AcquisitionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionPath::Static { schema } => write!(f, "static:{schema}"),
            AcquisitionPath::Rendered => f.write_str("rendered"),
        }
    }
}

/// Outcome of one acquisition cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    Candidates {
        path: AcquisitionPath,
        items: Vec<MemeCandidate>,
    },
    Empty,
}

impl Acquisition {
    fn from_items(path: AcquisitionPath, items: Vec<MemeCandidate>) -> Self {
        if items.is_empty() {
            Acquisition::Empty
        } else {
            Acquisition::Candidates { path, items }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Acquisition::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Acquisition::Candidates { items, .. } => items.len(),
            Acquisition::Empty => 0,
        }
    }

    /// Candidates as a slice (empty for [`Acquisition::Empty`]).
    pub fn items(&self) -> &[MemeCandidate] {
        match self {
            Acquisition::Candidates { items, .. } => items,
            Acquisition::Empty => &[],
        }
    }

    pub fn into_items(self) -> Vec<MemeCandidate> {
        match self {
            Acquisition::Candidates { items, .. } => items,
            Acquisition::Empty => Vec::new(),
        }
    }
}

/// Runs the lightweight fetcher and, only if that yields nothing, the renderer.
pub struct AcquisitionPipeline {
    fetcher: Arc<dyn PageFetcher>,
    renderer: Arc<dyn PageRenderer>,
    target_url: Url,
}

impl AcquisitionPipeline {
    /// `target_url` is both the page to load and the base for image URLs.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        renderer: Arc<dyn PageRenderer>,
        target_url: Url,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            target_url,
        }
    }

    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Produce the candidate list for one request cycle.
    pub async fn acquire(&self) -> Acquisition {
        let start = Instant::now();

        if let Some(found) = self.acquire_static().await {
            return found;
        }

        let result = self.acquire_rendered().await;
        match &result {
            Acquisition::Candidates { items, .. } => info!(
                "Rendered path: {} candidates in {:.1}s",
                items.len(),
                start.elapsed().as_secs_f64()
            ),
            Acquisition::Empty => warn!(
                "No meme candidates from either path after {:.1}s",
                start.elapsed().as_secs_f64()
            ),
        }
        result
    }

    /// Static tier only. `None` means fall through to the renderer.
    pub async fn acquire_static(&self) -> Option<Acquisition> {
        let html = match self.fetcher.fetch(self.target_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Static fetch of {} failed: {e}", self.target_url);
                return None;
            }
        };

        let matched = extraction::extract_static(&html, &self.target_url)?;
        info!(
            "Static path: schema '{}' gave {} candidates",
            matched.schema.name,
            matched.candidates.len()
        );
        Some(Acquisition::from_items(
            AcquisitionPath::Static {
                schema: matched.schema.name,
            },
            matched.candidates,
        ))
    }

    /// Rendered tier only.
    pub async fn acquire_rendered(&self) -> Acquisition {
        info!("Falling back to headless render of {}", self.target_url);
        match self.renderer.render(self.target_url.as_str()).await {
            Ok(html) => {
                let items = extraction::extract(&html, RenderMode::Rendered, &self.target_url);
                Acquisition::from_items(AcquisitionPath::Rendered, items)
            }
            Err(e) => {
                warn!("Render of {} failed: {e}", self.target_url);
                Acquisition::Empty
            }
        }
    }
}
