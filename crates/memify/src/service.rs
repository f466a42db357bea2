//! The one entry point the chat adapter calls.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::acquisition::{AcquisitionPipeline, HttpFetcher, PageFetcher};
use crate::config::AcquisitionConfig;
use crate::renderer::{ChromiumRenderer, NoopRenderer, PageRenderer};
use crate::selection::SelectionPolicy;
use crate::types::{FetchResult, MemeCandidate, NoMemeAvailable};

/// Acquires a fresh candidate list per request and hands out one meme that
/// has not been served since the last exhaustion reset.
///
/// Acquisition runs without holding any lock, so concurrent requests
/// overlap on network and browser waits. Partition, reset and insert happen
/// under a single lock acquisition.
pub struct MemeService {
    pipeline: AcquisitionPipeline,
    policy: Mutex<SelectionPolicy>,
}

impl MemeService {
    pub fn new(pipeline: AcquisitionPipeline) -> Self {
        Self {
            pipeline,
            policy: Mutex::new(SelectionPolicy::new()),
        }
    }

    /// Build from explicit fetcher and renderer.
    pub fn with_parts(
        fetcher: Arc<dyn PageFetcher>,
        renderer: Arc<dyn PageRenderer>,
        target_url: Url,
    ) -> Self {
        Self::new(AcquisitionPipeline::new(fetcher, renderer, target_url))
    }

    /// Wire the real HTTP fetcher and Chromium renderer.
    ///
    /// Falls back to [`NoopRenderer`] when no Chromium binary can be found,
    /// so the static path still works.
    pub fn from_config(config: &AcquisitionConfig) -> FetchResult<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config)?);

        let renderer: Arc<dyn PageRenderer> = match ChromiumRenderer::new(config) {
            Ok(renderer) => {
                info!("Browser fallback: {}", renderer.chrome_path().display());
                Arc::new(renderer)
            }
            Err(e) => {
                warn!("{e}. Browser fallback disabled");
                Arc::new(NoopRenderer)
            }
        };

        Ok(Self::with_parts(fetcher, renderer, config.target_url.clone()))
    }

    /// Acquire candidates and pick one not served yet.
    pub async fn request_meme(&self) -> Result<MemeCandidate, NoMemeAvailable> {
        let candidates = self.pipeline.acquire().await.into_items();
        if candidates.is_empty() {
            return Err(NoMemeAvailable);
        }

        let mut policy = self.policy.lock().await;
        let chosen = policy.select(&candidates).ok_or(NoMemeAvailable)?;
        debug!(
            "Selected {} ({} served)",
            chosen.image_url,
            policy.served_count()
        );
        Ok(chosen)
    }

    /// Number of memes served since the last reset.
    pub async fn served_count(&self) -> usize {
        self.policy.lock().await.served_count()
    }

    /// Page memes are scraped from.
    pub fn source_url(&self) -> &Url {
        self.pipeline.target_url()
    }

    pub fn pipeline(&self) -> &AcquisitionPipeline {
        &self.pipeline
    }
}
