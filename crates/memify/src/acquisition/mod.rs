//! Two-tier acquisition: cheap HTTP fetch first, headless browser last.
//!
//! The static path handles the common case. When upstream markup stops
//! matching every known schema (or the request fails outright) the page is
//! rendered in Chromium and parsed with the rendered-DOM schema instead.

pub mod http_client;
pub mod pipeline;

use async_trait::async_trait;

use crate::types::FetchResult;

pub use http_client::HttpFetcher;
pub use pipeline::{Acquisition, AcquisitionPath, AcquisitionPipeline};

/// Source of static markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML of `url`.
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}
