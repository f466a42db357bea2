//! Memify: meme acquisition core.
//!
//! Scrapes the Memify listing page with a cheap HTTP request, falls back to a
//! headless Chromium render when the static markup no longer matches, and
//! hands out memes without repeating one until the current pool is exhausted.

pub mod acquisition;
pub mod config;
pub mod extraction;
pub mod renderer;
pub mod selection;
pub mod service;
pub mod types;

pub use acquisition::{Acquisition, AcquisitionPath, AcquisitionPipeline, HttpFetcher, PageFetcher};
pub use config::AcquisitionConfig;
pub use extraction::{extract, RenderMode, SelectorSchema};
pub use renderer::{ChromiumRenderer, NoopRenderer, PageRenderer};
pub use selection::SelectionPolicy;
pub use service::MemeService;
pub use types::*;
