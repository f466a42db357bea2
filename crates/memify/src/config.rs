//! Acquisition settings with environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// Listing page the memes are scraped from.
pub const DEFAULT_TARGET_URL: &str = "https://www.memify.ru/highfive/";
/// Referer sent with the lightweight request.
pub const DEFAULT_REFERER: &str = "https://www.memify.ru/";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RENDER_SETTLE_SECS: u64 = 5;
const DEFAULT_SCROLL_SETTLE_SECS: u64 = 2;

/// Everything the fetcher, renderer and pipeline need to know about the upstream site.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Page to scrape. Also the base every image URL is resolved against.
    pub target_url: Url,
    pub referer: String,
    /// Budget for one lightweight GET.
    pub fetch_timeout: Duration,
    /// Budget for a whole render: launch, navigation, settle waits and capture.
    pub render_timeout: Duration,
    /// Wait after navigation before scrolling.
    pub render_settle: Duration,
    /// Wait after the scroll so lazy content can attach.
    pub render_scroll_settle: Duration,
    /// Browser window and viewport size.
    pub viewport: (u32, u32),
    /// Explicit Chromium binary. Discovered on PATH when unset.
    pub chromium_path: Option<PathBuf>,
    /// Run Chromium with its sandbox enabled.
    pub browser_sandbox: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            target_url: Url::parse(DEFAULT_TARGET_URL).expect("default target URL is valid"),
            referer: DEFAULT_REFERER.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            render_settle: Duration::from_secs(DEFAULT_RENDER_SETTLE_SECS),
            render_scroll_settle: Duration::from_secs(DEFAULT_SCROLL_SETTLE_SECS),
            viewport: (1920, 1080),
            chromium_path: None,
            browser_sandbox: true,
        }
    }
}

impl AcquisitionConfig {
    /// Defaults overridden by `MEMIFY_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparseable values keep the default.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MEMIFY_URL") {
            match Url::parse(&raw) {
                Ok(url) => self.target_url = url,
                Err(e) => warn!("Ignoring MEMIFY_URL={raw}: {e}"),
            }
        }

        if let Some(referer) = lookup("MEMIFY_REFERER") {
            self.referer = referer;
        }

        if let Some(secs) = parse_secs(&lookup, "MEMIFY_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout = secs;
        }

        if let Some(secs) = parse_secs(&lookup, "MEMIFY_RENDER_TIMEOUT_SECS") {
            self.render_timeout = secs;
        }

        if let Some(path) = lookup("MEMIFY_CHROMIUM_PATH") {
            self.chromium_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("MEMIFY_NO_SANDBOX") {
            self.browser_sandbox = !matches!(flag.trim(), "1" | "true" | "yes");
        }

        self
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring {key}={raw}: expected a positive number of seconds");
            None
        }
    }
}
