//! Chromium-based renderer using chromiumoxide.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::PageRenderer;
use crate::config::AcquisitionConfig;
use crate::types::{RenderError, RenderResult};

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Bound on each teardown step (close, wait, kill).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    // 1. Configured path
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!("Configured Chromium path {} does not exist", path.display());
    }

    // 2. MEMIFY_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("MEMIFY_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 3. System PATH
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches a fresh headless Chromium for every render.
///
/// Each call gets its own throwaway profile directory, so concurrent renders
/// never share cookies, cache or lock files. The browser is shut down and
/// the profile removed on every exit path, including timeouts.
pub struct ChromiumRenderer {
    chrome_path: PathBuf,
    viewport: (u32, u32),
    sandbox: bool,
    timeout: Duration,
    settle: Duration,
    scroll_settle: Duration,
}

impl ChromiumRenderer {
    /// Locate Chromium and capture render settings. Does not launch anything yet.
    pub fn new(config: &AcquisitionConfig) -> RenderResult<Self> {
        let chrome_path =
            find_chromium(config.chromium_path.as_deref()).ok_or(RenderError::BrowserNotFound)?;

        Ok(Self {
            chrome_path,
            viewport: config.viewport,
            sandbox: config.browser_sandbox,
            timeout: config.render_timeout,
            settle: config.render_settle,
            scroll_settle: config.render_scroll_settle,
        })
    }

    pub fn chrome_path(&self) -> &Path {
        &self.chrome_path
    }

    fn browser_config(&self, profile_dir: &Path) -> RenderResult<BrowserConfig> {
        let (width, height) = self.viewport;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .new_headless_mode()
            .user_data_dir(profile_dir)
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--no-first-run");

        if !self.sandbox {
            builder = builder.no_sandbox();
        }

        builder
            .build()
            .map_err(|e| RenderError::Launch(format!("failed to build browser config: {e}")))
    }

    /// Navigate, settle, scroll, settle, capture.
    async fn capture(&self, browser: &Browser, url: &str) -> RenderResult<String> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Launch(format!("failed to create page: {e}")))?;

        let result = self.drive(&page, url).await;
        let _ = page.close().await;
        result
    }

    async fn drive(&self, page: &Page, url: &str) -> RenderResult<String> {
        page.goto(url)
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;
        let _ = page.wait_for_navigation().await;

        tokio::time::sleep(self.settle).await;

        page.evaluate(SCROLL_SCRIPT)
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;

        tokio::time::sleep(self.scroll_settle).await;

        page.content()
            .await
            .map_err(|e| RenderError::Capture(e.to_string()))
    }
}

/// Lifecycle hooks of a launched browser process used during teardown.
#[async_trait]
trait BrowserProcess: Send {
    /// Ask the browser to exit over CDP.
    async fn request_close(&mut self) -> Result<(), String>;
    /// SIGKILL the process and reap it.
    async fn force_kill(&mut self);
    /// Wait for the process to exit.
    async fn wait_exit(&mut self);
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), String> {
        Browser::close(self).await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn force_kill(&mut self) {
        if let Some(Err(e)) = Browser::kill(self).await {
            warn!("Failed to kill browser: {e}");
        }
    }

    async fn wait_exit(&mut self) {
        if let Err(e) = Browser::wait(self).await {
            debug!("Browser wait failed: {e}");
        }
    }
}

/// Close the browser, escalating to a kill when close fails or any step
/// exceeds `grace`. Always returns within a few multiples of `grace`.
async fn shut_down<B: BrowserProcess>(browser: &mut B, grace: Duration) {
    let closed = match tokio::time::timeout(grace, browser.request_close()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!("Browser close failed: {e}");
            false
        }
        Err(_) => {
            debug!("Browser close timed out after {grace:?}");
            false
        }
    };

    if closed && tokio::time::timeout(grace, browser.wait_exit()).await.is_ok() {
        return;
    }

    warn!("Browser did not exit cleanly, killing it");
    if tokio::time::timeout(grace, browser.force_kill()).await.is_err() {
        warn!("Browser kill did not finish within {grace:?}");
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> RenderResult<String> {
        let deadline = Instant::now() + self.timeout;
        let profile_dir = std::env::temp_dir().join(format!("memify-render-{}", Uuid::new_v4()));
        let config = self.browser_config(&profile_dir)?;

        // A launch dropped on timeout takes its child down with it.
        let launched = match tokio::time::timeout_at(deadline, Browser::launch(config)).await {
            Ok(Ok(pair)) => Ok(pair),
            Ok(Err(e)) => Err(RenderError::Launch(e.to_string())),
            Err(_) => Err(RenderError::Timeout(self.timeout)),
        };
        let (mut browser, mut handler) = match launched {
            Ok(pair) => pair,
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&profile_dir).await;
                return Err(e);
            }
        };

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        debug!("Rendering {url} in {}", profile_dir.display());
        let outcome = tokio::time::timeout_at(deadline, self.capture(&browser, url)).await;

        shut_down(&mut browser, SHUTDOWN_GRACE).await;
        handler_task.abort();
        let _ = tokio::fs::remove_dir_all(&profile_dir).await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(self.timeout)),
        }
    }
}
