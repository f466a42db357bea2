//! Acquisition pipeline and meme service behavior with fake fetchers/renderers.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use memify::{
    Acquisition, AcquisitionPath, AcquisitionPipeline, FetchError, FetchResult, MemeService,
    NoMemeAvailable, PageFetcher, PageRenderer, RenderError, RenderResult,
};

// ─────────────────────── fakes ───────────────────────

struct FakeFetcher {
    response: Result<String, u16>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    fn ok(html: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(html.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            response: Err(status),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, _url: &str) -> FetchResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(html) => Ok(html.clone()),
            Err(status) => Err(FetchError::Status(*status)),
        }
    }
}

/// Fetcher whose page can be swapped between requests.
struct SwitchableFetcher {
    html: std::sync::Mutex<String>,
}

impl SwitchableFetcher {
    fn serving(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: std::sync::Mutex::new(html.to_string()),
        })
    }

    fn switch_to(&self, html: &str) {
        *self.html.lock().unwrap() = html.to_string();
    }
}

#[async_trait]
impl PageFetcher for SwitchableFetcher {
    async fn fetch(&self, _url: &str) -> FetchResult<String> {
        let html = self.html.lock().unwrap().clone();
        Ok(html)
    }
}

struct FakeRenderer {
    html: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeRenderer {
    fn ok(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: Some(html.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            html: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn render(&self, _url: &str) -> RenderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.html
            .clone()
            .ok_or_else(|| RenderError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string()))
    }
}

// ─────────────────────── helpers ───────────────────────

fn base() -> Url {
    Url::parse("https://example.test/page/").unwrap()
}

const NO_MATCH_HTML: &str = r#"<html><body><p>Nothing to see</p><img src="/logo.png"></body></html>"#;

const RENDERED_TWO: &str = r#"
<html><body>
  <div class="meme-card"><img src="/r/1.jpg"><div class="meme-text">one</div></div>
  <div class="meme-card"><img src="/r/2.jpg"></div>
  <div class="meme-card"><img src="/assets/avatar.png"></div>
</body></html>
"#;

fn static_pool(n: usize) -> String {
    let cards: String = (0..n)
        .map(|i| format!(r#"<div class="card"><img src="/s/{i}.jpg"></div>"#))
        .collect();
    format!("<html><body>{cards}</body></html>")
}

fn pipeline(fetcher: Arc<FakeFetcher>, renderer: Arc<FakeRenderer>) -> AcquisitionPipeline {
    AcquisitionPipeline::new(fetcher, renderer, base())
}

// ═══════════════════════════════════════════════════════
// PIPELINE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn static_hit_never_touches_renderer() {
    let fetcher = FakeFetcher::ok(&static_pool(3));
    let renderer = FakeRenderer::ok(RENDERED_TWO);
    let result = pipeline(fetcher.clone(), renderer.clone()).acquire().await;

    assert_eq!(renderer.calls(), 0);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    match result {
        Acquisition::Candidates { path, items } => {
            assert_eq!(path, AcquisitionPath::Static { schema: "card" });
            assert_eq!(items.len(), 3);
            assert_eq!(items[0].image_url.as_str(), "https://example.test/s/0.jpg");
        }
        Acquisition::Empty => panic!("expected candidates"),
    }
}

#[tokio::test]
async fn unmatched_static_markup_falls_back_to_renderer_once() {
    let renderer = FakeRenderer::ok(RENDERED_TWO);
    let result = pipeline(FakeFetcher::ok(NO_MATCH_HTML), renderer.clone())
        .acquire()
        .await;

    assert_eq!(renderer.calls(), 1);
    assert_eq!(result.len(), 2);
    match &result {
        Acquisition::Candidates { path, items } => {
            assert_eq!(*path, AcquisitionPath::Rendered);
            assert_eq!(items[0].caption, "one");
            assert_eq!(items[1].caption, memify::DEFAULT_CAPTION);
            assert_eq!(items[1].image_url.as_str(), "https://example.test/r/2.jpg");
        }
        Acquisition::Empty => panic!("expected rendered candidates"),
    }
}

#[tokio::test]
async fn fetch_error_goes_straight_to_renderer() {
    let renderer = FakeRenderer::ok(RENDERED_TWO);
    let result = pipeline(FakeFetcher::failing(503), renderer.clone())
        .acquire()
        .await;

    assert_eq!(renderer.calls(), 1);
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn render_error_degrades_to_empty() {
    let renderer = FakeRenderer::failing();
    let result = pipeline(FakeFetcher::failing(500), renderer.clone())
        .acquire()
        .await;

    assert_eq!(renderer.calls(), 1);
    assert_eq!(result, Acquisition::Empty);
    assert!(result.items().is_empty());
}

#[tokio::test]
async fn rendered_markup_without_cards_is_empty() {
    let renderer = FakeRenderer::ok("<html><body><article><img src='/a.png'></article></body></html>");
    let result = pipeline(FakeFetcher::ok(NO_MATCH_HTML), renderer)
        .acquire()
        .await;
    assert!(result.is_empty());
}

// ═══════════════════════════════════════════════════════
// SERVICE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn no_candidates_means_no_meme_and_history_untouched() {
    let fetcher = SwitchableFetcher::serving(&static_pool(2));
    let service = MemeService::with_parts(
        fetcher.clone(),
        FakeRenderer::ok("<html></html>"),
        base(),
    );
    service.request_meme().await.unwrap();
    assert_eq!(service.served_count().await, 1);

    fetcher.switch_to(NO_MATCH_HTML);
    assert_eq!(service.request_meme().await, Err(NoMemeAvailable));
    assert_eq!(service.served_count().await, 1);

    fetcher.switch_to(&static_pool(2));
    service.request_meme().await.unwrap();
    assert_eq!(service.served_count().await, 2);
}

#[tokio::test]
async fn service_serves_whole_pool_before_repeating() {
    let service = MemeService::with_parts(
        FakeFetcher::ok(&static_pool(5)),
        FakeRenderer::failing(),
        base(),
    );

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let meme = service.request_meme().await.unwrap();
        assert!(seen.insert(meme.image_url));
    }
    assert_eq!(service.served_count().await, 5);

    service.request_meme().await.unwrap();
    assert_eq!(service.served_count().await, 1);
}

#[tokio::test]
async fn concurrent_requests_never_share_a_meme() {
    let service = Arc::new(MemeService::with_parts(
        FakeFetcher::ok(&static_pool(12)),
        FakeRenderer::failing(),
        base(),
    ));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.request_meme().await })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        let meme = handle.await.unwrap().unwrap();
        assert!(seen.insert(meme.image_url), "same meme served twice");
    }
    assert_eq!(service.served_count().await, 12);
}

#[tokio::test]
async fn slow_renders_overlap_between_requests() {
    let renderer = Arc::new(FakeRenderer {
        html: Some(RENDERED_TWO.to_string()),
        delay: Duration::from_millis(300),
        calls: AtomicUsize::new(0),
    });
    let service = Arc::new(MemeService::with_parts(
        FakeFetcher::failing(502),
        renderer.clone(),
        base(),
    ));

    let start = std::time::Instant::now();
    let a = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.request_meme().await }
    });
    let b = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.request_meme().await }
    });
    let first = a.await.unwrap().unwrap();
    let second = b.await.unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(renderer.calls(), 2);
    assert!(start.elapsed() < Duration::from_millis(550));
}

#[test]
fn source_url_is_target() {
    let service = MemeService::with_parts(
        FakeFetcher::ok(""),
        FakeRenderer::failing(),
        base(),
    );
    assert_eq!(service.source_url().as_str(), "https://example.test/page/");
}
