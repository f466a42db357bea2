//! Core data types for meme candidates, fingerprints and acquisition errors.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

/// Caption used when a container carries no caption element or it is empty.
pub const DEFAULT_CAPTION: &str = "Мем с Memify.ru";

/// A single meme pulled out of upstream markup.
///
/// Built fresh on every acquisition cycle and dropped after selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeCandidate {
    /// Absolute image URL, already joined against the page's base URL.
    pub image_url: Url,
    pub caption: String,
}

impl MemeCandidate {
    pub fn new(image_url: Url, caption: impl Into<String>) -> Self {
        Self {
            image_url,
            caption: caption.into(),
        }
    }

    /// Dedup key for this candidate.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

/// Content-addressed digest of a candidate's image URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Lowercase hex SHA-256 of the absolute image URL.
    pub fn of(candidate: &MemeCandidate) -> Self {
        Self::of_url(&candidate.image_url)
    }

    pub fn of_url(url: &Url) -> Self {
        let digest = Sha256::digest(url.as_str().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from the lightweight HTTP path.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to read body: {0}")]
    Body(String),
}

/// Errors from the headless browser path.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Chromium not found. Install Chrome/Chromium or set MEMIFY_CHROMIUM_PATH")]
    BrowserNotFound,

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Failed to capture page markup: {0}")]
    Capture(String),

    #[error("Rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("Browser not available")]
    Unavailable,
}

/// Both acquisition paths came back without a usable candidate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no meme candidates available")]
pub struct NoMemeAvailable;

/// Convenience result types.
pub type FetchResult<T> = Result<T, FetchError>;
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_per_url() {
        let a = MemeCandidate::new(Url::parse("https://example.test/a.png").unwrap(), "a");
        let b = MemeCandidate::new(Url::parse("https://example.test/a.png").unwrap(), "other");
        let c = MemeCandidate::new(Url::parse("https://example.test/b.png").unwrap(), "a");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().as_str().len(), 64);
    }

    #[test]
    fn candidate_serializes_with_plain_url() {
        let meme = MemeCandidate::new(Url::parse("https://example.test/a.png").unwrap(), "кот");
        let json = serde_json::to_value(&meme).unwrap();
        assert_eq!(json["image_url"], "https://example.test/a.png");
        assert_eq!(json["caption"], "кот");
    }
}
