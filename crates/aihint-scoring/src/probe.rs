//! Shared HTTP probe used by the page-inspecting scorers.

use std::time::Duration;

use aihint_core::{Result, ScoreError};
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::debug;

use crate::scorer::ScoreTarget;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bodies are truncated past this point; keyword scans never need more.
const MAX_BODY_BYTES: usize = 512 * 1024;

/// Redirect hops before a fetch is abandoned
const MAX_REDIRECTS: usize = 5;

/// One fetched page: status, headers, and a bounded body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final status after redirects
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body text, truncated to 512 KiB
    pub body: String,
    /// The URL that was actually fetched
    pub url: String,
}

impl FetchedPage {
    /// Body lowercased for keyword scans.
    #[must_use]
    pub fn body_lower(&self) -> String {
        self.body.to_lowercase()
    }

    /// Header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// HTTP client shared by every page-inspecting scorer.
///
/// Wraps one reqwest client with the limits the scorers rely on: bounded
/// bodies, capped redirects, a per-request timeout. The `base` override
/// redirects conventional-path probes to a test server.
#[derive(Clone)]
pub struct HttpProbe {
    client: HttpClient,
    base: Option<String>,
}

impl HttpProbe {
    /// Build a probe with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(format!("aihint/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ScoreError::Http(e.to_string()))?;
        Ok(Self { client, base: None })
    }

    /// Probe with the default timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Override the origin used for conventional-path probes. Testing seam:
    /// points every path at a mock server instead of the target's host.
    #[must_use]
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Absolute URL for a path on the target's origin (or the test base).
    #[must_use]
    pub fn url_for(&self, target: &ScoreTarget, path: &str) -> String {
        let origin = self
            .base
            .clone()
            .unwrap_or_else(|| target.origin());
        format!("{}{path}", origin.trim_end_matches('/'))
    }

    /// Fetch a page, following redirects, truncating the body.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        let mut body = response.text().await.map_err(from_reqwest)?;
        if body.len() > MAX_BODY_BYTES {
            // Truncate on a char boundary.
            let mut cut = MAX_BODY_BYTES;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Ok(FetchedPage {
            status,
            headers,
            body,
            url: final_url,
        })
    }

    /// Fetch the target's homepage.
    pub async fn fetch_homepage(&self, target: &ScoreTarget) -> Result<FetchedPage> {
        self.fetch(&self.url_for(target, "/")).await
    }

    /// True when the URL answers a GET with a non-client-error status.
    pub async fn is_live(&self, url: &str) -> bool {
        match self.fetch(url).await {
            Ok(page) => page.status.is_success(),
            Err(_) => false,
        }
    }

    /// Probe conventional paths in order; first live page wins.
    pub async fn find_first_live(
        &self,
        target: &ScoreTarget,
        paths: &[&str],
    ) -> Option<FetchedPage> {
        for path in paths {
            let url = self.url_for(target, path);
            if let Ok(page) = self.fetch(&url).await {
                if page.status.is_success() {
                    debug!(url = %page.url, "conventional path hit");
                    return Some(page);
                }
            }
        }
        None
    }

    /// Scan homepage markup for an internal link whose href or anchor text
    /// contains any of the keywords, and fetch it.
    pub async fn find_linked_page(
        &self,
        target: &ScoreTarget,
        homepage: &FetchedPage,
        keywords: &[&str],
    ) -> Option<FetchedPage> {
        let href = find_link_href(&homepage.body, keywords)?;
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href
        } else if let Some(rest) = href.strip_prefix('/') {
            self.url_for(target, &format!("/{rest}"))
        } else {
            self.url_for(target, &format!("/{href}"))
        };
        match self.fetch(&url).await {
            Ok(page) if page.status.is_success() => Some(page),
            _ => None,
        }
    }
}

fn from_reqwest(e: reqwest::Error) -> ScoreError {
    if e.is_timeout() {
        ScoreError::Timeout(e.to_string())
    } else {
        ScoreError::Http(e.to_string())
    }
}

/// Pull the first `href` whose value (or nearby anchor text) mentions a
/// keyword. Attribute scan, not a DOM parse; good enough for link discovery.
fn find_link_href(html: &str, keywords: &[&str]) -> Option<String> {
    let lower = html.to_lowercase();
    let mut search_from = 0;

    while let Some(pos) = lower[search_from..].find("href=") {
        let start = search_from + pos + "href=".len();
        let bytes = lower.as_bytes();
        let quote = *bytes.get(start)?;
        let (open, close) = if quote == b'"' || quote == b'\'' {
            (start + 1, quote)
        } else {
            search_from = start;
            continue;
        };
        let Some(len) = lower[open..].find(close as char) else {
            return None;
        };
        let href = &lower[open..open + len];

        // Match on the href itself or this anchor's own text: the window
        // ends at the closing tag (or the next anchor, for unclosed
        // markup) so a later link's text cannot claim this href.
        let after = &lower[open + len..];
        let text_end = match (after.find("</a"), after.find("<a")) {
            (Some(close_tag), Some(next)) => close_tag.min(next),
            (Some(end), None) | (None, Some(end)) => end,
            (None, None) => after.len(),
        };
        let anchor_text = &after[..text_end];
        if keywords.iter().any(|k| href.contains(k) || anchor_text.contains(k)) {
            // Offsets can drift on non-ASCII markup; fall back to the
            // lowercased slice rather than risk a boundary panic.
            let original = html
                .get(open..open + len)
                .unwrap_or(&lower[open..open + len]);
            return Some(original.to_string());
        }
        search_from = open + len;
    }
    None
}
