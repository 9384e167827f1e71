use super::page::{Page, PAGE_SIZE};
use crate::storage::{Article, Source};
use crate::store::{Category, Filter};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Title the upstream API substitutes for withdrawn articles.
const REMOVED_TITLE: &str = "[Removed]";

// ============================================================================
// Errors
// ============================================================================

/// Broad failure classes, which decide how the UI surfaces an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential or unusable endpoint. Persistent, never retried.
    Configuration,
    /// The remote service reported a failure.
    Upstream,
    /// Transport-level failure.
    Network,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("News API key is not configured. Set NEWS_API_KEY or api_key in config.toml.")]
    MissingApiKey,
    #[error("Invalid news API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response from news API: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The task running the request died before producing a response.
    #[error("Request task failed: {0}")]
    TaskFailed(String),
}

impl NewsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsError::MissingApiKey | NewsError::InvalidBaseUrl(_) | NewsError::InsecureBaseUrl => {
                ErrorKind::Configuration
            }
            NewsError::Upstream { .. }
            | NewsError::ResponseTooLarge(_)
            | NewsError::Malformed(_) => ErrorKind::Upstream,
            NewsError::Network(_) | NewsError::TaskFailed(_) => ErrorKind::Network,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody {
    status: String,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<RawArticle>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
}

impl RawArticle {
    /// Whitelist the known fields; `None` for entries that must not enter the model.
    fn normalize(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty() && t.as_str() != REMOVED_TITLE)?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let source = self.source.map_or_else(
            || Source {
                id: None,
                name: String::new(),
            },
            |s| Source {
                id: s.id,
                name: s.name.unwrap_or_default(),
            },
        );
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Article {
            source,
            author: self.author,
            title,
            description: self.description,
            url,
            url_to_image: self.url_to_image,
            published_at,
            content: self.content,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build the pooled HTTP client used for all news API requests.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(timeout)
        .build()
}

/// Client for a NewsAPI-compatible service.
///
/// Cheap to clone: the HTTP connection pool and the key are shared.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    country: String,
}

impl NewsClient {
    pub fn new(
        http: reqwest::Client,
        api_key: Option<SecretString>,
        base_url: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into(),
            country: country.into(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch one page of articles for `filter`. Pages are 1-based.
    ///
    /// Performs exactly one request; retry policy belongs to the caller.
    pub async fn fetch_page(&self, filter: &Filter, page: u32) -> Result<Page, NewsError> {
        let api_key = self.api_key.as_ref().ok_or(NewsError::MissingApiKey)?;
        let url = self.page_url(filter, page)?;

        tracing::debug!(filter = %filter, page, endpoint = %url.path(), "Fetching news page");

        let response = self
            .http
            .get(url)
            .header("X-Api-Key", api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body = read_limited_body(response, MAX_BODY_SIZE).await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("News API request failed with HTTP {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), message = %message, "News API request failed");
            return Err(NewsError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: ResponseBody = serde_json::from_slice(&body)?;
        if body.status != "ok" {
            let message = body
                .message
                .unwrap_or_else(|| "News API reported an error".to_string());
            return Err(NewsError::Upstream {
                status: None,
                message,
            });
        }

        let reported = body.articles.len();
        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(RawArticle::normalize)
            .collect();

        tracing::debug!(
            page,
            reported,
            kept = articles.len(),
            total = body.total_results,
            "News page fetched"
        );

        Ok(Page::new(articles, page, body.total_results))
    }

    /// Resolve the endpoint and query for a filter.
    fn page_url(&self, filter: &Filter, page: u32) -> Result<Url, NewsError> {
        let base = self.base_url.trim_end_matches('/');

        if !base.starts_with("https://") {
            let is_localhost =
                base.starts_with("http://127.0.0.1") || base.starts_with("http://localhost");
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS base URL");
                return Err(NewsError::InsecureBaseUrl);
            }
        }

        let search = filter.search_query().filter(|q| !q.trim().is_empty());
        let endpoint = if search.is_some() {
            "everything"
        } else {
            "top-headlines"
        };

        let mut url = Url::parse(&format!("{}/{}", base, endpoint))
            .map_err(|e| NewsError::InvalidBaseUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(q) = search {
                query.append_pair("q", q);
            } else {
                let category = filter
                    .category()
                    .and_then(Category::api_name)
                    .unwrap_or("general");
                query.append_pair("category", category);
                query.append_pair("country", &self.country);
            }
            query.append_pair("pageSize", &PAGE_SIZE.to_string());
            query.append_pair("page", &page.to_string());
        }

        Ok(url)
    }
}

async fn read_limited_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, NewsError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
