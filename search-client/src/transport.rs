use crate::default_client::SearchHttpClient;
use crate::error::TransportError;
use crate::page::SearchPage;
use crate::page::SearchResponse;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use tracing::warn;

/// Public Open Library deployment.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Source of paged search results.
///
/// Implementations may be called with overlapping requests for different
/// queries; the caller decides which completion is still relevant.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<SearchPage, TransportError>;
}

/// `SearchTransport` backed by an Open Library compatible `search.json`
/// endpoint.
#[derive(Clone, Debug)]
pub struct HttpSearchTransport {
    client: SearchHttpClient,
    base_url: String,
    user_agent: Option<HeaderValue>,
}

impl HttpSearchTransport {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: SearchHttpClient::new(client),
            base_url,
            user_agent: None,
        }
    }

    /// Sends `ua` as the `User-Agent` of every search. A value that is not a
    /// valid header is logged and left out, so reqwest's default is used.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        let ua = ua.into();
        match HeaderValue::from_str(&ua) {
            Ok(hv) => self.user_agent = Some(hv),
            Err(err) => warn!(user_agent = ?ua, "ignoring invalid User-Agent: {err}"),
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/search.json", self.base_url)
    }

    fn map_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl SearchTransport for HttpSearchTransport {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<SearchPage, TransportError> {
        let mut builder = self.client.search(&self.search_url(), query, page);
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }

        let resp = builder.send().await.map_err(Self::map_error)?;
        let status = resp.status();
        let url = resp.url().to_string();
        let bytes = resp.bytes().await.map_err(Self::map_error)?;
        if !status.is_success() {
            let body = String::from_utf8(bytes.to_vec()).ok();
            return Err(TransportError::Http {
                status,
                url: Some(url),
                body,
            });
        }

        let response: SearchResponse = serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        Ok(SearchPage::from(response))
    }
}
