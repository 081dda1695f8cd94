//! HTTP plumbing for search requests.

use std::time::Instant;

use reqwest::Response;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use tracing::debug;

/// `reqwest::Client` wrapper whose requests remember the search they belong
/// to, so every outcome is logged with its query and page.
#[derive(Clone, Debug)]
pub struct SearchHttpClient {
    inner: reqwest::Client,
}

impl SearchHttpClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Prepares `GET {endpoint}?q={query}&page={page}`.
    pub fn search(&self, endpoint: &str, query: &str, page: u32) -> SearchRequestBuilder {
        let builder = self
            .inner
            .get(endpoint)
            .query(&[("q", query)])
            .query(&[("page", page)]);
        SearchRequestBuilder {
            builder,
            query: query.to_string(),
            page,
        }
    }
}

#[must_use = "requests are not sent unless `send` is awaited"]
#[derive(Debug)]
pub struct SearchRequestBuilder {
    builder: reqwest::RequestBuilder,
    query: String,
    page: u32,
}

impl SearchRequestBuilder {
    pub fn user_agent(mut self, value: HeaderValue) -> Self {
        self.builder = self.builder.header(USER_AGENT, value);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let started = Instant::now();
        match self.builder.send().await {
            Ok(response) => {
                debug!(
                    query = %self.query,
                    page = self.page,
                    url = %response.url(),
                    status = %response.status(),
                    elapsed = ?started.elapsed(),
                    "search request completed"
                );
                Ok(response)
            }
            Err(error) => {
                debug!(
                    query = %self.query,
                    page = self.page,
                    url = error.url().map(reqwest::Url::as_str),
                    timeout = error.is_timeout(),
                    elapsed = ?started.elapsed(),
                    error = %error,
                    "search request failed"
                );
                Err(error)
            }
        }
    }
}
