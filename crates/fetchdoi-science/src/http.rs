use std::time::Duration;

use fetchdoi_core::AppConfig;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::{Result, ScienceError};

// ─── HttpClient ───────────────────────────────────────────────────────────────

/// Outbound HTTP for every collaborator. Each call is a single round trip with
/// an explicit timeout and no retry.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    no_redirect: reqwest::Client,
}

/// A response whose status has not been judged yet.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub final_url: String,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .build()?;
        let no_redirect = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            no_redirect,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.timeout(), &config.http.user_agent)
    }

    /// GET with any status accepted; callers decide what a non-200 means.
    pub async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        debug!(url, "GET");
        let resp = self.client.get(url).headers(headers).send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let final_url = resp.url().to_string();
        let body = resp.text().await?;
        Ok(HttpResponse {
            status,
            headers,
            final_url,
            body,
        })
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        Ok(self.get_with_headers(url, HeaderMap::new()).await?.body)
    }

    pub async fn get_with_headers(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        let resp = self.fetch(url, headers).await?;
        if !resp.status.is_success() {
            return Err(ScienceError::ApiError(
                url.to_string(),
                format!("HTTP {}: {}", resp.status.as_u16(), resp.body),
            ));
        }
        Ok(resp)
    }

    /// HEAD without following redirects, so 3xx responses reach the caller.
    pub async fn head_no_redirect(&self, url: &str) -> Result<(StatusCode, HeaderMap)> {
        debug!(url, "HEAD");
        let resp = self.no_redirect.head(url).send().await?;
        Ok((resp.status(), resp.headers().clone()))
    }
}
