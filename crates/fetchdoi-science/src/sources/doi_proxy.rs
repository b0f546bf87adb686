use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_LOCATION, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::identifiers::Doi;
use crate::identifiers::doi::DOI_HOST_URL;

pub const DATACITE_JSON: &str = "application/vnd.datacite.datacite+json";

/// Body of a content-negotiated DOI lookup and where the registry served it
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct DoiLookup {
    pub json: String,
    pub content_location: Url,
}

#[async_trait]
pub trait DoiProxy: Send + Sync {
    async fn lookup(&self, doi: &Doi, content_type: &str) -> Result<DoiLookup>;
}

/// Asks the DOI resolver for a machine-readable record via the `Accept` header.
/// The resolver redirects to whichever registry minted the DOI.
#[derive(Clone)]
pub struct HttpDoiProxy {
    http: HttpClient,
    base_url: String,
}

impl HttpDoiProxy {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, doi: &Doi) -> String {
        // `Doi::url` keeps the suffix case; swap in our resolver host.
        let bare = doi.url.strip_prefix(DOI_HOST_URL).unwrap_or(&doi.normalized);
        format!("{}/{}", self.base_url, bare)
    }
}

#[async_trait]
impl DoiProxy for HttpDoiProxy {
    async fn lookup(&self, doi: &Doi, content_type: &str) -> Result<DoiLookup> {
        let url = self.lookup_url(doi);

        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(content_type)
            .map_err(|e| ScienceError::Parse(format!("invalid content type {content_type}: {e}")))?;
        headers.insert(ACCEPT, accept);

        let resp = self.http.get_with_headers(&url, headers).await?;
        let location = resp
            .header(CONTENT_LOCATION.as_str())
            .unwrap_or(resp.final_url.as_str());
        let content_location = Url::parse(location)
            .or_else(|_| Url::parse(&resp.final_url).and_then(|base| base.join(location)))
            .map_err(|e| ScienceError::InvalidUrl(format!("{location}: {e}")))?;

        debug!(doi = %doi.normalized, %content_location, "DOI record fetched");
        Ok(DoiLookup {
            json: resp.body,
            content_location,
        })
    }
}
