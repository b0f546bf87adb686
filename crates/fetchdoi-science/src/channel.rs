use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct ChannelHit {
    id: Option<String>,
}

/// Finds the registry identifier of a journal or series. Candidates are tried
/// in a fixed order: electronic ISSN, printed ISSN, then free-text name.
#[derive(Clone)]
pub struct PublicationChannelResolver {
    http: HttpClient,
    base_url: String,
}

impl PublicationChannelResolver {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn lookup_channel(
        &self,
        name: Option<&str>,
        electronic_issn: Option<&str>,
        printed_issn: Option<&str>,
        year: i32,
    ) -> Option<String> {
        for term in [electronic_issn, printed_issn, name] {
            let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
                continue;
            };
            match self.query(term, year).await {
                Ok(Some(id)) => return Some(id),
                Ok(None) => debug!(term, year, "no channel match"),
                Err(err) => warn!(term, year, error = %err, "channel lookup failed"),
            }
        }
        None
    }

    async fn query(&self, term: &str, year: i32) -> Result<Option<String>> {
        let mut url = Url::parse(&format!("{}/journal", self.base_url))
            .map_err(|e| ScienceError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.query_pairs_mut()
            .append_pair("query", term)
            .append_pair("year", &year.to_string());

        let resp = self.http.fetch(url.as_str(), HeaderMap::new()).await?;
        if resp.status != StatusCode::OK {
            debug!(url = %url, status = resp.status.as_u16(), "channel registry refused query");
            return Ok(None);
        }

        let hits: Vec<ChannelHit> =
            serde_json::from_str(&resp.body).map_err(|e| ScienceError::Parse(e.to_string()))?;
        Ok(hits
            .into_iter()
            .next()
            .and_then(|hit| hit.id)
            .filter(|id| !id.trim().is_empty()))
    }
}
