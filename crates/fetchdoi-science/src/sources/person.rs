use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;

/// A registry person record matched by ORCID.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    pub id: Url,
    #[serde(default)]
    pub verified: bool,
}

#[async_trait]
pub trait PersonRegistry: Send + Sync {
    /// `Ok(None)` when the registry has no person with this ORCID.
    async fn lookup_by_orcid(&self, orcid: &str) -> Result<Option<Person>>;
}

#[derive(Clone)]
pub struct HttpPersonRegistry {
    http: HttpClient,
    base_url: String,
}

impl HttpPersonRegistry {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PersonRegistry for HttpPersonRegistry {
    async fn lookup_by_orcid(&self, orcid: &str) -> Result<Option<Person>> {
        let url = format!("{}/person/{}", self.base_url, urlencoding::encode(orcid));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let resp = self.http.fetch(&url, headers).await?;

        match resp.status {
            StatusCode::NOT_FOUND => {
                debug!(orcid, "person not registered");
                Ok(None)
            }
            status if status.is_success() => {
                let person = serde_json::from_str(&resp.body)
                    .map_err(|e| ScienceError::Parse(format!("person record for {orcid}: {e}")))?;
                Ok(Some(person))
            }
            status => Err(ScienceError::ApiError(
                url,
                format!("HTTP {}: {}", status.as_u16(), resp.body),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Server;
    use serde_json::json;

    use super::*;

    fn registry(base: &str) -> HttpPersonRegistry {
        let http = HttpClient::new(Duration::from_secs(5), "fetchdoi-test").unwrap();
        HttpPersonRegistry::new(http, base)
    }

    #[tokio::test]
    async fn finds_a_registered_person() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/person/0000-0002-1825-0097")
            .with_status(200)
            .with_body(json!({"id": "https://registry.example/person/42", "verified": true}).to_string())
            .create_async()
            .await;

        let person = registry(&server.url())
            .lookup_by_orcid("0000-0002-1825-0097")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(person.id.as_str(), "https://registry.example/person/42");
        assert!(person.verified);
    }

    #[tokio::test]
    async fn unknown_orcid_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/person/0000-0000-0000-0000")
            .with_status(404)
            .create_async()
            .await;

        let found = registry(&server.url()).lookup_by_orcid("0000-0000-0000-0000").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn server_errors_and_bad_bodies_are_errors() {
        let mut server = Server::new_async().await;
        let _down = server
            .mock("GET", "/person/0000-0000-0000-0001")
            .with_status(503)
            .create_async()
            .await;
        let _garbled = server
            .mock("GET", "/person/0000-0000-0000-0002")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let reg = registry(&server.url());
        assert!(matches!(
            reg.lookup_by_orcid("0000-0000-0000-0001").await,
            Err(ScienceError::ApiError(..))
        ));
        assert!(matches!(
            reg.lookup_by_orcid("0000-0000-0000-0002").await,
            Err(ScienceError::Parse(_))
        ));
    }
}
