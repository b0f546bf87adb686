use async_trait::async_trait;
use fetchdoi_core::CreatePublicationRequest;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::channel::PublicationChannelResolver;
use crate::error::{Result, ScienceError};
use crate::language::LanguageResolver;
use crate::sources::crossref::CrossRefWork;
use crate::sources::datacite::DataCiteRecord;

#[async_trait]
pub trait DoiTransformer: Send + Sync {
    async fn transform(&self, json: &str, content_location: &Url) -> Result<CreatePublicationRequest>;
}

/// Record schema a DOI record is written in. CrossRef serves DataCite-schema
/// records too when asked for them, so the schema is not the serving agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registry {
    CrossRef,
    DataCite,
}

impl Registry {
    /// Decide by the record's own keys first (`doi`/`creators`/`titles` vs
    /// CSL `DOI`); only a record with neither falls back to the serving host.
    pub fn detect(content_location: &Url, record: &Value) -> Option<Self> {
        if is_datacite_schema(record) {
            return Some(Self::DataCite);
        }
        if record.get("message").unwrap_or(record).get("DOI").is_some() {
            return Some(Self::CrossRef);
        }

        let host = content_location.host_str()?.to_ascii_lowercase();
        if host.ends_with("crossref.org") {
            Some(Self::CrossRef)
        } else if host.ends_with("datacite.org") {
            Some(Self::DataCite)
        } else {
            None
        }
    }
}

fn is_datacite_schema(record: &Value) -> bool {
    record.pointer("/data/attributes").is_some()
        || ["doi", "creators", "titles"]
            .iter()
            .any(|key| record.get(key).is_some())
}

/// Maps CrossRef and DataCite records to a request, then looks up the journal
/// in the publication-channel registry when one is configured.
#[derive(Clone, Default)]
pub struct RegistryDoiTransformer {
    channels: Option<PublicationChannelResolver>,
    languages: LanguageResolver,
}

impl RegistryDoiTransformer {
    pub fn new(channels: Option<PublicationChannelResolver>) -> Self {
        Self {
            channels,
            languages: LanguageResolver::new(),
        }
    }

    async fn attach_channel(&self, request: &mut CreatePublicationRequest) {
        let Some(channels) = &self.channels else {
            return;
        };
        let Some(ed) = request.entity_description.as_mut() else {
            return;
        };
        let Some(year) = ed.publication_date.map(|d| d.year) else {
            debug!("no publication year, skipping channel lookup");
            return;
        };
        let Some(reference) = ed.reference.as_mut() else {
            return;
        };

        reference.channel_id = channels
            .lookup_channel(
                reference.journal.as_deref(),
                reference.online_issn.as_deref(),
                reference.print_issn.as_deref(),
                year,
            )
            .await;
    }
}

#[async_trait]
impl DoiTransformer for RegistryDoiTransformer {
    async fn transform(&self, json: &str, content_location: &Url) -> Result<CreatePublicationRequest> {
        let record: Value = serde_json::from_str(json)
            .map_err(|e| ScienceError::Parse(format!("DOI record from {content_location}: {e}")))?;

        let registry = Registry::detect(content_location, &record)
            .ok_or_else(|| ScienceError::UnsupportedRegistry(content_location.to_string()))?;
        info!(?registry, %content_location, "transforming DOI record");

        let mut request = match registry {
            Registry::CrossRef => CrossRefWork::from_json(&record)?.into_request(&self.languages),
            Registry::DataCite => DataCiteRecord::from_json(&record)?.into_request(&self.languages),
        };

        self.attach_channel(&mut request).await;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::http::HttpClient;

    fn location(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn detects_schema_by_keys_then_by_host() {
        let empty = json!({});
        assert_eq!(
            Registry::detect(&location("https://api.crossref.org/works/10.1/x"), &empty),
            Some(Registry::CrossRef)
        );
        assert_eq!(
            Registry::detect(&location("https://data.datacite.org/10.1/x"), &empty),
            Some(Registry::DataCite)
        );
        assert_eq!(
            Registry::detect(&location("https://example.org/x"), &json!({"DOI": "10.1/x"})),
            Some(Registry::CrossRef)
        );
        assert_eq!(
            Registry::detect(
                &location("https://example.org/x"),
                &json!({"message": {"DOI": "10.1/x"}})
            ),
            Some(Registry::CrossRef)
        );
        assert_eq!(
            Registry::detect(&location("https://example.org/x"), &json!({"doi": "10.1/x"})),
            Some(Registry::DataCite)
        );
        assert_eq!(Registry::detect(&location("https://example.org/x"), &empty), None);
    }

    #[test]
    fn datacite_schema_from_a_crossref_host_is_datacite() {
        let crossref = location("https://api.crossref.org/v1/works/10.1038/nature14539/transform");
        assert_eq!(
            Registry::detect(&crossref, &json!({"doi": "10.1038/nature14539"})),
            Some(Registry::DataCite)
        );
        assert_eq!(
            Registry::detect(&crossref, &json!({"titles": [{"title": "Deep learning"}]})),
            Some(Registry::DataCite)
        );
        assert_eq!(
            Registry::detect(
                &location("https://data.datacite.org/10.1/x"),
                &json!({"DOI": "10.1/x"})
            ),
            Some(Registry::CrossRef)
        );
    }

    #[tokio::test]
    async fn datacite_record_served_by_crossref_transforms() {
        let record = json!({
            "id": "https://doi.org/10.1038/nature14539",
            "doi": "10.1038/nature14539",
            "creators": [
                {"nameType": "Personal", "name": "LeCun, Yann", "givenName": "Yann", "familyName": "LeCun"},
                {"nameType": "Personal", "name": "Bengio, Yoshua"}
            ],
            "titles": [{"title": "Deep learning"}],
            "publisher": "Springer Science and Business Media LLC",
            "publicationYear": 2015
        });
        let request = RegistryDoiTransformer::new(None)
            .transform(
                &record.to_string(),
                &location("https://api.crossref.org/v1/works/10.1038/nature14539/transform"),
            )
            .await
            .unwrap();

        let ed = request.entity_description.unwrap();
        assert_eq!(ed.main_title.as_deref(), Some("Deep learning"));
        assert_eq!(ed.contributors.len(), 2);
        assert_eq!(ed.contributors[0].identity.name, "LeCun, Yann");
        assert_eq!(ed.publication_date.map(|d| d.year), Some(2015));
        assert_eq!(
            ed.reference.unwrap().doi.as_ref().map(Url::as_str),
            Some("https://doi.org/10.1038/nature14539")
        );
    }

    #[tokio::test]
    async fn unknown_registry_is_rejected() {
        let err = RegistryDoiTransformer::new(None)
            .transform(r#"{"title": "x"}"#, &location("https://medra.org/10.1/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScienceError::UnsupportedRegistry(_)));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let err = RegistryDoiTransformer::new(None)
            .transform("<html>", &location("https://api.crossref.org/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScienceError::Parse(_)));
    }

    #[tokio::test]
    async fn crossref_record_gets_a_channel() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/journal")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".to_string(), "1476-4687".to_string()),
                Matcher::UrlEncoded("year".to_string(), "2015".to_string()),
            ]))
            .with_status(200)
            .with_body(json!([{"id": "https://channels.example/journal/nature/2015"}]).to_string())
            .expect(1)
            .create_async()
            .await;

        let http = HttpClient::new(Duration::from_secs(5), "fetchdoi-test").unwrap();
        let transformer =
            RegistryDoiTransformer::new(Some(PublicationChannelResolver::new(http, &server.url())));

        let record = json!({
            "DOI": "10.1038/nature14539",
            "title": ["Deep learning"],
            "author": [{"given": "Yann", "family": "LeCun"}],
            "container-title": ["Nature"],
            "issn-type": [{"value": "1476-4687", "type": "electronic"}],
            "issued": {"date-parts": [[2015, 5, 28]]}
        });
        let request = transformer
            .transform(&record.to_string(), &location("https://api.crossref.org/v1/works/10.1038/nature14539/transform"))
            .await
            .unwrap();

        let ed = request.entity_description.unwrap();
        assert_eq!(ed.main_title.as_deref(), Some("Deep learning"));
        assert_eq!(
            ed.reference.unwrap().channel_id.as_deref(),
            Some("https://channels.example/journal/nature/2015")
        );
        m.assert_async().await;
    }

    #[tokio::test]
    async fn datacite_record_without_year_skips_channel_lookup() {
        let mut server = Server::new_async().await;
        let m = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let http = HttpClient::new(Duration::from_secs(5), "fetchdoi-test").unwrap();
        let transformer =
            RegistryDoiTransformer::new(Some(PublicationChannelResolver::new(http, &server.url())));

        let record = json!({
            "doi": "10.5061/dryad.8515",
            "titles": [{"title": "A dataset"}],
            "container": {"title": "Dryad", "identifierType": "ISSN", "identifier": "1234-5678"}
        });
        let request = transformer
            .transform(&record.to_string(), &location("https://data.datacite.org/10.5061/dryad.8515"))
            .await
            .unwrap();

        let ed = request.entity_description.unwrap();
        assert_eq!(ed.main_title.as_deref(), Some("A dataset"));
        assert!(ed.reference.unwrap().channel_id.is_none());
        m.assert_async().await;
    }
}
