use std::sync::Arc;

use fetchdoi_core::{AppConfig, CreatePublicationRequest, ResourceOwner};
use tracing::info;
use url::Url;

use crate::channel::PublicationChannelResolver;
use crate::enrichment::ContributorIdentityEnricher;
use crate::error::{Result, ScienceError};
use crate::extractor::HtmlMetaExtractor;
use crate::http::HttpClient;
use crate::identifiers::{Doi, DoiExtractor};
use crate::metadata::MetadataService;
use crate::sources::{
    DATACITE_JSON, DoiProxy, DoiTransformer, HttpDoiProxy, HttpPersonRegistry,
    RegistryDoiTransformer,
};

/// Resolves a user-supplied DOI or landing-page URL into a publication request.
///
/// DOIs go through content negotiation at the DOI proxy; anything else is
/// scraped for embedded metadata. The two paths never fall back on each other.
#[derive(Clone)]
pub struct FetchDoiService {
    doi_proxy: Arc<dyn DoiProxy>,
    transformer: Arc<dyn DoiTransformer>,
    metadata: MetadataService,
    enricher: Option<ContributorIdentityEnricher>,
}

impl FetchDoiService {
    pub fn new(
        doi_proxy: Arc<dyn DoiProxy>,
        transformer: Arc<dyn DoiTransformer>,
        metadata: MetadataService,
        enricher: Option<ContributorIdentityEnricher>,
    ) -> Self {
        Self {
            doi_proxy,
            transformer,
            metadata,
            enricher,
        }
    }

    /// Wire up the HTTP implementations of every collaborator.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = HttpClient::from_config(config)?;

        let channels =
            PublicationChannelResolver::new(http.clone(), &config.registries.channel_registry_url);
        let metadata = MetadataService::new(
            Arc::new(HtmlMetaExtractor::new(http.clone())),
            DoiExtractor::with_resolver(http.clone(), &config.doi.short_doi_url),
        );
        let enricher = config.enrichment.enabled.then(|| {
            ContributorIdentityEnricher::with_limit(
                Arc::new(HttpPersonRegistry::new(
                    http.clone(),
                    &config.registries.person_registry_url,
                )),
                config.enrichment.max_unverified_contributors,
            )
        });

        Ok(Self::new(
            Arc::new(HttpDoiProxy::new(http, &config.doi.proxy_url)),
            Arc::new(RegistryDoiTransformer::new(Some(channels))),
            metadata,
            enricher,
        ))
    }

    pub async fn resolve(
        &self,
        input: &str,
        owner: &str,
        customer: Option<&Url>,
    ) -> Result<CreatePublicationRequest> {
        let input = input.trim();

        let (mut request, source) = match Doi::parse(input) {
            Ok(doi) => {
                info!(doi = %doi.normalized, "resolving via DOI proxy");
                let lookup = self.doi_proxy.lookup(&doi, DATACITE_JSON).await?;
                let request = self
                    .transformer
                    .transform(&lookup.json, &lookup.content_location)
                    .await?;
                // Link-style inputs are stamped as typed; bare DOIs get the resolver URL.
                let source = match Url::parse(input) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => url,
                    _ => Url::parse(&doi.url)
                        .map_err(|e| ScienceError::InvalidUrl(format!("{}: {e}", doi.url)))?,
                };
                (request, source)
            }
            Err(_) => {
                let url = Url::parse(input)
                    .map_err(|e| ScienceError::InvalidUrl(format!("{input}: {e}")))?;
                info!(%url, "resolving via embedded page metadata");
                let mut request = self
                    .metadata
                    .generate_request(&url)
                    .await?
                    .ok_or_else(|| ScienceError::MetadataNotFound(url.to_string()))?;
                request.add_associated_link(url.clone());
                (request, url)
            }
        };

        request.entity_description_mut().metadata_source = Some(source);
        request.resource_owner = Some(ResourceOwner {
            owner: owner.to_string(),
            owner_affiliation: customer.cloned(),
        });

        Ok(match &self.enricher {
            Some(enricher) => enricher.enrich(request).await,
            None => request,
        })
    }
}
