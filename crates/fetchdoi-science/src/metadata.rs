use std::sync::Arc;

use fetchdoi_core::CreatePublicationRequest;
use tracing::{debug, info};
use url::Url;

use crate::convert::graph_to_request;
use crate::error::Result;
use crate::extractor::TripleExtractor;
use crate::filters::apply_filters;
use crate::identifiers::DoiExtractor;
use crate::language::LanguageResolver;
use crate::ontology::{OntologyProperty, PredicateResolver};
use crate::statements::{MetadataGraph, NormalizedStatement};

/// Builds a publication request from whatever structured metadata a web page
/// embeds.
#[derive(Clone)]
pub struct MetadataService {
    extractor: Arc<dyn TripleExtractor>,
    doi_extractor: DoiExtractor,
    predicates: PredicateResolver,
    languages: LanguageResolver,
}

impl MetadataService {
    pub fn new(extractor: Arc<dyn TripleExtractor>, doi_extractor: DoiExtractor) -> Self {
        Self {
            extractor,
            doi_extractor,
            predicates: PredicateResolver::new(),
            languages: LanguageResolver::new(),
        }
    }

    /// `Ok(None)` means the page was read but carried no usable metadata;
    /// failing to read it at all is an error.
    pub async fn generate_request(&self, url: &Url) -> Result<Option<CreatePublicationRequest>> {
        let raw = self.extractor.extract(url).await?;

        let mut language = None;
        let mut graph = MetadataGraph::new();
        for statement in raw {
            let Some(property) = self.predicates.resolve(&statement.raw_predicate) else {
                debug!(predicate = %statement.raw_predicate, "dropping unmapped predicate");
                continue;
            };
            if property == OntologyProperty::LANGUAGE && language.is_none() {
                language = Some(statement.value.as_str().to_string());
            }

            let normalized = NormalizedStatement::new(statement.subject, property, statement.value);
            if let Some(normalized) = self.doi_extractor.retag(normalized).await {
                graph.insert(normalized);
            }
        }

        if graph.is_empty() {
            info!(%url, "no recognised metadata on page");
            return Ok(None);
        }

        apply_filters(&mut graph);

        let Some(mut request) = graph_to_request(&graph) else {
            info!(%url, statements = graph.len(), "metadata did not convert to a request");
            return Ok(None);
        };

        request.entity_description_mut().language = Some(self.languages.resolve(language.as_deref()));
        Ok(Some(request))
    }
}
