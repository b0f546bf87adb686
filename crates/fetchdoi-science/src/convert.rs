use fetchdoi_core::{
    Contributor, ContributorRole, CreatePublicationRequest, EntityDescription, Identity,
    PublicationDate, Reference,
};
use url::Url;

use crate::ontology::{DcTerms, OntologyProperty};
use crate::statements::{MetadataGraph, StatementValue};

const DATE_PROPERTIES: [DcTerms; 3] = [DcTerms::Date, DcTerms::Issued, DcTerms::Created];

/// Map a filtered graph onto the request shape. `None` when the graph has no
/// title, no contributors and no DOI, i.e. nothing worth submitting.
pub fn graph_to_request(graph: &MetadataGraph) -> Option<CreatePublicationRequest> {
    let main_title = first_text(graph, OntologyProperty::TITLE);
    let description = first_text(graph, OntologyProperty::DcTerms(DcTerms::Description));
    let abstract_text =
        first_text(graph, OntologyProperty::DcTerms(DcTerms::Abstract)).or_else(|| description.clone());

    let contributors = contributors(graph);
    let reference = reference(graph);

    let has_doi = reference.as_ref().is_some_and(|r| r.doi.is_some());
    if main_title.is_none() && contributors.is_empty() && !has_doi {
        return None;
    }

    let publication_date = DATE_PROPERTIES.iter().find_map(|term| {
        graph
            .with_property(OntologyProperty::DcTerms(*term))
            .find_map(|s| PublicationDate::parse(s.value.as_str()))
    });

    Some(CreatePublicationRequest::new(EntityDescription {
        main_title,
        abstract_text,
        description,
        tags: tags(graph),
        publication_date,
        contributors,
        reference,
        ..Default::default()
    }))
}

fn first_text(graph: &MetadataGraph, property: OntologyProperty) -> Option<String> {
    graph
        .with_property(property)
        .map(|s| s.value.as_str().trim())
        .find(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Creators and contributors numbered in the order they appear in the graph.
fn contributors(graph: &MetadataGraph) -> Vec<Contributor> {
    graph
        .iter()
        .filter_map(|s| {
            let role = if s.property == OntologyProperty::CREATOR {
                ContributorRole::Creator
            } else if s.property == OntologyProperty::CONTRIBUTOR {
                ContributorRole::Other
            } else {
                return None;
            };
            let name = s.value.as_str().trim();
            (!name.is_empty()).then(|| (name.to_string(), role))
        })
        .enumerate()
        .map(|(idx, (name, role))| Contributor::new(Identity::named(name), role, idx as u32 + 1))
        .collect()
}

fn tags(graph: &MetadataGraph) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for statement in graph.with_property(OntologyProperty::DcTerms(DcTerms::Subject)) {
        for tag in statement.value.as_str().split([';', ',']) {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

fn reference(graph: &MetadataGraph) -> Option<Reference> {
    let doi = graph.with_property(OntologyProperty::DOI).find_map(|s| match &s.value {
        StatementValue::Iri(url) => Some(url.clone()),
        StatementValue::Literal(text) => Url::parse(text).ok(),
    });
    let publisher = first_text(graph, OntologyProperty::DcTerms(DcTerms::Publisher));
    let journal = first_text(graph, OntologyProperty::DcTerms(DcTerms::IsPartOf));

    if doi.is_none() && publisher.is_none() && journal.is_none() {
        return None;
    }
    Some(Reference {
        doi,
        publisher,
        journal,
        ..Default::default()
    })
}
