//! FetchDOI Science: DOI and landing-page metadata resolution.

pub mod error;
pub mod http;
pub mod identifiers;
pub mod ontology;
pub mod statements;
pub mod filters;
pub mod language;
pub mod extractor;
pub mod convert;
pub mod metadata;
pub mod channel;
pub mod sources;
pub mod enrichment;
pub mod fetch;

pub use error::{Result, ScienceError};
pub use channel::PublicationChannelResolver;
pub use enrichment::ContributorIdentityEnricher;
pub use fetch::FetchDoiService;
pub use language::LanguageResolver;
pub use metadata::MetadataService;
pub use ontology::{OntologyProperty, PredicateResolver};
