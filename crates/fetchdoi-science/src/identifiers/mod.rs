pub mod doi;
pub mod extract;
pub mod orcid;

pub use doi::Doi;
pub use extract::{DoiExtractor, canonical_doi, short_doi_segment};
pub use orcid::normalize_orcid;
