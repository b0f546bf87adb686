//! Fixed vocabulary for embedded document metadata.
//!
//! Three disjoint tag namespaces are recognised:
//!
//! - **Citation** (`citation_*`, the Highwire Press tags used by Google Scholar),
//!   each pre-mapped onto a canonical property.
//! - **DcTerms** (`DC.*` / `DCTERMS.*`), matched on the local name.
//! - **Raw** bare names such as `doi`.
//!
//! Whatever the source tag, resolution lands on one canonical
//! [`OntologyProperty`] whose IRI is the join key for every later stage.

use std::fmt;

const DC_TERMS_NS: &str = "http://purl.org/dc/terms/";
const BIBO_NS: &str = "http://purl.org/ontology/bibo/";

const CITATION_PREFIX: &str = "citation_";
const DC_PREFIX: &str = "dc.";
const DCTERMS_PREFIX: &str = "dcterms.";

// ─── Canonical properties ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyProperty {
    DcTerms(DcTerms),
    Bibo(Bibo),
}

impl OntologyProperty {
    pub const TITLE: Self = Self::DcTerms(DcTerms::Title);
    pub const CREATOR: Self = Self::DcTerms(DcTerms::Creator);
    pub const CONTRIBUTOR: Self = Self::DcTerms(DcTerms::Contributor);
    pub const IDENTIFIER: Self = Self::DcTerms(DcTerms::Identifier);
    pub const LANGUAGE: Self = Self::DcTerms(DcTerms::Language);
    pub const DOI: Self = Self::Bibo(Bibo::Doi);

    pub fn iri(&self) -> String {
        match self {
            Self::DcTerms(term) => format!("{DC_TERMS_NS}{}", term.local_name()),
            Self::Bibo(term) => format!("{BIBO_NS}{}", term.local_name()),
        }
    }

    /// Properties whose values may carry a DOI.
    pub fn may_hold_doi(&self) -> bool {
        matches!(self, Self::Bibo(Bibo::Doi) | Self::DcTerms(DcTerms::Identifier))
    }
}

impl fmt::Display for OntologyProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DcTerms(term) => write!(f, "dc:{}", term.local_name()),
            Self::Bibo(term) => write!(f, "bibo:{}", term.local_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bibo {
    Doi,
}

impl Bibo {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DcTerms {
    Abstract,
    AccessRights,
    AccrualMethod,
    AccrualPeriodicity,
    AccrualPolicy,
    Alternative,
    Audience,
    Available,
    BibliographicCitation,
    ConformsTo,
    Contributor,
    Coverage,
    Created,
    Creator,
    Date,
    DateAccepted,
    DateCopyrighted,
    DateSubmitted,
    Description,
    EducationLevel,
    Extent,
    Format,
    HasFormat,
    HasPart,
    HasVersion,
    Identifier,
    InstructionalMethod,
    IsFormatOf,
    IsPartOf,
    IsReferencedBy,
    IsReplacedBy,
    IsRequiredBy,
    Issued,
    IsVersionOf,
    Language,
    License,
    Mediator,
    Medium,
    Modified,
    Provenance,
    Publisher,
    References,
    Relation,
    Replaces,
    Requires,
    Rights,
    RightsHolder,
    Source,
    Spatial,
    Subject,
    TableOfContents,
    Temporal,
    Title,
    Type,
    Valid,
}

impl DcTerms {
    pub const ALL: [DcTerms; 55] = [
        Self::Abstract,
        Self::AccessRights,
        Self::AccrualMethod,
        Self::AccrualPeriodicity,
        Self::AccrualPolicy,
        Self::Alternative,
        Self::Audience,
        Self::Available,
        Self::BibliographicCitation,
        Self::ConformsTo,
        Self::Contributor,
        Self::Coverage,
        Self::Created,
        Self::Creator,
        Self::Date,
        Self::DateAccepted,
        Self::DateCopyrighted,
        Self::DateSubmitted,
        Self::Description,
        Self::EducationLevel,
        Self::Extent,
        Self::Format,
        Self::HasFormat,
        Self::HasPart,
        Self::HasVersion,
        Self::Identifier,
        Self::InstructionalMethod,
        Self::IsFormatOf,
        Self::IsPartOf,
        Self::IsReferencedBy,
        Self::IsReplacedBy,
        Self::IsRequiredBy,
        Self::Issued,
        Self::IsVersionOf,
        Self::Language,
        Self::License,
        Self::Mediator,
        Self::Medium,
        Self::Modified,
        Self::Provenance,
        Self::Publisher,
        Self::References,
        Self::Relation,
        Self::Replaces,
        Self::Requires,
        Self::Rights,
        Self::RightsHolder,
        Self::Source,
        Self::Spatial,
        Self::Subject,
        Self::TableOfContents,
        Self::Temporal,
        Self::Title,
        Self::Type,
        Self::Valid,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::AccessRights => "accessRights",
            Self::AccrualMethod => "accrualMethod",
            Self::AccrualPeriodicity => "accrualPeriodicity",
            Self::AccrualPolicy => "accrualPolicy",
            Self::Alternative => "alternative",
            Self::Audience => "audience",
            Self::Available => "available",
            Self::BibliographicCitation => "bibliographicCitation",
            Self::ConformsTo => "conformsTo",
            Self::Contributor => "contributor",
            Self::Coverage => "coverage",
            Self::Created => "created",
            Self::Creator => "creator",
            Self::Date => "date",
            Self::DateAccepted => "dateAccepted",
            Self::DateCopyrighted => "dateCopyrighted",
            Self::DateSubmitted => "dateSubmitted",
            Self::Description => "description",
            Self::EducationLevel => "educationLevel",
            Self::Extent => "extent",
            Self::Format => "format",
            Self::HasFormat => "hasFormat",
            Self::HasPart => "hasPart",
            Self::HasVersion => "hasVersion",
            Self::Identifier => "identifier",
            Self::InstructionalMethod => "instructionalMethod",
            Self::IsFormatOf => "isFormatOf",
            Self::IsPartOf => "isPartOf",
            Self::IsReferencedBy => "isReferencedBy",
            Self::IsReplacedBy => "isReplacedBy",
            Self::IsRequiredBy => "isRequiredBy",
            Self::Issued => "issued",
            Self::IsVersionOf => "isVersionOf",
            Self::Language => "language",
            Self::License => "license",
            Self::Mediator => "mediator",
            Self::Medium => "medium",
            Self::Modified => "modified",
            Self::Provenance => "provenance",
            Self::Publisher => "publisher",
            Self::References => "references",
            Self::Relation => "relation",
            Self::Replaces => "replaces",
            Self::Requires => "requires",
            Self::Rights => "rights",
            Self::RightsHolder => "rightsHolder",
            Self::Source => "source",
            Self::Spatial => "spatial",
            Self::Subject => "subject",
            Self::TableOfContents => "tableOfContents",
            Self::Temporal => "temporal",
            Self::Title => "title",
            Self::Type => "type",
            Self::Valid => "valid",
        }
    }

    /// One of the fifteen original Dublin Core elements. These are only
    /// published under the `DC.` prefix.
    pub fn is_legacy_element(&self) -> bool {
        matches!(
            self,
            Self::Title
                | Self::Creator
                | Self::Subject
                | Self::Description
                | Self::Publisher
                | Self::Contributor
                | Self::Date
                | Self::Type
                | Self::Format
                | Self::Identifier
                | Self::Source
                | Self::Language
                | Self::Relation
                | Self::Coverage
                | Self::Rights
        )
    }

    fn accepts(&self, prefix: DcPrefix) -> bool {
        match prefix {
            DcPrefix::Dc => true,
            DcPrefix::DcTerms => !self.is_legacy_element(),
        }
    }

    fn from_local_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|term| term.local_name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DcPrefix {
    Dc,
    DcTerms,
}

// ─── Source tag tables ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Citation {
    Author,
    CoverDate,
    Date,
    Doi,
    Language,
    PublicationDate,
    Title,
}

impl Citation {
    pub const ALL: [Citation; 7] = [
        Self::Author,
        Self::CoverDate,
        Self::Date,
        Self::Doi,
        Self::Language,
        Self::PublicationDate,
        Self::Title,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::CoverDate => "cover_date",
            Self::Date => "date",
            Self::Doi => "doi",
            Self::Language => "language",
            Self::PublicationDate => "publication_date",
            Self::Title => "title",
        }
    }

    pub fn target(&self) -> OntologyProperty {
        match self {
            Self::Author => OntologyProperty::CREATOR,
            Self::CoverDate | Self::Date | Self::PublicationDate => {
                OntologyProperty::DcTerms(DcTerms::Date)
            }
            Self::Doi => OntologyProperty::DOI,
            Self::Language => OntologyProperty::LANGUAGE,
            Self::Title => OntologyProperty::TITLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMetaTag {
    Doi,
}

impl RawMetaTag {
    pub const ALL: [RawMetaTag; 1] = [Self::Doi];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
        }
    }

    pub fn target(&self) -> OntologyProperty {
        match self {
            Self::Doi => OntologyProperty::DOI,
        }
    }
}

/// A recognised source tag, before it is collapsed onto its canonical property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaTag {
    Citation(Citation),
    DcTerms(DcTerms),
    Raw(RawMetaTag),
}

impl MetaTag {
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        parse_citation(name)
            .map(Self::Citation)
            .or_else(|| parse_dc_terms(name).map(Self::DcTerms))
            .or_else(|| parse_raw(name).map(Self::Raw))
    }

    pub fn property(&self) -> OntologyProperty {
        match self {
            Self::Citation(tag) => tag.target(),
            Self::DcTerms(term) => OntologyProperty::DcTerms(*term),
            Self::Raw(tag) => tag.target(),
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn parse_citation(name: &str) -> Option<Citation> {
    let rest = strip_prefix_ignore_case(name, CITATION_PREFIX)?;
    Citation::ALL
        .into_iter()
        .find(|tag| tag.name().eq_ignore_ascii_case(rest))
}

fn parse_dc_terms(name: &str) -> Option<DcTerms> {
    let (prefix, rest) = strip_prefix_ignore_case(name, DCTERMS_PREFIX)
        .map(|rest| (DcPrefix::DcTerms, rest))
        .or_else(|| strip_prefix_ignore_case(name, DC_PREFIX).map(|rest| (DcPrefix::Dc, rest)))?;
    DcTerms::from_local_name(rest).filter(|term| term.accepts(prefix))
}

fn parse_raw(name: &str) -> Option<RawMetaTag> {
    RawMetaTag::ALL
        .into_iter()
        .find(|tag| tag.name().eq_ignore_ascii_case(name))
}

// ─── PredicateResolver ────────────────────────────────────────────────────────

/// Maps a raw tag name onto its canonical property. `None` means the tag is
/// outside the vocabulary and the statement should be dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateResolver;

impl PredicateResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, raw_name: &str) -> Option<OntologyProperty> {
        MetaTag::parse(raw_name).map(|tag| tag.property())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> Option<OntologyProperty> {
        PredicateResolver::new().resolve(name)
    }

    #[test]
    fn title_variants_collapse_onto_dc_title() {
        for name in ["dc.title", "DC.title", "DC.Title", "citation_title", "CITATION_TITLE"] {
            assert_eq!(resolve(name), Some(OntologyProperty::TITLE), "{name}");
        }
    }

    #[test]
    fn legacy_elements_are_not_published_under_dcterms() {
        assert_eq!(resolve("dcterms.title"), None);
        assert_eq!(resolve("DCTERMS.creator"), None);
    }

    #[test]
    fn qualified_terms_accept_both_prefixes() {
        let expected = Some(OntologyProperty::DcTerms(DcTerms::Abstract));
        assert_eq!(resolve("DCTERMS.abstract"), expected);
        assert_eq!(resolve("dc.abstract"), expected);
        assert_eq!(
            resolve("dcterms.dateAccepted"),
            Some(OntologyProperty::DcTerms(DcTerms::DateAccepted))
        );
        assert_eq!(
            resolve("DCTERMS.ISSUED"),
            Some(OntologyProperty::DcTerms(DcTerms::Issued))
        );
    }

    #[test]
    fn citation_tags_map_to_their_targets() {
        assert_eq!(resolve("citation_author"), Some(OntologyProperty::CREATOR));
        assert_eq!(resolve("citation_doi"), Some(OntologyProperty::DOI));
        assert_eq!(resolve("citation_language"), Some(OntologyProperty::LANGUAGE));
        for name in ["citation_date", "citation_cover_date", "citation_publication_date"] {
            assert_eq!(resolve(name), Some(OntologyProperty::DcTerms(DcTerms::Date)), "{name}");
        }
    }

    #[test]
    fn bare_doi_tag_maps_to_bibo_doi() {
        assert_eq!(resolve("doi"), Some(OntologyProperty::DOI));
        assert_eq!(resolve("DOI"), Some(OntologyProperty::DOI));
    }

    #[test]
    fn unknown_tags_resolve_to_none() {
        for name in ["", "title", "og:title", "citation_journal_title", "dc.", "dc.unknown"] {
            assert_eq!(resolve(name), None, "{name}");
        }
    }

    #[test]
    fn iris_are_stable() {
        assert_eq!(OntologyProperty::TITLE.iri(), "http://purl.org/dc/terms/title");
        assert_eq!(OntologyProperty::DOI.iri(), "http://purl.org/ontology/bibo/doi");
        assert_eq!(
            OntologyProperty::DcTerms(DcTerms::RightsHolder).iri(),
            "http://purl.org/dc/terms/rightsHolder"
        );
    }

    #[test]
    fn local_names_are_unique() {
        let mut names: Vec<&str> = DcTerms::ALL.iter().map(DcTerms::local_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DcTerms::ALL.len());
    }
}
