use std::fmt;

use url::Url;

use crate::ontology::OntologyProperty;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatementValue {
    Literal(String),
    Iri(Url),
}

impl StatementValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Iri(url) => url.as_str(),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Iri(_) => None,
        }
    }
}

impl fmt::Display for StatementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "\"{s}\""),
            Self::Iri(url) => write!(f, "<{url}>"),
        }
    }
}

/// One piece of metadata as found in a document, predicate not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub subject: Url,
    pub raw_predicate: String,
    pub value: StatementValue,
}

impl RawStatement {
    pub fn literal(subject: Url, raw_predicate: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            subject,
            raw_predicate: raw_predicate.into(),
            value: StatementValue::Literal(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedStatement {
    pub subject: Url,
    pub property: OntologyProperty,
    pub value: StatementValue,
}

impl NormalizedStatement {
    pub fn new(subject: Url, property: OntologyProperty, value: StatementValue) -> Self {
        Self {
            subject,
            property,
            value,
        }
    }
}

/// Every normalized statement resolved during one call, in document order.
/// Exact duplicates are kept out on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataGraph {
    statements: Vec<NormalizedStatement>,
}

impl MetadataGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, statement: NormalizedStatement) {
        if !self.statements.contains(&statement) {
            self.statements.push(statement);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedStatement> {
        self.statements.iter()
    }

    pub fn contains(&self, subject: &Url, property: OntologyProperty, value: &StatementValue) -> bool {
        self.statements
            .iter()
            .any(|s| &s.subject == subject && s.property == property && &s.value == value)
    }

    pub fn with_property(&self, property: OntologyProperty) -> impl Iterator<Item = &NormalizedStatement> {
        self.statements.iter().filter(move |s| s.property == property)
    }

    /// Drop every statement `predicate` flags, judging each against the graph
    /// as it was before any removal.
    pub fn retain_unflagged<F>(&mut self, predicate: F)
    where
        F: Fn(&MetadataGraph, &NormalizedStatement) -> bool,
    {
        let keep: Vec<bool> = self.statements.iter().map(|s| !predicate(self, s)).collect();
        let mut flags = keep.into_iter();
        self.statements.retain(|_| flags.next().unwrap_or(true));
    }
}

impl FromIterator<NormalizedStatement> for MetadataGraph {
    fn from_iter<I: IntoIterator<Item = NormalizedStatement>>(iter: I) -> Self {
        let mut graph = Self::new();
        for statement in iter {
            graph.insert(statement);
        }
        graph
    }
}
