//! Pure pruning rules applied to a resolved [`MetadataGraph`].
//!
//! Each filter answers "should this statement be dropped?" against the full
//! graph. They touch disjoint properties, so application order is irrelevant.

use crate::ontology::OntologyProperty;
use crate::statements::{MetadataGraph, NormalizedStatement};

pub type StatementFilter = fn(&MetadataGraph, &NormalizedStatement) -> bool;

pub const FILTERS: [StatementFilter; 2] = [filter_duplicate_contributors, filter_shorter_titles];

/// A `dc:contributor` that repeats a `dc:creator` of the same subject.
pub fn filter_duplicate_contributors(graph: &MetadataGraph, statement: &NormalizedStatement) -> bool {
    statement.property == OntologyProperty::CONTRIBUTOR
        && graph.contains(&statement.subject, OntologyProperty::CREATOR, &statement.value)
}

/// A literal `dc:title` strictly shorter than the longest title of its subject.
/// Titles tied at the maximum length are all kept.
pub fn filter_shorter_titles(graph: &MetadataGraph, statement: &NormalizedStatement) -> bool {
    if statement.property != OntologyProperty::TITLE {
        return false;
    }
    let Some(title) = statement.value.as_literal() else {
        return false;
    };

    let longest = graph
        .with_property(OntologyProperty::TITLE)
        .filter(|s| s.subject == statement.subject)
        .filter_map(|s| s.value.as_literal())
        .map(char_len)
        .max()
        .unwrap_or(0);

    char_len(title) < longest
}

/// Remove every statement flagged by any of [`FILTERS`].
pub fn apply_filters(graph: &mut MetadataGraph) {
    graph.retain_unflagged(|g, s| FILTERS.iter().any(|filter| filter(g, s)));
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::statements::StatementValue;

    fn subject() -> Url {
        Url::parse("https://example.org/article").unwrap()
    }

    fn literal(property: OntologyProperty, value: &str) -> NormalizedStatement {
        NormalizedStatement::new(subject(), property, StatementValue::Literal(value.to_string()))
    }

    fn values(graph: &MetadataGraph, property: OntologyProperty) -> Vec<String> {
        graph
            .with_property(property)
            .map(|s| s.value.as_str().to_string())
            .collect()
    }

    #[test]
    fn keeps_only_the_longest_title() {
        let mut graph: MetadataGraph = [
            literal(OntologyProperty::TITLE, "Title"),
            literal(OntologyProperty::TITLE, "This is a longer title"),
        ]
        .into_iter()
        .collect();

        apply_filters(&mut graph);
        assert_eq!(values(&graph, OntologyProperty::TITLE), vec!["This is a longer title"]);
    }

    #[test]
    fn keeps_all_titles_tied_at_max_length() {
        let mut graph: MetadataGraph = [
            literal(OntologyProperty::TITLE, "abcd"),
            literal(OntologyProperty::TITLE, "wxyz"),
            literal(OntologyProperty::TITLE, "ab"),
        ]
        .into_iter()
        .collect();

        apply_filters(&mut graph);
        assert_eq!(values(&graph, OntologyProperty::TITLE), vec!["abcd", "wxyz"]);
    }

    #[test]
    fn titles_of_other_subjects_do_not_compete() {
        let other = Url::parse("https://example.org/other").unwrap();
        let graph: MetadataGraph = [
            literal(OntologyProperty::TITLE, "Short"),
            NormalizedStatement::new(
                other,
                OntologyProperty::TITLE,
                StatementValue::Literal("A much longer title elsewhere".to_string()),
            ),
        ]
        .into_iter()
        .collect();

        let short = literal(OntologyProperty::TITLE, "Short");
        assert!(!filter_shorter_titles(&graph, &short));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let graph: MetadataGraph = [
            literal(OntologyProperty::TITLE, "Økonomi"),
            literal(OntologyProperty::TITLE, "Economy"),
        ]
        .into_iter()
        .collect();

        assert!(!filter_shorter_titles(&graph, &literal(OntologyProperty::TITLE, "Økonomi")));
        assert!(!filter_shorter_titles(&graph, &literal(OntologyProperty::TITLE, "Economy")));
    }

    #[test]
    fn removes_contributor_duplicating_a_creator() {
        let mut graph: MetadataGraph = [
            literal(OntologyProperty::CREATOR, "Doe, Jane"),
            literal(OntologyProperty::CONTRIBUTOR, "Doe, Jane"),
            literal(OntologyProperty::CONTRIBUTOR, "Roe, Richard"),
        ]
        .into_iter()
        .collect();

        apply_filters(&mut graph);
        assert_eq!(values(&graph, OntologyProperty::CREATOR), vec!["Doe, Jane"]);
        assert_eq!(values(&graph, OntologyProperty::CONTRIBUTOR), vec!["Roe, Richard"]);
    }

    #[test]
    fn filters_ignore_unrelated_properties() {
        let stmt = literal(OntologyProperty::LANGUAGE, "en");
        let graph: MetadataGraph = [stmt.clone()].into_iter().collect();
        assert!(!filter_duplicate_contributors(&graph, &stmt));
        assert!(!filter_shorter_titles(&graph, &stmt));
    }
}
