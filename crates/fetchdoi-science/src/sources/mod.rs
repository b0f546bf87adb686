use once_cell::sync::Lazy;
use regex::Regex;

pub mod crossref;
pub mod datacite;
pub mod doi_proxy;
pub mod person;
pub mod transform;

pub use doi_proxy::{DATACITE_JSON, DoiLookup, DoiProxy, HttpDoiProxy};
pub use person::{HttpPersonRegistry, Person, PersonRegistry};
pub use transform::{DoiTransformer, Registry, RegistryDoiTransformer};

static XML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Drop JATS/HTML tags from an abstract and collapse the leftover whitespace.
pub(crate) fn strip_markup(input: &str) -> String {
    let text = XML_TAG_RE.replace_all(input, " ");
    SPACE_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_jats_tags() {
        assert_eq!(
            strip_markup("<jats:title>Abstract</jats:title>\n<jats:p>Some   text.</jats:p>"),
            "Abstract Some text."
        );
        assert_eq!(strip_markup("plain"), "plain");
    }
}
