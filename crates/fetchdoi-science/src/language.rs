use isolang::Language;
use once_cell::sync::Lazy;
use url::Url;

pub const LEXVO_ISO639_3: &str = "https://lexvo.org/id/iso639-3/";
pub const UNDETERMINED: &str = "und";

static UNDETERMINED_URI: Lazy<Url> =
    Lazy::new(|| lexvo_uri(UNDETERMINED).expect("valid lexvo URL"));

/// Normalizes a language tag into a Lexvo ISO 639-3 URI. Never fails: anything
/// it cannot place becomes `und`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageResolver;

impl LanguageResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, input: Option<&str>) -> Url {
        input
            .and_then(iso639_3_code)
            .and_then(lexvo_uri)
            .unwrap_or_else(|| UNDETERMINED_URI.clone())
    }
}

/// `de`, `DE`, `de-AT`, `de_DE` and `deu` all give `deu`.
pub fn iso639_3_code(input: &str) -> Option<&'static str> {
    let primary = input
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }?;
    Some(language.to_639_3())
}

fn lexvo_uri(code: &str) -> Option<Url> {
    Url::parse(&format!("{LEXVO_ISO639_3}{code}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: Option<&str>) -> String {
        LanguageResolver::new().resolve(input).to_string()
    }

    #[test]
    fn two_letter_codes_map_to_iso639_3() {
        assert_eq!(resolve(Some("de")), "https://lexvo.org/id/iso639-3/deu");
        assert_eq!(resolve(Some("DE")), "https://lexvo.org/id/iso639-3/deu");
        assert_eq!(resolve(Some("en")), "https://lexvo.org/id/iso639-3/eng");
        assert_eq!(resolve(Some("nb")), "https://lexvo.org/id/iso639-3/nob");
    }

    #[test]
    fn region_subtags_are_ignored() {
        assert_eq!(resolve(Some("en-GB")), "https://lexvo.org/id/iso639-3/eng");
        assert_eq!(resolve(Some("de_AT")), "https://lexvo.org/id/iso639-3/deu");
    }

    #[test]
    fn three_letter_codes_pass_through() {
        assert_eq!(resolve(Some("nob")), "https://lexvo.org/id/iso639-3/nob");
        assert_eq!(resolve(Some("ENG")), "https://lexvo.org/id/iso639-3/eng");
    }

    #[test]
    fn blank_absent_and_unknown_fall_back_to_und() {
        for input in [None, Some(""), Some("   "), Some("xx"), Some("klingon"), Some("q")] {
            assert_eq!(resolve(input), "https://lexvo.org/id/iso639-3/und", "{input:?}");
        }
    }
}
