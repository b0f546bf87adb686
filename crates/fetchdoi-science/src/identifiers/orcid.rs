use once_cell::sync::Lazy;
use regex::Regex;

static ORCID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{4}-\d{4}-\d{4}-\d{3}[\dX])").expect("valid regex"));

/// Bare ORCID (`0000-0002-1825-0097`) from either the bare form or an
/// `orcid.org` URL.
pub fn normalize_orcid(input: &str) -> Option<String> {
    ORCID_RE
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_orcid_url_prefixes() {
        for input in [
            "0000-0002-1825-0097",
            "http://orcid.org/0000-0002-1825-0097",
            "https://orcid.org/0000-0002-1825-0097",
        ] {
            assert_eq!(normalize_orcid(input).as_deref(), Some("0000-0002-1825-0097"));
        }
    }

    #[test]
    fn checksum_x_is_uppercased() {
        assert_eq!(normalize_orcid("0000-0002-9079-593x").as_deref(), Some("0000-0002-9079-593X"));
    }

    #[test]
    fn rejects_non_orcids() {
        assert_eq!(normalize_orcid("Jane Doe"), None);
        assert_eq!(normalize_orcid(""), None);
    }
}
