use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScienceError};

pub const DOI_HOST_URL: &str = "https://doi.org/";

static DOI_INPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:doi:\s*|https?://(?:dx\.)?doi\.org/)?(10\.\d{4,9}/\S+)$")
        .expect("valid regex")
});

/// A syntactically valid DOI, as typed by a user or found in a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doi {
    pub raw: String,
    /// `10.xxxx/...` lower-cased, for comparisons.
    pub normalized: String,
    /// `https://doi.org/10.xxxx/...` with the suffix's case preserved.
    pub url: String,
}

impl Doi {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let caps = DOI_INPUT_RE
            .captures(input)
            .ok_or_else(|| ScienceError::InvalidDoi(input.to_string()))?;
        let bare = &caps[1];

        Ok(Self {
            raw: input.to_string(),
            normalized: bare.to_lowercase(),
            url: format!("{DOI_HOST_URL}{bare}"),
        })
    }

    /// Whether `input` is a DOI (bare, `doi:`-prefixed or a doi.org URL).
    pub fn is_doi(input: &str) -> bool {
        DOI_INPUT_RE.is_match(input.trim())
    }
}
