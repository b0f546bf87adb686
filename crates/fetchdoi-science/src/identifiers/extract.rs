use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use tracing::{debug, warn};
use url::Url;

use crate::http::HttpClient;
use crate::identifiers::doi::DOI_HOST_URL;
use crate::ontology::OntologyProperty;
use crate::statements::{NormalizedStatement, StatementValue};

static DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(doi:|doc:|https?://(dx\.)?doi\.org/)?10\.\d{4,9}/.+$").expect("valid regex")
});

// A value already tagged as a DOI may use any registrant length.
static TAGGED_DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(doi:|doc:|https?://(dx\.)?doi\.org/)?10\.\d+/.+$").expect("valid regex")
});

static SHORT_DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://doi\.org/([^/]+)/?$").expect("valid regex"));

/// Turn a DOI-looking value into `https://doi.org/10.…`.
///
/// `tagged` relaxes the registrant check for values that came from a property
/// which already claims to be a DOI.
pub fn canonical_doi(value: &str, tagged: bool) -> Option<Url> {
    let value = value.trim();
    let re = if tagged { &TAGGED_DOI_RE } else { &DOI_RE };
    if !re.is_match(value) {
        return None;
    }
    let start = value.find("10.")?;
    Url::parse(&format!("{DOI_HOST_URL}{}", &value[start..])).ok()
}

/// The single path segment of a `doi.org/<short>` URL.
pub fn short_doi_segment(value: &str) -> Option<&str> {
    SHORT_DOI_RE
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Finds DOIs in identifier-like statements, following short-DOI redirects.
#[derive(Clone)]
pub struct DoiExtractor {
    http: HttpClient,
    resolver_base: String,
}

impl DoiExtractor {
    /// Short DOIs are looked up at `{resolver_base}/{segment}`; always https in
    /// production.
    pub fn with_resolver(http: HttpClient, resolver_base: &str) -> Self {
        Self {
            http,
            resolver_base: resolver_base.trim_end_matches('/').to_string(),
        }
    }

    /// Canonical DOI carried by `value` under `property`, if any.
    pub async fn extract(&self, property: OntologyProperty, value: &str) -> Option<Url> {
        if !property.may_hold_doi() {
            return None;
        }
        if let Some(doi) = canonical_doi(value, property == OntologyProperty::DOI) {
            return Some(doi);
        }
        let segment = short_doi_segment(value)?;
        self.resolve_short_doi(segment).await
    }

    /// Rewrite a statement that carries a DOI to `bibo:doi` with the canonical
    /// value. Identifiers without a DOI are left alone; a `bibo:doi` statement
    /// whose value yields no DOI is dropped.
    pub async fn retag(&self, statement: NormalizedStatement) -> Option<NormalizedStatement> {
        if !statement.property.may_hold_doi() {
            return Some(statement);
        }
        match self.extract(statement.property, statement.value.as_str()).await {
            Some(doi) => Some(NormalizedStatement::new(
                statement.subject,
                OntologyProperty::DOI,
                StatementValue::Iri(doi),
            )),
            None if statement.property == OntologyProperty::DOI => {
                debug!(value = %statement.value, "discarding unusable DOI value");
                None
            }
            None => Some(statement),
        }
    }

    async fn resolve_short_doi(&self, segment: &str) -> Option<Url> {
        let url = format!("{}/{}", self.resolver_base, segment);
        let (status, headers) = match self.http.head_no_redirect(&url).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(%url, error = %err, "short DOI lookup failed");
                return None;
            }
        };

        if status != StatusCode::MOVED_PERMANENTLY {
            debug!(%url, status = status.as_u16(), "short DOI did not redirect");
            return None;
        }

        let location = headers.get(LOCATION).and_then(|v| v.to_str().ok())?;
        canonical_doi(location, true).or_else(|| Url::parse(location).ok())
    }
}
