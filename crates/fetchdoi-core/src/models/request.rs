use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::contributor::Contributor;

// ─── CreatePublicationRequest ───────────────────────────────

/// The normalized "create publication" payload handed to the archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_description: Option<EntityDescription>,

    #[serde(default)]
    pub associated_artifacts: Vec<AssociatedArtifact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_owner: Option<ResourceOwner>,
}

impl CreatePublicationRequest {
    pub fn new(entity_description: EntityDescription) -> Self {
        Self {
            entity_description: Some(entity_description),
            ..Default::default()
        }
    }

    /// Mutable access to the entity description, creating an empty one if absent.
    pub fn entity_description_mut(&mut self) -> &mut EntityDescription {
        self.entity_description.get_or_insert_with(EntityDescription::default)
    }

    pub fn contributors(&self) -> &[Contributor] {
        self.entity_description
            .as_ref()
            .map(|ed| ed.contributors.as_slice())
            .unwrap_or_default()
    }

    pub fn contributors_mut(&mut self) -> Option<&mut Vec<Contributor>> {
        self.entity_description.as_mut().map(|ed| &mut ed.contributors)
    }

    pub fn add_associated_link(&mut self, link: Url) {
        let artifact = AssociatedArtifact::AssociatedLink { id: link };
        if !self.associated_artifacts.contains(&artifact) {
            self.associated_artifacts.push(artifact);
        }
    }
}

// ─── EntityDescription ──────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_title: Option<String>,

    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Lexvo ISO 639-3 URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Url>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<PublicationDate>,

    #[serde(default)]
    pub contributors: Vec<Contributor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,

    /// Where the metadata was resolved from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_source: Option<Url>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<Url>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_issn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_issn: Option<String>,

    /// Identifier of the journal/series in the publication-channel registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

// ─── PublicationDate ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub year: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl PublicationDate {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Parse the date shapes found in embedded metadata: `YYYY`, `YYYY-MM`,
    /// `YYYY-MM-DD`, `YYYY/MM/DD` and RFC 3339 timestamps.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
            return Some(Self::from_naive(ts.date_naive()));
        }

        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
                return Some(Self::from_naive(date));
            }
        }

        // "2020-01-02T10:00:00" without offset, or trailing noise after the day.
        if let Some(head) = input.get(..10)
            && let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d")
        {
            return Some(Self::from_naive(date));
        }

        let mut parts = input.splitn(2, ['-', '/']);
        let year = parse_year(parts.next()?)?;
        match parts.next() {
            None => Some(Self::year(year)),
            Some(month) => {
                let month: u32 = month.parse().ok().filter(|m| (1..=12).contains(m))?;
                Some(Self {
                    year,
                    month: Some(month),
                    day: None,
                })
            }
        }
    }

    fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ─── Artifacts & ownership ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssociatedArtifact {
    AssociatedLink { id: Url },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOwner {
    pub owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_affiliation: Option<Url>,
}
