use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    NotVerified,
    Verified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributorRole {
    #[default]
    Creator,
    Editor,
    Other,
}

impl std::fmt::Display for ContributorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Creator => "Creator",
            Self::Editor => "Editor",
            Self::Other => "Other",
        };
        write!(f, "{s}")
    }
}

/// Who a contributor is. `id` is the archive's own person identifier and is
/// only ever filled in by identity enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Url>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,

    #[serde(default)]
    pub verification_status: VerificationStatus,
}

impl Identity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
        self.orcid = Some(orcid.into());
        self
    }

    /// Has an ORCID but has not been matched to an archive identifier yet.
    pub fn is_unverified(&self) -> bool {
        self.id.is_none() && self.orcid.as_deref().is_some_and(|o| !o.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Url>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub identity: Identity,

    #[serde(default)]
    pub role: ContributorRole,

    pub sequence: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Organization>,
}

impl Contributor {
    pub fn new(identity: Identity, role: ContributorRole, sequence: u32) -> Self {
        Self {
            identity,
            role,
            sequence,
            affiliations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_without_orcid_is_not_unverified() {
        assert!(!Identity::named("Ada Lovelace").is_unverified());
        assert!(!Identity::named("Ada Lovelace").with_orcid("  ").is_unverified());
    }

    #[test]
    fn identity_with_orcid_and_id_is_not_unverified() {
        let mut identity = Identity::named("Ada Lovelace").with_orcid("0000-0002-1825-0097");
        assert!(identity.is_unverified());

        identity.id = Some(Url::parse("https://example.org/person/1").unwrap());
        assert!(!identity.is_unverified());
    }

    #[test]
    fn verification_status_serializes_in_screaming_case() {
        let json = serde_json::to_string(&VerificationStatus::NotVerified).unwrap();
        assert_eq!(json, "\"NOT_VERIFIED\"");
    }
}
