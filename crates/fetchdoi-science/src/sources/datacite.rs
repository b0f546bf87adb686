use fetchdoi_core::{
    Contributor, ContributorRole, CreatePublicationRequest, EntityDescription, Identity,
    Organization, PublicationDate, Reference,
};
use serde_json::Value;

use crate::error::{Result, ScienceError};
use crate::identifiers::{Doi, normalize_orcid};
use crate::language::LanguageResolver;
use crate::sources::strip_markup;

/// A DataCite record in the `application/vnd.datacite.datacite+json` shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DataCiteRecord {
    pub doi: String,
    pub titles: Vec<String>,
    pub creators: Vec<DataCiteName>,
    pub contributors: Vec<DataCiteName>,
    pub publisher: Option<String>,
    pub published: Option<PublicationDate>,
    pub subjects: Vec<String>,
    pub language: Option<String>,
    pub abstract_text: Option<String>,
    pub container_title: Option<String>,
    pub issn: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataCiteName {
    pub name: String,
    pub orcid: Option<String>,
    pub affiliation: Vec<String>,
    /// `contributorType`; only set on contributors.
    pub kind: Option<String>,
}

impl DataCiteRecord {
    pub fn from_json(v: &Value) -> Result<Self> {
        // The REST API wraps records as {"data": {"attributes": {...}}}.
        let v = v.pointer("/data/attributes").unwrap_or(v);

        let doi = v["doi"].as_str()
            .or_else(|| v["id"].as_str())
            .ok_or_else(|| ScienceError::Parse("Missing DOI in DataCite response".to_string()))?
            .to_string();

        let titles = v["titles"].as_array()
            .map(|a| a.iter().filter_map(|t| t["title"].as_str()).map(|s| s.to_string()).collect())
            .unwrap_or_default();

        let creators = names(&v["creators"]);
        let contributors = names(&v["contributors"]);

        // `publisher` is a string in schema 4.4 and an object from 4.5 on.
        let publisher = v["publisher"].as_str()
            .or_else(|| v["publisher"]["name"].as_str())
            .map(|s| s.to_string());

        let published = issued_date(v).or_else(|| publication_year(&v["publicationYear"]));

        let subjects = v["subjects"].as_array()
            .map(|a| a.iter().filter_map(|s| s["subject"].as_str()).map(|s| s.to_string()).collect())
            .unwrap_or_default();

        let language = v["language"].as_str().map(|s| s.to_string());

        let abstract_text = v["descriptions"].as_array().and_then(|a| {
            a.iter()
                .find(|d| d["descriptionType"].as_str() == Some("Abstract"))
                .or_else(|| a.first())
                .and_then(|d| d["description"].as_str())
                .map(strip_markup)
                .filter(|s| !s.is_empty())
        });

        let container_title = v["container"]["title"].as_str().map(|s| s.to_string());
        let issn = container_issn(v);

        Ok(Self {
            doi,
            titles,
            creators,
            contributors,
            publisher,
            published,
            subjects,
            language,
            abstract_text,
            container_title,
            issn,
        })
    }

    pub fn into_request(self, languages: &LanguageResolver) -> CreatePublicationRequest {
        let contributors = self.creators.iter()
            .map(|c| (c, ContributorRole::Creator))
            .chain(self.contributors.iter().map(|c| (c, c.role())))
            .enumerate()
            .map(|(idx, (name, role))| name.to_contributor(role, idx as u32 + 1))
            .collect();

        let doi = Doi::parse(&self.doi)
            .ok()
            .and_then(|doi| url::Url::parse(&doi.url).ok());

        CreatePublicationRequest::new(EntityDescription {
            main_title: self.titles.into_iter().next(),
            abstract_text: self.abstract_text,
            tags: self.subjects,
            language: Some(languages.resolve(self.language.as_deref())),
            publication_date: self.published,
            contributors,
            reference: Some(Reference {
                doi,
                publisher: self.publisher,
                journal: self.container_title,
                print_issn: self.issn,
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

impl DataCiteName {
    fn from_json(v: &Value) -> Option<Self> {
        let name = v["name"].as_str().map(|s| s.to_string()).or_else(|| {
            match (v["familyName"].as_str(), v["givenName"].as_str()) {
                (Some(f), Some(g)) => Some(format!("{}, {}", f, g)),
                (Some(f), None) => Some(f.to_string()),
                (None, Some(g)) => Some(g.to_string()),
                (None, None) => None,
            }
        })?;

        let orcid = v["nameIdentifiers"].as_array().and_then(|ids| {
            ids.iter()
                .filter(|id| {
                    id["nameIdentifierScheme"].as_str()
                        .is_some_and(|s| s.eq_ignore_ascii_case("ORCID"))
                })
                .find_map(|id| id["nameIdentifier"].as_str().and_then(normalize_orcid))
        });

        // Affiliations are plain strings in older records, objects in newer ones.
        let affiliation = v["affiliation"].as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|aff| aff.as_str().or_else(|| aff["name"].as_str()))
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let kind = v["contributorType"].as_str().map(|s| s.to_string());

        Some(Self { name, orcid, affiliation, kind })
    }

    fn role(&self) -> ContributorRole {
        match self.kind.as_deref() {
            Some("Editor") => ContributorRole::Editor,
            _ => ContributorRole::Other,
        }
    }

    fn to_contributor(&self, role: ContributorRole, sequence: u32) -> Contributor {
        let mut identity = Identity::named(self.name.clone());
        identity.orcid = self.orcid.clone();
        let mut contributor = Contributor::new(identity, role, sequence);
        contributor.affiliations = self.affiliation.iter()
            .map(|name| Organization { name: name.clone(), id: None })
            .collect();
        contributor
    }
}

fn names(v: &Value) -> Vec<DataCiteName> {
    v.as_array()
        .map(|a| a.iter().filter_map(DataCiteName::from_json).collect())
        .unwrap_or_default()
}

fn issued_date(v: &Value) -> Option<PublicationDate> {
    v["dates"].as_array()?
        .iter()
        .filter(|d| d["dateType"].as_str() == Some("Issued"))
        .find_map(|d| d["date"].as_str().and_then(PublicationDate::parse))
}

fn publication_year(v: &Value) -> Option<PublicationDate> {
    match v {
        Value::Number(n) => n.as_i64().map(|y| PublicationDate::year(y as i32)),
        Value::String(s) => PublicationDate::parse(s),
        _ => None,
    }
}

fn container_issn(v: &Value) -> Option<String> {
    if v["container"]["identifierType"].as_str() == Some("ISSN")
        && let Some(issn) = v["container"]["identifier"].as_str()
    {
        return Some(issn.to_string());
    }
    v["relatedIdentifiers"].as_array()?
        .iter()
        .filter(|r| r["relatedIdentifierType"].as_str() == Some("ISSN"))
        .find_map(|r| r["relatedIdentifier"].as_str())
        .map(|s| s.to_string())
}
