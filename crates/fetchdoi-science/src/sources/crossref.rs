use fetchdoi_core::{
    Contributor, ContributorRole, CreatePublicationRequest, EntityDescription, Identity,
    Organization, PublicationDate, Reference,
};
use serde_json::Value;

use crate::error::{Result, ScienceError};
use crate::identifiers::{Doi, normalize_orcid};
use crate::language::LanguageResolver;
use crate::sources::strip_markup;

/// A CrossRef work, read from either the REST API envelope (`{"message": …}`)
/// or a bare CSL-JSON record.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossRefWork {
    pub doi: String,
    pub title: Vec<String>,
    pub author: Vec<CrossRefAuthor>,
    pub editor: Vec<CrossRefAuthor>,
    pub published: Option<PublicationDate>,
    pub container_title: Vec<String>,
    pub publisher: Option<String>,
    pub electronic_issn: Option<String>,
    pub print_issn: Option<String>,
    pub subject: Vec<String>,
    pub language: Option<String>,
    pub abstract_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossRefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
    pub name: Option<String>,
    pub orcid: Option<String>,
    pub affiliation: Vec<String>,
}

impl CrossRefWork {
    pub fn from_json(v: &Value) -> Result<Self> {
        let v = v.get("message").unwrap_or(v);

        let doi = v["DOI"].as_str()
            .ok_or_else(|| ScienceError::Parse("Missing DOI in CrossRef response".to_string()))?
            .to_string();

        let title = string_list(&v["title"]);

        let author = v["author"].as_array()
            .map(|a| a.iter().map(CrossRefAuthor::from_json).collect())
            .unwrap_or_default();
        let editor = v["editor"].as_array()
            .map(|a| a.iter().map(CrossRefAuthor::from_json).collect())
            .unwrap_or_default();

        let published = parse_date(v);
        let container_title = string_list(&v["container-title"]);
        let publisher = v["publisher"].as_str().map(|s| s.to_string());

        let (mut electronic_issn, mut print_issn) = (None, None);
        if let Some(types) = v["issn-type"].as_array() {
            for entry in types {
                let value = entry["value"].as_str().map(|s| s.to_string());
                match entry["type"].as_str() {
                    Some("electronic") => electronic_issn = value,
                    Some("print") => print_issn = value,
                    _ => {}
                }
            }
        }
        if electronic_issn.is_none() && print_issn.is_none() {
            print_issn = string_list(&v["ISSN"]).into_iter().next();
        }

        let subject = string_list(&v["subject"]);
        let language = v["language"].as_str().map(|s| s.to_string());
        let abstract_text = v["abstract"].as_str()
            .map(strip_markup)
            .filter(|s| !s.is_empty());

        Ok(Self {
            doi,
            title,
            author,
            editor,
            published,
            container_title,
            publisher,
            electronic_issn,
            print_issn,
            subject,
            language,
            abstract_text,
        })
    }

    pub fn into_request(self, languages: &LanguageResolver) -> CreatePublicationRequest {
        let contributors = self.author.iter()
            .map(|a| (a, ContributorRole::Creator))
            .chain(self.editor.iter().map(|e| (e, ContributorRole::Editor)))
            .enumerate()
            .map(|(idx, (person, role))| person.to_contributor(role, idx as u32 + 1))
            .collect();

        let doi = Doi::parse(&self.doi)
            .ok()
            .and_then(|doi| url::Url::parse(&doi.url).ok());

        CreatePublicationRequest::new(EntityDescription {
            main_title: self.title.into_iter().next(),
            abstract_text: self.abstract_text,
            tags: self.subject,
            language: Some(languages.resolve(self.language.as_deref())),
            publication_date: self.published,
            contributors,
            reference: Some(Reference {
                doi,
                publisher: self.publisher,
                journal: self.container_title.into_iter().next(),
                online_issn: self.electronic_issn,
                print_issn: self.print_issn,
                channel_id: None,
            }),
            ..Default::default()
        })
    }
}

impl CrossRefAuthor {
    fn from_json(v: &Value) -> Self {
        let given = v["given"].as_str().map(|s| s.to_string());
        let family = v["family"].as_str().map(|s| s.to_string());
        let name = v["name"].as_str().map(|s| s.to_string());
        let orcid = v["ORCID"].as_str().and_then(normalize_orcid);
        let affiliation = v["affiliation"].as_array()
            .map(|a| a.iter().filter_map(|v| v["name"].as_str()).map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Self { given, family, name, orcid, affiliation }
    }

    fn display_name(&self) -> String {
        match (&self.family, &self.given) {
            (Some(f), Some(g)) => format!("{}, {}", f, g),
            (Some(f), None) => f.clone(),
            (None, Some(g)) => g.clone(),
            (None, None) => self.name.clone().unwrap_or_default(),
        }
    }

    fn to_contributor(&self, role: ContributorRole, sequence: u32) -> Contributor {
        let mut identity = Identity::named(self.display_name());
        identity.orcid = self.orcid.clone();
        let mut contributor = Contributor::new(identity, role, sequence);
        contributor.affiliations = self.affiliation.iter()
            .map(|name| Organization { name: name.clone(), id: None })
            .collect();
        contributor
    }
}

fn string_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(|v| v.as_str()).map(|s| s.to_string()).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn parse_date(v: &Value) -> Option<PublicationDate> {
    // CrossRef date parts: "published-print": {"date-parts": [[2017, 6, 12]]}
    ["published-print", "published-online", "issued", "created"]
        .iter()
        .find_map(|key| date_parts(&v[*key]["date-parts"][0]))
}

fn date_parts(parts: &Value) -> Option<PublicationDate> {
    let year = parts[0].as_i64()? as i32;
    let month = parts[1].as_u64().map(|m| m as u32).filter(|m| (1..=12).contains(m));
    let day = month.and(parts[2].as_u64().map(|d| d as u32).filter(|d| (1..=31).contains(d)));
    Some(PublicationDate { year, month, day })
}
