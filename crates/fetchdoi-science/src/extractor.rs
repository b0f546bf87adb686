use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScienceError};
use crate::http::HttpClient;
use crate::statements::RawStatement;

/// Turns a dereferenced document into raw subject/predicate/value statements.
#[async_trait]
pub trait TripleExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<Vec<RawStatement>>;
}

/// Reads `<meta name=… content=…>` tags, the `<title>` element and
/// `<html lang>` from an HTML page. The title element is reported under
/// `dc.title` so it competes with the declared titles; `lang` comes last as
/// `dc.language` so a declared language wins.
#[derive(Clone)]
pub struct HtmlMetaExtractor {
    http: HttpClient,
}

impl HtmlMetaExtractor {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TripleExtractor for HtmlMetaExtractor {
    async fn extract(&self, url: &Url) -> Result<Vec<RawStatement>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.5"),
        );

        let resp = self
            .http
            .get_with_headers(url.as_str(), headers)
            .await
            .map_err(|e| ScienceError::Extraction(url.to_string(), e.to_string()))?;

        let statements = parse_html_statements(&resp.body, url)?;
        debug!(%url, count = statements.len(), "extracted raw statements");
        Ok(statements)
    }
}

pub fn parse_html_statements(html: &str, subject: &Url) -> Result<Vec<RawStatement>> {
    let meta_selector = parse_selector("meta[content]")?;
    let title_selector = parse_selector("head > title")?;
    let html_selector = parse_selector("html[lang]")?;

    let document = Html::parse_document(html);
    let mut statements = Vec::new();

    for element in document.select(&meta_selector) {
        let attrs = element.value();
        let Some(name) = attrs.attr("name").or_else(|| attrs.attr("property")) else {
            continue;
        };
        let content = normalize_whitespace(attrs.attr("content").unwrap_or_default());
        if name.trim().is_empty() || content.is_empty() {
            continue;
        }
        statements.push(RawStatement::literal(subject.clone(), name.trim(), content));
    }

    if let Some(title) = document.select(&title_selector).next() {
        let text = normalize_whitespace(&title.text().collect::<Vec<_>>().join(" "));
        if !text.is_empty() {
            statements.push(RawStatement::literal(subject.clone(), "dc.title", text));
        }
    }

    if let Some(lang) = document
        .select(&html_selector)
        .next()
        .and_then(|root| root.value().attr("lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
    {
        statements.push(RawStatement::literal(subject.clone(), "dc.language", lang));
    }

    Ok(statements)
}

fn parse_selector(input: &str) -> Result<Selector> {
    Selector::parse(input)
        .map_err(|e| ScienceError::Parse(format!("invalid selector {input}: {e}")))
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Server;

    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>Short</title>
  <meta name="citation_title" content="A   much longer
      article title">
  <meta name="DC.creator" content="Doe, Jane">
  <meta name="citation_doi" content="10.1234/abcd">
  <meta property="og:title" content="Open Graph title">
  <meta name="description">
  <meta name="keywords" content="">
</head>
<body><p>Hello</p></body>
</html>"#;

    fn subject() -> Url {
        Url::parse("https://example.org/article").unwrap()
    }

    #[test]
    fn meta_tags_become_raw_statements() {
        let statements = parse_html_statements(PAGE, &subject()).unwrap();
        let pairs: Vec<(&str, &str)> = statements
            .iter()
            .map(|s| (s.raw_predicate.as_str(), s.value.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("citation_title", "A much longer article title"),
                ("DC.creator", "Doe, Jane"),
                ("citation_doi", "10.1234/abcd"),
                ("og:title", "Open Graph title"),
                ("dc.title", "Short"),
                ("dc.language", "en"),
            ]
        );
        assert!(statements.iter().all(|s| s.subject == subject()));
    }

    #[test]
    fn page_without_metadata_yields_nothing() {
        let statements = parse_html_statements("<html><body>plain</body></html>", &subject()).unwrap();
        assert!(statements.is_empty());
    }

    #[tokio::test]
    async fn unreachable_page_is_an_extraction_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(500)
            .create_async()
            .await;

        let http = HttpClient::new(Duration::from_secs(5), "fetchdoi-test").unwrap();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let err = HtmlMetaExtractor::new(http).extract(&url).await.unwrap_err();
        assert!(matches!(err, ScienceError::Extraction(..)));
    }

    #[tokio::test]
    async fn fetches_and_parses_a_page() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let http = HttpClient::new(Duration::from_secs(5), "fetchdoi-test").unwrap();
        let url = Url::parse(&format!("{}/article", server.url())).unwrap();
        let statements = HtmlMetaExtractor::new(http).extract(&url).await.unwrap();
        assert_eq!(statements.len(), 6);
    }
}
