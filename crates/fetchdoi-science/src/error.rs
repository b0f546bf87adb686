use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScienceError {
    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("metadata extraction failed for {0}: {1}")]
    Extraction(String, String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("no metadata found for {0}")]
    MetadataNotFound(String),

    #[error("unsupported DOI registration agency: {0}")]
    UnsupportedRegistry(String),
}

impl ScienceError {
    /// True when the source could not be reached or answered badly, as opposed
    /// to answering fine but carrying no usable metadata.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::ApiError(..) | Self::SourceUnavailable(_) | Self::Extraction(..)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScienceError>;
