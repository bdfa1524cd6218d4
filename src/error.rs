use thiserror::Error;

/// A required value could not be pulled out of a fetched page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unable to parse {field} from webpage")]
    MissingField { field: String },

    #[error("invalid selector {selector:?}")]
    InvalidSelector { selector: String },
}

impl ExtractionError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The URL does not belong to any registered extractor.
    #[error("no extractor accepts URL: {url}")]
    NoMatch { url: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no formats to download for {id}")]
    NoFormats { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
