use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Too many redirects while fetching {0}")]
    TooManyRedirects(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// True when the failure came from the network layer rather than the data.
    pub fn is_network(&self) -> bool {
        matches!(self, ScanError::HttpError(_) | ScanError::TooManyRedirects(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
