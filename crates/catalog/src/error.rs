use thiserror::Error;

/// Failure while fetching or parsing the remote listing. Recovered inside [`crate::CatalogCache`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog endpoint returned HTTP {status}")]
    Http { status: u16 },

    #[error("catalog request failed: {0}")]
    Network(String),

    #[error("catalog request timed out")]
    Timeout,

    #[error("malformed catalog payload: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}
