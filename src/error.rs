use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{var} environment variable not set! Get your token from https://console.apify.com/account/integrations")]
    MissingToken { var: &'static str },

    #[error("Apify API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("The selector you are trying to parse is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid content type for a record: {0}")]
    InvalidHeader(String),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// True for API answers with the given status code.
    pub fn is_status(&self, code: StatusCode) -> bool {
        matches!(self, Error::Api { status, .. } if *status == code)
    }
}
