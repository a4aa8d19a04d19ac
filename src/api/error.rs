//! Client Error Types
//!
//! Transport and decode failures of backend calls. Application-level
//! refusals (`success: false`) are not errors; they travel in the
//! response body and are interpreted by the page controller.

use thiserror::Error;

/// Errors that can occur when talking to the storefront backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, TLS or protocol failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON shape the endpoint promises
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Base URL or path could not form a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;
