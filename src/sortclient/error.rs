use std::{error::Error, fmt::Display};

use reqwest::StatusCode;

// Given when the sort request did not produce a readable answer. If this reaches the user, the
// server may or may not have sorted the playlist.
#[derive(Debug)]
pub enum TransportError {
    /// The base URL cannot have path segments appended to it
    InvalidUrl(String),
    Request(reqwest::Error),
    /// Error status code with a body that is not JSON, or that claims success
    Status(StatusCode),
    /// Success status code with a body that is not JSON
    Decode(serde_json::Error),
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Request(e) => Some(e),
            TransportError::Decode(e) => Some(e),
            TransportError::InvalidUrl(_) | TransportError::Status(_) => None,
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::InvalidUrl(url) => write!(f, "Invalid server URL: {url}"),
            TransportError::Request(e) => write!(f, "Request failed: {e}"),
            TransportError::Status(code) => write!(f, "Server responded with {code}"),
            TransportError::Decode(e) => write!(f, "Could not read server response: {e}"),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e)
    }
}
