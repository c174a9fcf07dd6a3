//! # Client Errors
//!
//! Failures of the Platform and Backend API façades.

use std::fmt;
use thiserror::Error;

/// Which Clerk API a request went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    Platform,
    Backend,
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFamily::Platform => f.write_str("platform"),
            ApiFamily::Backend => f.write_str("backend"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("building HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("executing request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("marshaling {what} request: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unmarshaling {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("clerk {api} API error (status {status}): {body}")]
    Api {
        api: ApiFamily,
        status: u16,
        body: String,
    },

    #[error(
        "resolving backend client for {app_id}/{environment}: no backend client registered for application {app_id:?} environment {environment:?}"
    )]
    NotRegistered { app_id: String, environment: String },

    #[error("application {0} was not deleted")]
    NotDeleted(String),

    #[error("backend client registry lock poisoned")]
    RegistryPoisoned,
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
