//! # HTTP Transport
//!
//! One authenticated request/response cycle against a Clerk API base URL.
//!
//! Paths are given as segments and percent-encoded onto the base URL, so an
//! id containing `/` or `?` stays a single segment. Bodies are JSON;
//! `Content-Type` is only sent when a body is. Any non-2xx response becomes
//! [`ClientError::Api`] carrying the status and raw body. There are no
//! retries and no client-side timeouts.

use crate::client::error::{ApiFamily, ClientError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, debug_span, field, Instrument, Span};

/// Placeholder body type for requests without a body
pub(crate) const NO_BODY: Option<&()> = None;

#[derive(Clone)]
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    token: SecretString,
    api: ApiFamily,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn new(http: Client, base_url: &str, token: SecretString, api: ApiFamily) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            api,
        }
    }

    /// Request URL with each path segment percent-encoded
    fn url(&self, path: &[&str]) -> Result<Url, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Send a request and decode the JSON response
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        what: &'static str,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.send(method, path, query, body, what).await?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { what, source })
    }

    /// Send a request and return the raw response body
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        what: &'static str,
    ) -> Result<Vec<u8>, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        let span = debug_span!(
            "clerk.api.request",
            api = %self.api,
            http.method = %method,
            http.path = url.path(),
            http.status = field::Empty,
        );

        async move {
            let mut request = self
                .http
                .request(method, url)
                .bearer_auth(self.token.expose_secret());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                let payload = serde_json::to_vec(body)
                    .map_err(|source| ClientError::Encode { what, source })?;
                request = request.header(CONTENT_TYPE, "application/json").body(payload);
            }

            let response = request.send().await.map_err(ClientError::Transport)?;
            let status = response.status();
            Span::current().record("http.status", status.as_u16());

            let bytes = response.bytes().await.map_err(ClientError::Transport)?;
            if !status.is_success() {
                debug!("Clerk {} API returned {} for {}", self.api, status, what);
                return Err(ClientError::Api {
                    api: self.api,
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Ok(bytes.to_vec())
        }
        .instrument(span)
        .await
    }
}
