//! # Backend Client Registry
//!
//! Maps `(application id, environment)` to the secret key and endpoint used to
//! reach that instance's Backend API.
//!
//! Entries are added when an application's secret keys become known (create,
//! read, or the application data source) and live for the rest of the process.
//! Resource operations run concurrently, so the map sits behind a
//! reader/writer lock: lookups share it, registrations take it exclusively.

use crate::client::error::ClientError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// Connection settings for one instance's Backend API
#[derive(Debug, Clone)]
pub struct BackendConfig {
    secret_key: SecretString,
    base_url: Option<String>,
}

impl BackendConfig {
    pub fn new(secret_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            secret_key: SecretString::from(secret_key.into()),
            base_url,
        }
    }

    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Endpoint override; `None` means the default Backend API URL
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

impl PartialEq for BackendConfig {
    fn eq(&self, other: &Self) -> bool {
        self.secret_key.expose_secret() == other.secret_key.expose_secret()
            && self.base_url == other.base_url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BackendKey {
    app_id: String,
    environment: String,
}

impl BackendKey {
    fn new(app_id: &str, environment: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            environment: environment.to_string(),
        }
    }
}

impl fmt::Display for BackendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.environment)
    }
}

#[derive(Debug, Default)]
pub struct BackendRegistry {
    entries: RwLock<HashMap<BackendKey, BackendConfig>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the configuration for an instance, replacing any earlier entry
    pub fn register(
        &self,
        app_id: &str,
        environment: &str,
        config: BackendConfig,
    ) -> Result<(), ClientError> {
        let key = BackendKey::new(app_id, environment);
        let mut entries = self
            .entries
            .write()
            .map_err(|_poisoned| ClientError::RegistryPoisoned)?;
        debug!(backend.key = %key, "Registering backend client");
        entries.insert(key, config);
        Ok(())
    }

    /// Configuration for an instance
    ///
    /// A missing entry is an error; nothing is fetched on demand.
    pub fn lookup(&self, app_id: &str, environment: &str) -> Result<BackendConfig, ClientError> {
        let entries = self
            .entries
            .read()
            .map_err(|_poisoned| ClientError::RegistryPoisoned)?;
        entries
            .get(&BackendKey::new(app_id, environment))
            .cloned()
            .ok_or_else(|| ClientError::NotRegistered {
                app_id: app_id.to_string(),
                environment: environment.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
