//! # Provider Configuration
//!
//! Resolves the provider block against environment variables.
//!
//! Each setting comes from its provider attribute when set, otherwise from
//! its environment variable, otherwise from the default. Only the Platform
//! API key has no default.

use crate::constants::{
    BACKEND_API_URL_ENV, DEFAULT_PLATFORM_API_URL, PLATFORM_API_KEY_ENV, PLATFORM_API_URL_ENV,
};
use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "The provider cannot create the Clerk API client as there is a missing or empty value for the Clerk Platform API key. Set the platform_api_key value in the configuration or use the CLERK_PLATFORM_API_KEY environment variable."
    )]
    MissingPlatformApiKey,
}

impl ConfigError {
    /// Diagnostic summary
    pub fn summary(&self) -> &'static str {
        match self {
            ConfigError::MissingPlatformApiKey => "Missing Platform API Key",
        }
    }

    /// Attribute the error points at
    pub fn attribute(&self) -> &'static str {
        match self {
            ConfigError::MissingPlatformApiKey => "platform_api_key",
        }
    }
}

/// Values set in the provider block
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub platform_api_key: Option<String>,
    pub platform_api_url: Option<String>,
    pub backend_api_url: Option<String>,
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub platform_api_key: SecretString,
    pub platform_api_url: String,
    /// Backend API override stored with every registry entry
    pub backend_api_url: Option<String>,
}

impl ProviderConfig {
    /// Configuration with default endpoints
    pub fn new(platform_api_key: impl Into<String>) -> Self {
        Self {
            platform_api_key: SecretString::from(platform_api_key.into()),
            platform_api_url: DEFAULT_PLATFORM_API_URL.to_string(),
            backend_api_url: None,
        }
    }

    #[must_use]
    pub fn with_platform_api_url(mut self, url: impl Into<String>) -> Self {
        self.platform_api_url = url.into();
        self
    }

    #[must_use]
    pub fn with_backend_api_url(mut self, url: impl Into<String>) -> Self {
        self.backend_api_url = Some(url.into());
        self
    }

    /// Resolve provider block values against the environment
    pub fn resolve(settings: ProviderSettings) -> Result<Self, ConfigError> {
        let platform_api_key = setting_or_env(settings.platform_api_key, PLATFORM_API_KEY_ENV)
            .ok_or(ConfigError::MissingPlatformApiKey)?;
        let platform_api_url = setting_or_env(settings.platform_api_url, PLATFORM_API_URL_ENV)
            .unwrap_or_else(|| DEFAULT_PLATFORM_API_URL.to_string());
        let backend_api_url = setting_or_env(settings.backend_api_url, BACKEND_API_URL_ENV);

        Ok(Self {
            platform_api_key: SecretString::from(platform_api_key),
            platform_api_url,
            backend_api_url,
        })
    }
}

/// Non-empty setting, else non-empty environment variable
fn setting_or_env(setting: Option<String>, key: &str) -> Option<String> {
    setting
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(key).ok().filter(|v| !v.is_empty()))
}
