//! # Clerk API Client
//!
//! Shared client handed to every resource and data source once the provider
//! is configured.
//!
//! - Platform API calls (applications) authenticate with the workspace key.
//! - Backend API calls (instance settings, organizations) authenticate with
//!   the per-instance secret key looked up in the [`BackendRegistry`].

mod backend;
pub mod error;
mod organization;
mod platform;
pub mod registry;
mod transport;
pub mod types;

pub use error::{ApiFamily, ClientError};
pub use registry::{BackendConfig, BackendRegistry};

use crate::config::ProviderConfig;
use crate::constants::{DEFAULT_BACKEND_API_URL, USER_AGENT};
use reqwest::Client;
use tracing::info;
use transport::Transport;

pub struct ClerkClient {
    http: Client,
    platform: Transport,
    backend_api_url: Option<String>,
    registry: BackendRegistry,
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkClient")
            .field("platform", &self.platform)
            .field("backend_api_url", &self.backend_api_url)
            .field("registered_backends", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl ClerkClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::Build)?;

        info!("Clerk Platform API endpoint: {}", config.platform_api_url);
        if let Some(url) = &config.backend_api_url {
            info!("Clerk Backend API endpoint override: {}", url);
        }

        let platform = Transport::new(
            http.clone(),
            &config.platform_api_url,
            config.platform_api_key,
            ApiFamily::Platform,
        );

        Ok(Self {
            http,
            platform,
            backend_api_url: config.backend_api_url,
            registry: BackendRegistry::new(),
        })
    }

    /// Register the secret key for an instance with the provider's endpoint override
    pub fn register_backend_client(
        &self,
        app_id: &str,
        environment: &str,
        secret_key: &str,
    ) -> Result<(), ClientError> {
        self.registry.register(
            app_id,
            environment,
            BackendConfig::new(secret_key, self.backend_api_url.clone()),
        )
    }

    /// Backend API transport for a registered instance
    fn backend(&self, app_id: &str, environment: &str) -> Result<Transport, ClientError> {
        let config = self.registry.lookup(app_id, environment)?;
        let base_url = config.base_url().unwrap_or(DEFAULT_BACKEND_API_URL);
        Ok(Transport::new(
            self.http.clone(),
            base_url,
            config.secret_key().clone(),
            ApiFamily::Backend,
        ))
    }
}
