//! # Clerk Provider
//!
//! The provider block schema and configuration of the shared [`ClerkClient`]
//! handed to every resource and data source.

use crate::client::ClerkClient;
use crate::config::{ProviderConfig, ProviderSettings};
use crate::datasources::{ApplicationDataSource, OrganizationDataSource};
use crate::resources::{
    attribute, known, sensitive, ApplicationResource, EnvironmentResource, OrganizationResource,
    SharedClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tf_provider::AttributePath;
use tf_provider::DynamicDataSource;
use tf_provider::DynamicResource;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, Diagnostics, Provider};
use tracing::info;

/// Values of the provider block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderState {
    pub platform_api_key: Value<String>,
    pub platform_api_url: Value<String>,
    pub backend_api_url: Value<String>,
}

#[derive(Debug, Clone)]
pub struct ClerkProvider {
    version: String,
    client: SharedClient,
}

impl Default for ClerkProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

impl ClerkProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            client: SharedClient::default(),
        }
    }

    /// Client slot shared by every resource and data source of this provider
    pub fn client(&self) -> SharedClient {
        self.client.clone()
    }
}

#[async_trait]
impl Provider for ClerkProvider {
    type Config<'a> = ProviderState;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let url = |description: &'static str| {
            attribute(AttributeType::String, AttributeConstraint::Optional, description)
        };
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "The Clerk provider enables managing Clerk authentication platform resources via Terraform.",
                ),
                attributes: map! {
                    "platform_api_key" => sensitive(attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "Clerk Platform API key. May also be set with the CLERK_PLATFORM_API_KEY environment variable.",
                    )),
                    "platform_api_url" => url(
                        "Platform API base URL. Defaults to https://api.clerk.com/v1; may also be set with CLERK_PLATFORM_API_URL.",
                    ),
                    "backend_api_url" => url(
                        "Backend API base URL used for every instance. Defaults to https://api.clerk.com/v1; may also be set with CLERK_BACKEND_API_URL.",
                    ),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::Config<'a>) -> Option<()> {
        Some(())
    }

    /// Build the shared client from the provider block
    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        if config.platform_api_key.is_unknown() {
            diags.error(
                "Unknown Clerk Platform API Key",
                "The provider cannot create the Clerk API client as there is an unknown configuration value for the Clerk Platform API key. Either target apply the source of the value first, set the value statically in the configuration, or use the CLERK_PLATFORM_API_KEY environment variable.",
                AttributePath::new("platform_api_key"),
            );
            return None;
        }

        let settings = ProviderSettings {
            platform_api_key: known(&config.platform_api_key),
            platform_api_url: known(&config.platform_api_url),
            backend_api_url: known(&config.backend_api_url),
        };
        let config = match ProviderConfig::resolve(settings) {
            Ok(config) => config,
            Err(e) => {
                diags.error(e.summary(), e.to_string(), AttributePath::new(e.attribute()));
                return None;
            }
        };

        let client = match ClerkClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                diags.root_error(
                    "Unable to Create Clerk API Client",
                    format!("An unexpected error occurred when creating the Clerk API client: {e}"),
                );
                return None;
            }
        };

        self.client.set(client, diags)?;
        info!(
            "Configured Clerk provider v{} for Terraform {}",
            self.version, terraform_version
        );
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "application" => ApplicationResource::new(self.client()),
            "environment" => EnvironmentResource::new(self.client()),
            "organization" => OrganizationResource::new(self.client()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "application" => ApplicationDataSource::new(self.client()),
            "organization" => OrganizationDataSource::new(self.client()),
        })
    }
}
