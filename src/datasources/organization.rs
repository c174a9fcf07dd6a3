//! # clerk_organization data source
//!
//! Looks up an organization by id or by slug; exactly one must be given.

use crate::client::types::Organization;
use crate::resources::composite_id::Environment;
use crate::resources::{attribute, text, validate_environment, SharedClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::AttributePath;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, DataSource, Diagnostics};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDataState {
    pub application_id: Value<String>,
    pub environment: Value<String>,
    pub id: Value<String>,
    pub slug: Value<String>,
    pub name: Value<String>,
    pub max_allowed_memberships: Value<i64>,
    pub admin_delete_enabled: Value<bool>,
    pub created_at: Value<i64>,
}

impl OrganizationDataState {
    /// The id or slug to look up
    fn lookup_key(&self) -> Option<&str> {
        self.id.as_deref_option().or(self.slug.as_deref_option())
    }

    fn apply(&mut self, organization: Organization) {
        self.id = Value::Value(organization.id);
        self.slug = Value::Value(organization.slug);
        self.name = Value::Value(organization.name);
        self.max_allowed_memberships = Value::Value(organization.max_allowed_memberships);
        self.admin_delete_enabled = Value::Value(organization.admin_delete_enabled);
        self.created_at = Value::Value(organization.created_at);
    }
}

/// Exactly one of `id` and `slug`; unknown values count as set
fn validate_lookup_keys(config: &OrganizationDataState, diags: &mut Diagnostics) {
    let set = [&config.id, &config.slug]
        .iter()
        .filter(|value| !value.is_null())
        .count();
    if set != 1 {
        for name in ["id", "slug"] {
            diags.error(
                "Invalid Attribute Combination",
                "Exactly one of these attributes must be configured: [id, slug]",
                AttributePath::new(name),
            );
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationDataSource {
    client: SharedClient,
}

impl OrganizationDataSource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for OrganizationDataSource {
    type State<'a> = OrganizationDataState;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Reads an organization in a Clerk application instance by ID or slug.",
                ),
                attributes: map! {
                    "application_id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Application the organization belongs to.",
                    ),
                    "environment" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Instance environment: development or production.",
                    ),
                    "id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "Organization ID. Exactly one of id or slug must be set.",
                    ),
                    "slug" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "Organization slug. Exactly one of id or slug must be set.",
                    ),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Organization name."),
                    "max_allowed_memberships" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Computed,
                        "Membership limit. 0 means unlimited.",
                    ),
                    "admin_delete_enabled" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::Computed,
                        "Whether admins may delete the organization.",
                    ),
                    "created_at" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Computed,
                        "Creation time in Unix milliseconds.",
                    ),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_environment(&config.environment, diags);
        validate_lookup_keys(&config, diags);
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        mut config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;

        let environment = match text(&config.environment).parse::<Environment>() {
            Ok(environment) => environment,
            Err(e) => {
                diags.error(e.summary(), e.to_string(), AttributePath::new("environment"));
                return None;
            }
        };
        let Some(key) = config.lookup_key().map(str::to_string) else {
            diags.root_error(
                "Missing organization lookup key",
                "Exactly one of id or slug must be configured.",
            );
            return None;
        };
        let app_id = text(&config.application_id).to_string();

        match client
            .get_organization(&app_id, environment.as_str(), &key)
            .await
        {
            Ok(organization) => {
                config.apply(organization);
                Some(config)
            }
            Err(e) => {
                diags.root_error(
                    "Error reading Clerk organization",
                    format!("Could not read organization {key} in {app_id}/{environment}: {e}"),
                );
                None
            }
        }
    }
}
