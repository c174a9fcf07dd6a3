//! # clerk_organization
//!
//! An organization inside one application instance, managed through that
//! instance's Backend API.

use crate::client::types::{CreateOrganizationParams, Organization, UpdateOrganizationParams};
use crate::resources::composite_id::{Environment, OrganizationId};
use crate::resources::{
    attribute, known, planned_or, replace_if_changed, text, unknown_if_null, validate_environment,
    SharedClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::AttributePath;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, Diagnostics, Resource};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationState {
    pub id: Value<String>,
    pub application_id: Value<String>,
    pub environment: Value<String>,
    pub name: Value<String>,
    pub slug: Value<String>,
    pub max_allowed_memberships: Value<i64>,
    pub admin_delete_enabled: Value<bool>,
    pub created_at: Value<i64>,
    pub updated_at: Value<i64>,
}

impl OrganizationState {
    /// Refresh every attribute from the API
    fn apply(&mut self, organization: Organization) {
        self.id = Value::Value(organization.id);
        self.name = Value::Value(organization.name);
        self.slug = Value::Value(organization.slug);
        self.max_allowed_memberships = Value::Value(organization.max_allowed_memberships);
        self.admin_delete_enabled = Value::Value(organization.admin_delete_enabled);
        self.created_at = Value::Value(organization.created_at);
        self.updated_at = Value::Value(organization.updated_at);
    }

    /// Keep planned values, fill the unknown ones from the API
    fn merge(self, organization: Organization) -> Self {
        Self {
            id: planned_or(self.id, organization.id),
            application_id: self.application_id,
            environment: self.environment,
            name: planned_or(self.name, organization.name),
            slug: planned_or(self.slug, organization.slug),
            max_allowed_memberships: planned_or(
                self.max_allowed_memberships,
                organization.max_allowed_memberships,
            ),
            admin_delete_enabled: planned_or(
                self.admin_delete_enabled,
                organization.admin_delete_enabled,
            ),
            created_at: planned_or(self.created_at, organization.created_at),
            updated_at: planned_or(self.updated_at, organization.updated_at),
        }
    }

    /// Backend registry key of the owning instance
    fn instance(&self, diags: &mut Diagnostics) -> Option<(String, Environment)> {
        match text(&self.environment).parse::<Environment>() {
            Ok(environment) => Some((text(&self.application_id).to_string(), environment)),
            Err(e) => {
                diags.error(e.summary(), e.to_string(), AttributePath::new("environment"));
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationResource {
    client: SharedClient,
}

impl OrganizationResource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for OrganizationResource {
    type State<'a> = OrganizationState;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Manages an organization in a Clerk application instance.",
                ),
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Organization ID."),
                    "application_id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Application the organization belongs to. Changing it forces a new organization.",
                    ),
                    "environment" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Instance environment: development or production. Changing it forces a new organization.",
                    ),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization name."),
                    "slug" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "URL-friendly identifier. Generated from the name when omitted.",
                    ),
                    "max_allowed_memberships" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::OptionalComputed,
                        "Membership limit. 0 means unlimited.",
                    ),
                    "admin_delete_enabled" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::OptionalComputed,
                        "Whether admins may delete the organization.",
                    ),
                    "created_at" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Computed,
                        "Creation time in Unix milliseconds.",
                    ),
                    "updated_at" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Computed,
                        "Last update time in Unix milliseconds.",
                    ),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_environment(&config.environment, diags);
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        mut state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let (app_id, environment) = state.instance(diags)?;
        let id = text(&state.id).to_string();

        match client
            .get_organization(&app_id, environment.as_str(), &id)
            .await
        {
            Ok(organization) => {
                state.apply(organization);
                Some((state, private_state))
            }
            Err(e) if e.is_not_found() => {
                info!("Clerk organization {} no longer exists, removing from state", id);
                None
            }
            Err(e) => {
                diags.root_error(
                    "Error reading Clerk organization",
                    format!("Could not read organization {id}: {e}"),
                );
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut planned = proposed_state;
        planned.id = Value::Unknown;
        planned.slug = unknown_if_null(planned.slug);
        planned.max_allowed_memberships = unknown_if_null(planned.max_allowed_memberships);
        planned.admin_delete_enabled = unknown_if_null(planned.admin_delete_enabled);
        planned.created_at = Value::Unknown;
        planned.updated_at = Value::Unknown;
        Some((planned, ValueEmpty::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut replace = Vec::new();
        replace_if_changed(
            "application_id",
            &proposed_state.application_id,
            &prior_state.application_id,
            &mut replace,
        );
        replace_if_changed(
            "environment",
            &proposed_state.environment,
            &prior_state.environment,
            &mut replace,
        );

        let mut planned = proposed_state;
        if planned != prior_state {
            // id, slug, membership limit and creation time keep their prior value
            if config_state.admin_delete_enabled.is_null() {
                planned.admin_delete_enabled = Value::Unknown;
            }
            planned.updated_at = Value::Unknown;
        }
        Some((planned, prior_private_state, replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let (app_id, environment) = planned_state.instance(diags)?;
        let environment = environment.as_str();

        let params = CreateOrganizationParams {
            name: text(&planned_state.name).to_string(),
            slug: known(&planned_state.slug),
            max_allowed_memberships: known(&planned_state.max_allowed_memberships),
        };
        let mut organization = match client
            .create_organization(&app_id, environment, &params)
            .await
        {
            Ok(organization) => organization,
            Err(e) => {
                diags.root_error(
                    "Error creating Clerk organization",
                    format!("Could not create organization in {app_id}/{environment}: {e}"),
                );
                return None;
            }
        };

        // Creation takes no admin_delete_enabled, so a configured value is
        // applied with a follow-up update
        if let Some(wanted) = known(&planned_state.admin_delete_enabled) {
            if wanted != organization.admin_delete_enabled {
                let params = UpdateOrganizationParams {
                    admin_delete_enabled: Some(wanted),
                    ..UpdateOrganizationParams::default()
                };
                let id = organization.id.clone();
                match client
                    .update_organization(&app_id, environment, &id, &params)
                    .await
                {
                    Ok(updated) => organization = updated,
                    Err(e) => {
                        diags.root_error(
                            "Error updating Clerk organization",
                            format!(
                                "Organization {id} was created but admin_delete_enabled could not be set: {e}"
                            ),
                        );
                        let mut state = planned_state;
                        state.apply(organization);
                        return Some((state, planned_private_state));
                    }
                }
            }
        }

        Some((planned_state.merge(organization), planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let (app_id, environment) = planned_state.instance(diags)?;
        let id = text(&prior_state.id).to_string();

        let params = UpdateOrganizationParams {
            name: known(&planned_state.name),
            slug: known(&planned_state.slug),
            max_allowed_memberships: known(&planned_state.max_allowed_memberships),
            admin_delete_enabled: known(&planned_state.admin_delete_enabled),
        };
        match client
            .update_organization(&app_id, environment.as_str(), &id, &params)
            .await
        {
            Ok(organization) => Some((planned_state.merge(organization), planned_private_state)),
            Err(e) => {
                diags.root_error(
                    "Error updating Clerk organization",
                    format!("Could not update organization {id}: {e}"),
                );
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let (app_id, environment) = prior_state.instance(diags)?;
        let id = text(&prior_state.id);
        if let Err(e) = client
            .delete_organization(&app_id, environment.as_str(), id)
            .await
        {
            diags.root_error(
                "Error deleting Clerk organization",
                format!("Could not delete organization {id}: {e}"),
            );
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        match id.parse::<OrganizationId>() {
            Ok(target) => {
                let state = OrganizationState {
                    id: Value::Value(target.organization_id),
                    application_id: Value::Value(target.application_id),
                    environment: Value::Value(target.environment.to_string()),
                    ..OrganizationState::default()
                };
                Some((state, ValueEmpty::default()))
            }
            Err(e) => {
                diags.root_error(e.summary(), e.to_string());
                None
            }
        }
    }
}
