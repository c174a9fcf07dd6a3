//! # clerk_application
//!
//! A Clerk application with its development and production instances.
//!
//! Secret keys of the returned instances are registered with the backend
//! client registry on create and on every read, so `clerk_environment` and
//! `clerk_organization` can reach the instance's Backend API.
//!
//! The Platform API does not return the application name, so `name` is
//! always carried over from configuration or prior state.
//! `deletion_protection` never leaves the provider; while it is `true` a
//! destroy fails before any request is sent.

use crate::client::types::{Application, CreateApplicationRequest, UpdateApplicationRequest};
use crate::client::ClerkClient;
use crate::resources::composite_id::Environment;
use crate::resources::{
    attribute, known, replace_if_changed, sensitive, settle, text, unknown_if_null, SharedClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::AttributePath;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, Diagnostics, Resource};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub deletion_protection: Value<bool>,
    pub domain: Value<String>,
    pub environment_types: Value<Vec<String>>,
    pub template: Value<String>,
    pub dev_instance_id: Value<String>,
    pub dev_secret_key: Value<String>,
    pub dev_publishable_key: Value<String>,
    pub prod_instance_id: Value<String>,
    pub prod_secret_key: Value<String>,
    pub prod_publishable_key: Value<String>,
}

impl ApplicationState {
    /// Copy instance ids and keys from an API response
    ///
    /// A secret key is only overwritten when the response carries one.
    pub fn apply_instances(&mut self, application: &Application) {
        for environment in [Environment::Development, Environment::Production] {
            let Some(instance) = application.instance(environment.as_str()) else {
                continue;
            };
            let (instance_id, publishable_key, secret_key) = match environment {
                Environment::Development => (
                    &mut self.dev_instance_id,
                    &mut self.dev_publishable_key,
                    &mut self.dev_secret_key,
                ),
                Environment::Production => (
                    &mut self.prod_instance_id,
                    &mut self.prod_publishable_key,
                    &mut self.prod_secret_key,
                ),
            };
            *instance_id = Value::Value(instance.instance_id.clone());
            *publishable_key = Value::Value(instance.publishable_key.clone());
            if let Some(key) = instance.secret_key() {
                *secret_key = Value::Value(key.to_string());
            }
        }
    }

    /// Settle every value still unknown after an apply
    fn resolve_unknowns(&mut self, application: &Application) {
        if self.environment_types.is_unknown() {
            self.environment_types = Value::Value(
                application
                    .instances
                    .iter()
                    .map(|i| i.environment_type.clone())
                    .collect(),
            );
        }
        for value in [
            &mut self.domain,
            &mut self.template,
            &mut self.dev_instance_id,
            &mut self.dev_secret_key,
            &mut self.dev_publishable_key,
            &mut self.prod_instance_id,
            &mut self.prod_secret_key,
            &mut self.prod_publishable_key,
        ] {
            *value = settle(std::mem::take(value));
        }
    }
}

/// Register every returned secret key with the backend client registry
pub(crate) fn register_secret_keys(
    client: &ClerkClient,
    application: &Application,
    diags: &mut Diagnostics,
) {
    for instance in &application.instances {
        let Some(secret_key) = instance.secret_key() else {
            continue;
        };
        if let Err(e) = client.register_backend_client(
            &application.application_id,
            &instance.environment_type,
            secret_key,
        ) {
            warn!(
                "Failed to register backend client for {}/{}: {}",
                application.application_id, instance.environment_type, e
            );
            diags.root_warning(
                "Failed to register backend client",
                format!(
                    "Could not register the secret key of {}/{}: {e}",
                    application.application_id, instance.environment_type
                ),
            );
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationResource {
    client: SharedClient,
}

impl ApplicationResource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    type State<'a> = ApplicationState;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Manages a Clerk application and its development and production instances.",
                ),
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Application ID."),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Application name."),
                    "deletion_protection" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::OptionalComputed,
                        "Prevents the application from being destroyed while true. Defaults to true.",
                    ),
                    "domain" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "Production domain. Changing it forces a new application.",
                    ),
                    "environment_types" => attribute(
                        AttributeType::List(Box::new(AttributeType::String)),
                        AttributeConstraint::OptionalComputed,
                        "Environments to create, e.g. [\"development\", \"production\"]. Changing them forces a new application.",
                    ),
                    "template" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "Application template used at creation. Changing it forces a new application.",
                    ),
                    "dev_instance_id" => instance_attribute("Development instance ID."),
                    "dev_secret_key" => sensitive(instance_attribute("Development instance secret key.")),
                    "dev_publishable_key" => instance_attribute("Development instance publishable key."),
                    "prod_instance_id" => instance_attribute("Production instance ID."),
                    "prod_secret_key" => sensitive(instance_attribute("Production instance secret key.")),
                    "prod_publishable_key" => instance_attribute("Production instance publishable key."),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
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
        let id = text(&state.id).to_string();

        let application = match client.get_application(&id, true).await {
            Ok(application) => application,
            Err(e) if e.is_not_found() => {
                info!("Clerk application {} no longer exists, removing from state", id);
                return None;
            }
            Err(e) => {
                diags.root_error(
                    "Error reading Clerk application",
                    format!("Could not read application {id}: {e}"),
                );
                return None;
            }
        };

        // Imported applications start without a protection setting
        if state.deletion_protection.is_null() {
            state.deletion_protection = Value::Value(true);
        }
        state.apply_instances(&application);
        state.resolve_unknowns(&application);
        register_secret_keys(&client, &application, diags);

        Some((state, private_state))
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
        if planned.deletion_protection.is_null() {
            planned.deletion_protection = Value::Value(true);
        }
        planned.domain = unknown_if_null(planned.domain);
        planned.environment_types = unknown_if_null(planned.environment_types);
        for value in [
            &mut planned.dev_instance_id,
            &mut planned.dev_secret_key,
            &mut planned.dev_publishable_key,
            &mut planned.prod_instance_id,
            &mut planned.prod_secret_key,
            &mut planned.prod_publishable_key,
        ] {
            *value = Value::Unknown;
        }
        Some((planned, ValueEmpty::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        // Instance ids and keys keep their prior value; only the name changes in place
        let mut replace = Vec::new();
        replace_if_changed("domain", &proposed_state.domain, &prior_state.domain, &mut replace);
        replace_if_changed(
            "environment_types",
            &proposed_state.environment_types,
            &prior_state.environment_types,
            &mut replace,
        );
        replace_if_changed("template", &proposed_state.template, &prior_state.template, &mut replace);
        Some((proposed_state, prior_private_state, replace))
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
        let mut state = planned_state;

        let request = CreateApplicationRequest {
            name: text(&state.name).to_string(),
            domain: known(&state.domain),
            proxy_path: None,
            environment_types: known(&state.environment_types).unwrap_or_default(),
            template: known(&state.template),
        };

        let application = match client.create_application(&request).await {
            Ok(application) => application,
            Err(e) => {
                diags.root_error(
                    "Error creating Clerk application",
                    format!("Could not create application: {e}"),
                );
                return None;
            }
        };

        state.id = Value::Value(application.application_id.clone());
        if !matches!(state.deletion_protection, Value::Value(_)) {
            state.deletion_protection = Value::Value(true);
        }
        state.apply_instances(&application);
        state.resolve_unknowns(&application);
        register_secret_keys(&client, &application, diags);

        Some((state, planned_private_state))
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
        let id = text(&prior_state.id).to_string();
        let mut state = planned_state;

        if state.name != prior_state.name {
            let request = UpdateApplicationRequest {
                name: known(&state.name),
            };
            if let Err(e) = client.update_application(&id, &request).await {
                diags.root_error(
                    "Error updating Clerk application",
                    format!("Could not update application {id}: {e}"),
                );
                return None;
            }
        }

        let application = match client.get_application(&id, true).await {
            Ok(application) => application,
            Err(e) => {
                diags.root_error(
                    "Error reading Clerk application after update",
                    format!("Could not read application {id}: {e}"),
                );
                return None;
            }
        };

        state.id = Value::Value(id);
        if !matches!(state.deletion_protection, Value::Value(_)) {
            state.deletion_protection =
                Value::Value(known(&prior_state.deletion_protection).unwrap_or(true));
        }
        state.apply_instances(&application);
        state.resolve_unknowns(&application);
        register_secret_keys(&client, &application, diags);

        Some((state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        if known(&prior_state.deletion_protection).unwrap_or(false) {
            diags.root_error(
                "Cannot destroy application with deletion protection enabled",
                format!(
                    "Application {:?} ({}) has deletion_protection = true. Set deletion_protection = false and apply before destroying.",
                    text(&prior_state.name),
                    text(&prior_state.id)
                ),
            );
            return None;
        }

        let client = self.client.get(diags)?;
        let id = text(&prior_state.id);
        if let Err(e) = client.delete_application(id).await {
            diags.root_error(
                "Error deleting Clerk application",
                format!("Could not delete application {id}: {e}"),
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
        if id.is_empty() {
            diags.root_error("Invalid Import ID", "Expected an application ID, got an empty string");
            return None;
        }
        let state = ApplicationState {
            id: Value::Value(id),
            ..ApplicationState::default()
        };
        Some((state, ValueEmpty::default()))
    }
}

/// Computed per-instance value that never changes once known
fn instance_attribute(description: &str) -> Attribute {
    attribute(AttributeType::String, AttributeConstraint::Computed, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::ApplicationInstance;

    fn application() -> Application {
        Application {
            application_id: "app_1".to_string(),
            instances: vec![
                ApplicationInstance {
                    instance_id: "ins_dev".to_string(),
                    environment_type: "development".to_string(),
                    publishable_key: "pk_test_1".to_string(),
                    secret_key: Some("sk_test_1".to_string()),
                },
                ApplicationInstance {
                    instance_id: "ins_prod".to_string(),
                    environment_type: "production".to_string(),
                    publishable_key: "pk_live_1".to_string(),
                    secret_key: None,
                },
            ],
        }
    }

    fn string(value: &str) -> Value<String> {
        Value::Value(value.to_string())
    }

    #[test]
    fn test_apply_instances_maps_by_environment_type() {
        let mut state = ApplicationState {
            prod_secret_key: string("sk_live_kept"),
            ..ApplicationState::default()
        };
        state.apply_instances(&application());

        assert_eq!(state.dev_instance_id, string("ins_dev"));
        assert_eq!(state.dev_secret_key, string("sk_test_1"));
        assert_eq!(state.prod_publishable_key, string("pk_live_1"));
        assert_eq!(state.prod_secret_key, string("sk_live_kept"));
    }

    #[test]
    fn test_resolve_unknowns_fills_environment_types() {
        let mut state = ApplicationState {
            environment_types: Value::Unknown,
            domain: Value::Unknown,
            dev_instance_id: Value::Unknown,
            ..ApplicationState::default()
        };
        state.resolve_unknowns(&Application {
            application_id: "app_1".to_string(),
            instances: vec![],
        });
        assert_eq!(state.environment_types, Value::Value(vec![]));
        assert!(state.domain.is_null());
        assert!(state.dev_instance_id.is_null());
    }

    #[test]
    fn test_schema_marks_secret_keys_sensitive() {
        let mut diags = Diagnostics::default();
        let schema = ApplicationResource::default().schema(&mut diags).unwrap();
        let attributes = &schema.block.attributes;
        assert!(attributes["dev_secret_key"].sensitive);
        assert!(attributes["prod_secret_key"].sensitive);
        assert!(!attributes["dev_publishable_key"].sensitive);
        assert_eq!(attributes.len(), 12);
    }

    #[tokio::test]
    async fn test_plan_create_defaults_protection_and_marks_computed_unknown() {
        let resource = ApplicationResource::default();
        let mut diags = Diagnostics::default();
        let config = ApplicationState {
            name: string("acme"),
            ..ApplicationState::default()
        };
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, ValueEmpty::default())
            .await
            .unwrap();

        assert_eq!(planned.deletion_protection, Value::Value(true));
        assert!(planned.id.is_unknown());
        assert!(planned.dev_secret_key.is_unknown());
        assert!(planned.environment_types.is_unknown());
        assert!(planned.template.is_null());
    }

    #[tokio::test]
    async fn test_template_change_requires_replace() {
        let resource = ApplicationResource::default();
        let mut diags = Diagnostics::default();
        let prior = ApplicationState {
            id: string("app_1"),
            name: string("acme"),
            deletion_protection: Value::Value(true),
            ..ApplicationState::default()
        };
        let proposed = ApplicationState {
            template: string("b2b-saas"),
            ..prior.clone()
        };
        let renamed = ApplicationState {
            name: string("acme-2"),
            ..prior.clone()
        };

        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);

        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                prior,
                renamed.clone(),
                renamed,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        assert_eq!(planned.id, string("app_1"));
    }

    #[tokio::test]
    async fn test_destroy_with_protection_fails_without_client() {
        let resource = ApplicationResource::default();
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(
                &mut diags,
                ApplicationState {
                    id: string("app_1"),
                    name: string("acme"),
                    deletion_protection: Value::Value(true),
                    ..ApplicationState::default()
                },
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await;

        assert!(result.is_none());
        let error = &diags.errors[0];
        assert_eq!(
            error.summary,
            "Cannot destroy application with deletion protection enabled"
        );
        assert_eq!(
            error.detail,
            "Application \"acme\" (app_1) has deletion_protection = true. Set deletion_protection = false and apply before destroying."
        );
    }

    #[tokio::test]
    async fn test_import_passes_id_through() {
        let resource = ApplicationResource::default();
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .import(&mut diags, "app_1".to_string())
            .await
            .unwrap();
        assert_eq!(state.id, string("app_1"));
        assert!(state.name.is_null());
        assert!(diags.errors.is_empty());
    }
}
