//! # clerk_application data source
//!
//! Looks up an existing application by id. Its secret keys are registered
//! with the backend client registry, the same as for the managed resource.

use crate::resources::application::{register_secret_keys, ApplicationState};
use crate::resources::{attribute, sensitive, settle, text, SharedClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, DataSource, Diagnostics};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDataState {
    pub id: Value<String>,
    pub dev_instance_id: Value<String>,
    pub dev_secret_key: Value<String>,
    pub dev_publishable_key: Value<String>,
    pub prod_instance_id: Value<String>,
    pub prod_secret_key: Value<String>,
    pub prod_publishable_key: Value<String>,
}

impl From<ApplicationState> for ApplicationDataState {
    fn from(state: ApplicationState) -> Self {
        Self {
            id: state.id,
            dev_instance_id: settle(state.dev_instance_id),
            dev_secret_key: settle(state.dev_secret_key),
            dev_publishable_key: settle(state.dev_publishable_key),
            prod_instance_id: settle(state.prod_instance_id),
            prod_secret_key: settle(state.prod_secret_key),
            prod_publishable_key: settle(state.prod_publishable_key),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationDataSource {
    client: SharedClient,
}

impl ApplicationDataSource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ApplicationDataSource {
    type State<'a> = ApplicationDataState;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let computed = |description: &'static str| {
            attribute(AttributeType::String, AttributeConstraint::Computed, description)
        };
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Reads an existing Clerk application and its instance keys.",
                ),
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Application ID."),
                    "dev_instance_id" => computed("Development instance ID."),
                    "dev_secret_key" => sensitive(computed("Development instance secret key.")),
                    "dev_publishable_key" => computed("Development instance publishable key."),
                    "prod_instance_id" => computed("Production instance ID."),
                    "prod_secret_key" => sensitive(computed("Production instance secret key.")),
                    "prod_publishable_key" => computed("Production instance publishable key."),
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
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let id = text(&config.id);

        let application = match client.get_application(id, true).await {
            Ok(application) => application,
            Err(e) => {
                diags.root_error(
                    "Error reading Clerk application",
                    format!("Could not read application {id}: {e}"),
                );
                return None;
            }
        };

        let mut state = ApplicationState {
            id: Value::Value(application.application_id.clone()),
            ..ApplicationState::default()
        };
        state.apply_instances(&application);
        register_secret_keys(&client, &application, diags);

        Some(state.into())
    }
}
