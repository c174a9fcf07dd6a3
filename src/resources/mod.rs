//! # Resources
//!
//! `clerk_application`, `clerk_environment` and `clerk_organization`, served
//! through the `tf_provider` resource interface.
//!
//! Every resource and data source holds a [`SharedClient`]. The provider
//! hands out resources before it is configured, so the client is resolved
//! when an operation runs.

pub mod application;
pub mod composite_id;
pub mod environment;
pub mod organization;

pub use application::ApplicationResource;
pub use composite_id::{CompositeIdError, Environment, EnvironmentId, OrganizationId};
pub use environment::EnvironmentResource;
pub use organization::OrganizationResource;

use crate::client::ClerkClient;
use std::sync::{Arc, RwLock};
use tf_provider::AttributePath;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description};
use tf_provider::value::{Value};
use tf_provider::{Diagnostics};
use tracing::warn;

/// Client slot filled once the provider block is configured
#[derive(Debug, Clone, Default)]
pub struct SharedClient(Arc<RwLock<Option<Arc<ClerkClient>>>>);

impl SharedClient {
    /// Store the configured client, replacing any earlier one
    pub fn set(&self, client: ClerkClient, diags: &mut Diagnostics) -> Option<()> {
        if let Ok(mut slot) = self.0.write() {
            *slot = Some(Arc::new(client));
            Some(())
        } else {
            warn!("Clerk client slot lock poisoned");
            diags.root_error(
                "Unable to Store Clerk API Client",
                "The client lock was poisoned by an earlier failure. Please report this issue to the provider developers.",
            );
            None
        }
    }

    /// The configured client, or an error diagnostic when there is none
    pub fn get(&self, diags: &mut Diagnostics) -> Option<Arc<ClerkClient>> {
        let client = self
            .0
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().map(Arc::clone));
        if client.is_none() {
            diags.root_error(
                "Unconfigured Clerk Client",
                "The provider has not been configured. Configure the provider before managing resources.",
            );
        }
        client
    }
}

/// Schema attribute with a plain-text description
pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub(crate) fn sensitive(mut attribute: Attribute) -> Attribute {
    attribute.sensitive = true;
    attribute
}

/// Known value, cloned
pub(crate) fn known<T: Clone>(value: &Value<T>) -> Option<T> {
    value.as_ref_option().cloned()
}

/// Known string, or empty
pub(crate) fn text(value: &Value<String>) -> &str {
    value.as_deref_option().unwrap_or_default()
}

/// Computed attributes absent from the configuration get planned as unknown
pub(crate) fn unknown_if_null<T>(value: Value<T>) -> Value<T> {
    match value {
        Value::Null => Value::Unknown,
        other => other,
    }
}

/// Values still unknown once an operation completes settle to null
pub(crate) fn settle<T>(value: Value<T>) -> Value<T> {
    match value {
        Value::Unknown => Value::Null,
        other => other,
    }
}

/// Keep a known planned value, fill anything else from the API
pub(crate) fn planned_or<T>(planned: Value<T>, applied: T) -> Value<T> {
    match planned {
        Value::Value(value) => Value::Value(value),
        Value::Null | Value::Unknown => Value::Value(applied),
    }
}

/// Record `name` as forcing a replacement when its known planned value differs
pub(crate) fn replace_if_changed<T: PartialEq>(
    name: &str,
    planned: &Value<T>,
    prior: &Value<T>,
    paths: &mut Vec<AttributePath>,
) {
    if !planned.is_unknown() && planned != prior {
        paths.push(AttributePath::new(name.to_owned()));
    }
}

/// Reject an `environment` other than development or production
pub(crate) fn validate_environment(value: &Value<String>, diags: &mut Diagnostics) {
    if let Some(environment) = value.as_deref_option() {
        if let Err(e) = environment.parse::<Environment>() {
            diags.error(e.summary(), e.to_string(), AttributePath::new("environment"));
        }
    }
}
