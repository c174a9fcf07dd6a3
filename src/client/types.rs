//! # API Types
//!
//! Request and response bodies for the Clerk Platform and Backend APIs.
//!
//! Optional request fields are omitted when unset so a PATCH only touches
//! what the caller asked for.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Platform API
// ---------------------------------------------------------------------------

/// One environment instance of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInstance {
    pub instance_id: String,
    /// `development` or `production`
    pub environment_type: String,
    #[serde(default)]
    pub publishable_key: String,
    /// Only present on create and on reads with `include_secret_keys=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl ApplicationInstance {
    /// The secret key, if the API returned a non-empty one
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: String,
    #[serde(default)]
    pub instances: Vec<ApplicationInstance>,
}

impl Application {
    pub fn instance(&self, environment_type: &str) -> Option<&ApplicationInstance> {
        self.instances
            .iter()
            .find(|i| i.environment_type == environment_type)
    }
}

/// Body of `POST /platform/applications`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateApplicationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Body of `PATCH /platform/applications/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateApplicationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of a DELETE on either API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeletedObject {
    pub deleted: bool,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub id: String,
}

// ---------------------------------------------------------------------------
// Backend API: instance settings
// ---------------------------------------------------------------------------

/// Body of `PATCH /instance`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceSettingsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hibp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_email_deliverability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clerk_js_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_based_session_syncing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_origin: Option<String>,
}

impl InstanceSettingsParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `PATCH /instance/restrictions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestrictionsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_email_subaddresses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_disposable_email_domains: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_dots_for_gmail_addresses: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceRestrictions {
    pub allowlist: bool,
    pub blocklist: bool,
    pub block_email_subaddresses: bool,
    pub block_disposable_email_domains: bool,
    pub ignore_dots_for_gmail_addresses: bool,
}

/// Body of `PATCH /instance/organization_settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationSettingsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_memberships: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_delete_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains_enrollment_modes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains_default_role_id: Option<String>,
}

/// Organization feature settings as returned by the API
///
/// Roles come back as role keys (`creator_role`, `domains_default_role`),
/// not the ids they were set with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrganizationSettings {
    pub enabled: bool,
    pub max_allowed_memberships: i64,
    pub max_allowed_roles: i64,
    pub max_allowed_permissions: i64,
    pub creator_role: Option<String>,
    pub admin_delete_enabled: bool,
    pub domains_enabled: bool,
    pub domains_enrollment_modes: Vec<String>,
    pub domains_default_role: Option<String>,
}

// ---------------------------------------------------------------------------
// Backend API: organizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub max_allowed_memberships: i64,
    pub admin_delete_enabled: bool,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

/// Body of `POST /organizations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateOrganizationParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_memberships: Option<i64>,
}

/// Body of `PATCH /organizations/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOrganizationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_memberships: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_delete_enabled: Option<bool>,
}
