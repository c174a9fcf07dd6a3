//! # clerk_environment
//!
//! Configures one instance (`development` or `production`) of an existing
//! application. The instance itself is never created or destroyed here.
//!
//! Create and update send only known, non-null settings. Each of the three
//! settings groups is its own PATCH, skipped when there is nothing to send.
//! Configured values are kept as planned; values left unknown in the plan are
//! filled from the API response. The Backend API offers no read of these
//! settings, so read passes state through unchanged. Destroy resets the
//! instance to Clerk's defaults, and a failed reset is only a warning.

use crate::client::types::{
    InstanceRestrictions, InstanceSettingsParams, OrganizationSettings, OrganizationSettingsParams,
    RestrictionsParams,
};
use crate::client::ClerkClient;
use crate::constants::{
    RESET_CLERK_JS_VERSION, RESET_DEVELOPMENT_ORIGIN, RESET_ENHANCED_EMAIL_DELIVERABILITY,
    RESET_HIBP, RESET_ORGANIZATIONS_ENABLED, RESET_ORGANIZATION_ADMIN_DELETE_ENABLED,
    RESET_ORGANIZATION_DOMAINS_ENABLED, RESET_RESTRICTION, RESET_SUPPORT_EMAIL, RESET_TEST_MODE,
    RESET_URL_BASED_SESSION_SYNCING,
};
use crate::resources::composite_id::{Environment, EnvironmentId};
use crate::resources::{
    attribute, known, planned_or, replace_if_changed, settle, text, unknown_if_null,
    validate_environment, SharedClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::AttributePath;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, Diagnostics, Resource};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub id: Value<String>,
    pub application_id: Value<String>,
    pub environment: Value<String>,
    pub test_mode: Value<bool>,
    pub hibp: Value<bool>,
    pub enhanced_email_deliverability: Value<bool>,
    pub support_email: Value<String>,
    pub clerk_js_version: Value<String>,
    pub url_based_session_syncing: Value<bool>,
    pub development_origin: Value<String>,
    pub restrictions: Value<RestrictionsState>,
    pub organization_settings: Value<OrganizationSettingsState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestrictionsState {
    pub allowlist: Value<bool>,
    pub blocklist: Value<bool>,
    pub block_email_subaddresses: Value<bool>,
    pub block_disposable_email_domains: Value<bool>,
    pub ignore_dots_for_gmail_addresses: Value<bool>,
}

impl RestrictionsState {
    fn params(&self) -> RestrictionsParams {
        RestrictionsParams {
            allowlist: known(&self.allowlist),
            blocklist: known(&self.blocklist),
            block_email_subaddresses: known(&self.block_email_subaddresses),
            block_disposable_email_domains: known(&self.block_disposable_email_domains),
            ignore_dots_for_gmail_addresses: known(&self.ignore_dots_for_gmail_addresses),
        }
    }

    /// Planned restrictions with their unknowns filled from the API response
    fn merge(self, applied: InstanceRestrictions) -> Self {
        Self {
            allowlist: planned_or(self.allowlist, applied.allowlist),
            blocklist: planned_or(self.blocklist, applied.blocklist),
            block_email_subaddresses: planned_or(
                self.block_email_subaddresses,
                applied.block_email_subaddresses,
            ),
            block_disposable_email_domains: planned_or(
                self.block_disposable_email_domains,
                applied.block_disposable_email_domains,
            ),
            ignore_dots_for_gmail_addresses: planned_or(
                self.ignore_dots_for_gmail_addresses,
                applied.ignore_dots_for_gmail_addresses,
            ),
        }
    }

    fn plan_unknowns(self, config: &Self) -> Self {
        Self {
            allowlist: unknown_unless_configured(self.allowlist, &config.allowlist),
            blocklist: unknown_unless_configured(self.blocklist, &config.blocklist),
            block_email_subaddresses: unknown_unless_configured(
                self.block_email_subaddresses,
                &config.block_email_subaddresses,
            ),
            block_disposable_email_domains: unknown_unless_configured(
                self.block_disposable_email_domains,
                &config.block_disposable_email_domains,
            ),
            ignore_dots_for_gmail_addresses: unknown_unless_configured(
                self.ignore_dots_for_gmail_addresses,
                &config.ignore_dots_for_gmail_addresses,
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSettingsState {
    pub enabled: Value<bool>,
    pub max_allowed_memberships: Value<i64>,
    pub creator_role_id: Value<String>,
    pub admin_delete_enabled: Value<bool>,
    pub domains_enabled: Value<bool>,
    pub domains_enrollment_modes: Value<Vec<String>>,
    pub domains_default_role_id: Value<String>,
}

impl OrganizationSettingsState {
    fn params(&self) -> OrganizationSettingsParams {
        OrganizationSettingsParams {
            enabled: known(&self.enabled),
            max_allowed_memberships: known(&self.max_allowed_memberships),
            creator_role_id: known(&self.creator_role_id),
            admin_delete_enabled: known(&self.admin_delete_enabled),
            domains_enabled: known(&self.domains_enabled),
            domains_enrollment_modes: known(&self.domains_enrollment_modes),
            domains_default_role_id: known(&self.domains_default_role_id),
        }
    }

    /// Planned settings with their unknowns filled from the API response
    ///
    /// The API answers with role keys rather than the role ids that were
    /// sent, so both role ids only ever hold the configured value.
    fn merge(self, applied: OrganizationSettings) -> Self {
        Self {
            enabled: planned_or(self.enabled, applied.enabled),
            max_allowed_memberships: planned_or(
                self.max_allowed_memberships,
                applied.max_allowed_memberships,
            ),
            creator_role_id: settle(self.creator_role_id),
            admin_delete_enabled: planned_or(self.admin_delete_enabled, applied.admin_delete_enabled),
            domains_enabled: planned_or(self.domains_enabled, applied.domains_enabled),
            domains_enrollment_modes: planned_or(
                self.domains_enrollment_modes,
                applied.domains_enrollment_modes,
            ),
            domains_default_role_id: settle(self.domains_default_role_id),
        }
    }

    fn plan_unknowns(self, config: &Self) -> Self {
        Self {
            enabled: unknown_unless_configured(self.enabled, &config.enabled),
            max_allowed_memberships: unknown_unless_configured(
                self.max_allowed_memberships,
                &config.max_allowed_memberships,
            ),
            creator_role_id: unknown_unless_configured(self.creator_role_id, &config.creator_role_id),
            admin_delete_enabled: unknown_unless_configured(
                self.admin_delete_enabled,
                &config.admin_delete_enabled,
            ),
            domains_enabled: unknown_unless_configured(self.domains_enabled, &config.domains_enabled),
            domains_enrollment_modes: unknown_unless_configured(
                self.domains_enrollment_modes,
                &config.domains_enrollment_modes,
            ),
            domains_default_role_id: unknown_unless_configured(
                self.domains_default_role_id,
                &config.domains_default_role_id,
            ),
        }
    }
}

/// A computed value the configuration leaves out may change on apply
fn unknown_unless_configured<T>(planned: Value<T>, configured: &Value<T>) -> Value<T> {
    if configured.is_null() {
        Value::Unknown
    } else {
        planned
    }
}

/// Plan a single nested object: unknown when unset, per attribute otherwise
fn plan_nested<T>(
    planned: Value<T>,
    configured: &Value<T>,
    plan_unknowns: impl FnOnce(T, &T) -> T,
) -> Value<T> {
    match (planned, configured) {
        (Value::Value(object), Value::Value(config)) => Value::Value(plan_unknowns(object, config)),
        _ => Value::Unknown,
    }
}

impl EnvironmentState {
    fn instance_settings_params(&self) -> InstanceSettingsParams {
        InstanceSettingsParams {
            test_mode: known(&self.test_mode),
            hibp: known(&self.hibp),
            enhanced_email_deliverability: known(&self.enhanced_email_deliverability),
            support_email: known(&self.support_email),
            clerk_js_version: known(&self.clerk_js_version),
            url_based_session_syncing: known(&self.url_based_session_syncing),
            development_origin: known(&self.development_origin),
        }
    }

    /// Mark every computed value the configuration leaves out as unknown
    fn plan_unknowns(mut self, config: &Self) -> Self {
        for (planned, configured) in [
            (&mut self.test_mode, &config.test_mode),
            (&mut self.hibp, &config.hibp),
            (&mut self.enhanced_email_deliverability, &config.enhanced_email_deliverability),
            (&mut self.url_based_session_syncing, &config.url_based_session_syncing),
        ] {
            *planned = unknown_unless_configured(std::mem::take(planned), configured);
        }
        for (planned, configured) in [
            (&mut self.support_email, &config.support_email),
            (&mut self.clerk_js_version, &config.clerk_js_version),
            (&mut self.development_origin, &config.development_origin),
        ] {
            *planned = unknown_unless_configured(std::mem::take(planned), configured);
        }
        self.restrictions = plan_nested(
            self.restrictions,
            &config.restrictions,
            RestrictionsState::plan_unknowns,
        );
        self.organization_settings = plan_nested(
            self.organization_settings,
            &config.organization_settings,
            OrganizationSettingsState::plan_unknowns,
        );
        self
    }

    /// Instance settings are not returned by the API; unknown ones settle to null
    fn resolve_unknowns(&mut self) {
        for value in [
            &mut self.test_mode,
            &mut self.hibp,
            &mut self.enhanced_email_deliverability,
            &mut self.url_based_session_syncing,
        ] {
            *value = settle(std::mem::take(value));
        }
        for value in [
            &mut self.support_email,
            &mut self.clerk_js_version,
            &mut self.development_origin,
        ] {
            *value = settle(std::mem::take(value));
        }
        self.restrictions = settle(std::mem::take(&mut self.restrictions));
        self.organization_settings = settle(std::mem::take(&mut self.organization_settings));
    }

    fn environment_id(&self, diags: &mut Diagnostics) -> Option<EnvironmentId> {
        match text(&self.environment).parse::<Environment>() {
            Ok(environment) => Some(EnvironmentId::new(text(&self.application_id), environment)),
            Err(e) => {
                diags.error(e.summary(), e.to_string(), AttributePath::new("environment"));
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnvironmentResource {
    client: SharedClient,
}

impl EnvironmentResource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

/// Push every configured setting, filling unknowns in `state` from the API
async fn apply_settings(
    client: &ClerkClient,
    target: &EnvironmentId,
    state: &mut EnvironmentState,
    diags: &mut Diagnostics,
) -> Option<()> {
    let app_id = target.application_id.as_str();
    let environment = target.environment.as_str();

    let settings = state.instance_settings_params();
    if !settings.is_empty() {
        if let Err(e) = client
            .update_instance_settings(app_id, environment, &settings)
            .await
        {
            diags.root_error(
                "Error updating instance settings",
                format!("Could not update instance settings for {target}: {e}"),
            );
            return None;
        }
    }

    if let Value::Value(planned) = std::mem::take(&mut state.restrictions) {
        match client
            .update_instance_restrictions(app_id, environment, &planned.params())
            .await
        {
            Ok(result) => state.restrictions = Value::Value(planned.merge(result)),
            Err(e) => {
                diags.root_error(
                    "Error updating instance restrictions",
                    format!("Could not update restrictions for {target}: {e}"),
                );
                return None;
            }
        }
    }

    if let Value::Value(planned) = std::mem::take(&mut state.organization_settings) {
        match client
            .update_organization_settings(app_id, environment, &planned.params())
            .await
        {
            Ok(result) => state.organization_settings = Value::Value(planned.merge(result)),
            Err(e) => {
                diags.root_error(
                    "Error updating organization settings",
                    format!("Could not update organization settings for {target}: {e}"),
                );
                return None;
            }
        }
    }

    Some(())
}

#[async_trait]
impl Resource for EnvironmentResource {
    type State<'a> = EnvironmentState;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Configures a Clerk application instance. Destroying it resets the instance to default settings.",
                ),
                attributes: map! {
                    "id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Computed,
                        "Composite ID: {application_id}/{environment}.",
                    ),
                    "application_id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Application the instance belongs to. Changing it forces a new resource.",
                    ),
                    "environment" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Instance environment: development or production. Changing it forces a new resource.",
                    ),
                    "test_mode" => setting(AttributeType::Bool, "Whether test mode is enabled."),
                    "hibp" => setting(AttributeType::Bool, "Whether passwords are checked against HaveIBeenPwned."),
                    "enhanced_email_deliverability" => setting(
                        AttributeType::Bool,
                        "Whether enhanced email deliverability is enabled.",
                    ),
                    "support_email" => setting(AttributeType::String, "Support email address."),
                    "clerk_js_version" => setting(AttributeType::String, "Pinned Clerk.js version."),
                    "url_based_session_syncing" => setting(
                        AttributeType::Bool,
                        "Whether URL-based session syncing is enabled.",
                    ),
                    "development_origin" => setting(
                        AttributeType::String,
                        "Origin allowed to use the development instance.",
                    ),
                    "restrictions" => setting(
                        AttributeType::AttributeSingle(map! {
                            "allowlist" => setting(AttributeType::Bool, "Only allow sign-ups from the allowlist."),
                            "blocklist" => setting(AttributeType::Bool, "Block sign-ups from the blocklist."),
                            "block_email_subaddresses" => setting(
                                AttributeType::Bool,
                                "Block email addresses with subaddresses.",
                            ),
                            "block_disposable_email_domains" => setting(
                                AttributeType::Bool,
                                "Block disposable email domains.",
                            ),
                            "ignore_dots_for_gmail_addresses" => setting(
                                AttributeType::Bool,
                                "Treat Gmail addresses differing only by dots as equal.",
                            ),
                        }),
                        "Sign-up restrictions.",
                    ),
                    "organization_settings" => setting(
                        AttributeType::AttributeSingle(map! {
                            "enabled" => setting(AttributeType::Bool, "Whether organizations are enabled."),
                            "max_allowed_memberships" => setting(
                                AttributeType::Number,
                                "Default membership limit per organization.",
                            ),
                            "creator_role_id" => setting(
                                AttributeType::String,
                                "Role assigned to organization creators.",
                            ),
                            "admin_delete_enabled" => setting(
                                AttributeType::Bool,
                                "Whether admins may delete organizations.",
                            ),
                            "domains_enabled" => setting(AttributeType::Bool, "Whether verified domains are enabled."),
                            "domains_enrollment_modes" => setting(
                                AttributeType::List(Box::new(AttributeType::String)),
                                "Enrollment modes for verified domains.",
                            ),
                            "domains_default_role_id" => setting(
                                AttributeType::String,
                                "Role assigned to members joining through a verified domain.",
                            ),
                        }),
                        "Organization feature settings.",
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
        _diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut planned = proposed_state.plan_unknowns(&config_state);
        planned.id = unknown_if_null(planned.id);
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

        if proposed_state == prior_state {
            return Some((proposed_state, prior_private_state, replace));
        }
        let id = proposed_state.id.clone();
        let mut planned = proposed_state.plan_unknowns(&config_state);
        planned.id = id;
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
        let mut state = planned_state;
        let target = state.environment_id(diags)?;

        apply_settings(&client, &target, &mut state, diags).await?;

        state.id = Value::Value(target.to_string());
        state.resolve_unknowns();
        info!("Configured Clerk environment {}", target);
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
        let mut state = planned_state;
        let target = state.environment_id(diags)?;

        apply_settings(&client, &target, &mut state, diags).await?;

        state.id = match prior_state.id {
            Value::Value(id) => Value::Value(id),
            Value::Null | Value::Unknown => Value::Value(target.to_string()),
        };
        state.resolve_unknowns();
        Some((state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let target = prior_state.environment_id(diags)?;
        reset_environment(&client, &target, diags).await;
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        match id.parse::<EnvironmentId>() {
            Ok(target) => {
                let state = EnvironmentState {
                    id: Value::Value(target.to_string()),
                    application_id: Value::Value(target.application_id.clone()),
                    environment: Value::Value(target.environment.to_string()),
                    ..EnvironmentState::default()
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

/// Reset an instance to defaults; every failure is a warning
async fn reset_environment(client: &ClerkClient, target: &EnvironmentId, diags: &mut Diagnostics) {
    let app_id = target.application_id.as_str();
    let environment = target.environment.as_str();

    let settings = InstanceSettingsParams {
        test_mode: Some(RESET_TEST_MODE),
        hibp: Some(RESET_HIBP),
        enhanced_email_deliverability: Some(RESET_ENHANCED_EMAIL_DELIVERABILITY),
        support_email: Some(RESET_SUPPORT_EMAIL.to_string()),
        clerk_js_version: Some(RESET_CLERK_JS_VERSION.to_string()),
        url_based_session_syncing: Some(RESET_URL_BASED_SESSION_SYNCING),
        development_origin: Some(RESET_DEVELOPMENT_ORIGIN.to_string()),
    };
    if let Err(e) = client
        .update_instance_settings(app_id, environment, &settings)
        .await
    {
        reset_warning(diags, "instance settings", target, &e);
    }

    let restrictions = RestrictionsParams {
        allowlist: Some(RESET_RESTRICTION),
        blocklist: Some(RESET_RESTRICTION),
        block_email_subaddresses: Some(RESET_RESTRICTION),
        block_disposable_email_domains: Some(RESET_RESTRICTION),
        ignore_dots_for_gmail_addresses: Some(RESET_RESTRICTION),
    };
    if let Err(e) = client
        .update_instance_restrictions(app_id, environment, &restrictions)
        .await
    {
        reset_warning(diags, "instance restrictions", target, &e);
    }

    let organization_settings = OrganizationSettingsParams {
        enabled: Some(RESET_ORGANIZATIONS_ENABLED),
        admin_delete_enabled: Some(RESET_ORGANIZATION_ADMIN_DELETE_ENABLED),
        domains_enabled: Some(RESET_ORGANIZATION_DOMAINS_ENABLED),
        ..OrganizationSettingsParams::default()
    };
    if let Err(e) = client
        .update_organization_settings(app_id, environment, &organization_settings)
        .await
    {
        reset_warning(diags, "organization settings", target, &e);
    }

    info!("Reset Clerk environment {} to defaults", target);
}

fn reset_warning(
    diags: &mut Diagnostics,
    what: &str,
    target: &EnvironmentId,
    error: &dyn std::error::Error,
) {
    warn!("Failed to reset {} for {}: {}", what, target, error);
    diags.root_warning(
        format!("Failed to reset {what}"),
        format!("Could not reset {what} for {target}: {error}. The instance still exists in Clerk."),
    );
}

fn setting(attr_type: AttributeType, description: &str) -> Attribute {
    attribute(attr_type, AttributeConstraint::OptionalComputed, description)
}
