//! # Backend API: Instance Settings
//!
//! General settings, restriction rules and organization feature settings of
//! one application instance. The Backend API has no read endpoint for these,
//! so only updates exist here.

use super::types::{
    InstanceRestrictions, InstanceSettingsParams, OrganizationSettings, OrganizationSettingsParams,
    RestrictionsParams,
};
use super::{ClerkClient, ClientError};
use reqwest::Method;
use tracing::{info_span, Instrument};

impl ClerkClient {
    /// `PATCH /instance`
    pub async fn update_instance_settings(
        &self,
        app_id: &str,
        environment: &str,
        params: &InstanceSettingsParams,
    ) -> Result<(), ClientError> {
        let span = info_span!(
            "clerk.instance.update_settings",
            application.id = app_id,
            environment = environment
        );
        async move {
            self.backend(app_id, environment)?
                .send(Method::PATCH, &["instance"], &[], Some(params), "instance settings")
                .await?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// `PATCH /instance/restrictions`
    pub async fn update_instance_restrictions(
        &self,
        app_id: &str,
        environment: &str,
        params: &RestrictionsParams,
    ) -> Result<InstanceRestrictions, ClientError> {
        let span = info_span!(
            "clerk.instance.update_restrictions",
            application.id = app_id,
            environment = environment
        );
        async move {
            self.backend(app_id, environment)?
                .send_json(
                    Method::PATCH,
                    &["instance", "restrictions"],
                    &[],
                    Some(params),
                    "instance restrictions",
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// `PATCH /instance/organization_settings`
    pub async fn update_organization_settings(
        &self,
        app_id: &str,
        environment: &str,
        params: &OrganizationSettingsParams,
    ) -> Result<OrganizationSettings, ClientError> {
        let span = info_span!(
            "clerk.instance.update_organization_settings",
            application.id = app_id,
            environment = environment
        );
        async move {
            self.backend(app_id, environment)?
                .send_json(
                    Method::PATCH,
                    &["instance", "organization_settings"],
                    &[],
                    Some(params),
                    "organization settings",
                )
                .await
        }
        .instrument(span)
        .await
    }
}
