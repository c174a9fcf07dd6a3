//! # Platform API
//!
//! Workspace-level application management.

use super::transport::NO_BODY;
use super::types::{Application, CreateApplicationRequest, DeletedObject, UpdateApplicationRequest};
use super::{ClerkClient, ClientError};
use reqwest::Method;
use tracing::{info, info_span, Instrument};

const APPLICATIONS_PATH: &[&str] = &["platform", "applications"];

fn application_path(id: &str) -> [&str; 3] {
    ["platform", "applications", id]
}

fn secret_keys_query(include_secret_keys: bool) -> &'static [(&'static str, &'static str)] {
    if include_secret_keys {
        &[("include_secret_keys", "true")]
    } else {
        &[]
    }
}

impl ClerkClient {
    /// `POST /platform/applications`
    pub async fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> Result<Application, ClientError> {
        let span = info_span!("clerk.application.create", application.name = %request.name);
        async move {
            let application: Application = self
                .platform
                .send_json(Method::POST, APPLICATIONS_PATH, &[], Some(request), "create application")
                .await?;
            info!(
                "Created Clerk application {} with {} instance(s)",
                application.application_id,
                application.instances.len()
            );
            Ok(application)
        }
        .instrument(span)
        .await
    }

    /// `GET /platform/applications/{id}`
    pub async fn get_application(
        &self,
        id: &str,
        include_secret_keys: bool,
    ) -> Result<Application, ClientError> {
        let span = info_span!("clerk.application.get", application.id = id);
        self.platform
            .send_json(
                Method::GET,
                &application_path(id),
                secret_keys_query(include_secret_keys),
                NO_BODY,
                "get application",
            )
            .instrument(span)
            .await
    }

    /// `PATCH /platform/applications/{id}`
    pub async fn update_application(
        &self,
        id: &str,
        request: &UpdateApplicationRequest,
    ) -> Result<Application, ClientError> {
        let span = info_span!("clerk.application.update", application.id = id);
        self.platform
            .send_json(
                Method::PATCH,
                &application_path(id),
                &[],
                Some(request),
                "update application",
            )
            .instrument(span)
            .await
    }

    /// `DELETE /platform/applications/{id}`
    ///
    /// A response with `deleted: false` is an error.
    pub async fn delete_application(&self, id: &str) -> Result<(), ClientError> {
        let span = info_span!("clerk.application.delete", application.id = id);
        async move {
            let deleted: DeletedObject = self
                .platform
                .send_json(
                    Method::DELETE,
                    &application_path(id),
                    &[],
                    NO_BODY,
                    "delete application",
                )
                .await?;
            if !deleted.deleted {
                return Err(ClientError::NotDeleted(id.to_string()));
            }
            info!("Deleted Clerk application {}", id);
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// `GET /platform/applications`
    pub async fn list_applications(
        &self,
        include_secret_keys: bool,
    ) -> Result<Vec<Application>, ClientError> {
        let span = info_span!("clerk.application.list");
        self.platform
            .send_json(
                Method::GET,
                APPLICATIONS_PATH,
                secret_keys_query(include_secret_keys),
                NO_BODY,
                "list applications",
            )
            .instrument(span)
            .await
    }
}
