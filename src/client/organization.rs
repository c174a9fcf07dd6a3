//! # Backend API: Organizations

use super::transport::NO_BODY;
use super::types::{CreateOrganizationParams, DeletedObject, Organization, UpdateOrganizationParams};
use super::{ClerkClient, ClientError};
use reqwest::Method;
use tracing::{info, info_span, Instrument};

const ORGANIZATIONS_PATH: &[&str] = &["organizations"];

fn organization_path(id_or_slug: &str) -> [&str; 2] {
    ["organizations", id_or_slug]
}

impl ClerkClient {
    /// `POST /organizations`
    pub async fn create_organization(
        &self,
        app_id: &str,
        environment: &str,
        params: &CreateOrganizationParams,
    ) -> Result<Organization, ClientError> {
        let span = info_span!(
            "clerk.organization.create",
            application.id = app_id,
            environment = environment,
            organization.name = %params.name
        );
        async move {
            let organization: Organization = self
                .backend(app_id, environment)?
                .send_json(Method::POST, ORGANIZATIONS_PATH, &[], Some(params), "create organization")
                .await?;
            info!("Created Clerk organization {}", organization.id);
            Ok(organization)
        }
        .instrument(span)
        .await
    }

    /// `GET /organizations/{id_or_slug}`
    pub async fn get_organization(
        &self,
        app_id: &str,
        environment: &str,
        id_or_slug: &str,
    ) -> Result<Organization, ClientError> {
        let span = info_span!(
            "clerk.organization.get",
            application.id = app_id,
            environment = environment,
            organization.id = id_or_slug
        );
        async move {
            self.backend(app_id, environment)?
                .send_json(
                    Method::GET,
                    &organization_path(id_or_slug),
                    &[],
                    NO_BODY,
                    "get organization",
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// `PATCH /organizations/{id}`
    pub async fn update_organization(
        &self,
        app_id: &str,
        environment: &str,
        id: &str,
        params: &UpdateOrganizationParams,
    ) -> Result<Organization, ClientError> {
        let span = info_span!(
            "clerk.organization.update",
            application.id = app_id,
            environment = environment,
            organization.id = id
        );
        async move {
            self.backend(app_id, environment)?
                .send_json(
                    Method::PATCH,
                    &organization_path(id),
                    &[],
                    Some(params),
                    "update organization",
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// `DELETE /organizations/{id}`
    pub async fn delete_organization(
        &self,
        app_id: &str,
        environment: &str,
        id: &str,
    ) -> Result<(), ClientError> {
        let span = info_span!(
            "clerk.organization.delete",
            application.id = app_id,
            environment = environment,
            organization.id = id
        );
        async move {
            let deleted: DeletedObject = self
                .backend(app_id, environment)?
                .send_json(
                    Method::DELETE,
                    &organization_path(id),
                    &[],
                    NO_BODY,
                    "delete organization",
                )
                .await?;
            if !deleted.deleted {
                return Err(ClientError::NotDeleted(id.to_string()));
            }
            info!("Deleted Clerk organization {}", id);
            Ok(())
        }
        .instrument(span)
        .await
    }
}
