//! End-to-end provider tests against a mocked Clerk API.
//!
//! The provider is configured through `tf_provider::Provider::configure`, and
//! resources and data sources share its client slot the same way they do
//! when `tf_provider::serve` hands them to Terraform. Schemas, planning and
//! the backend client registry are exercised together.

use serde_json::{json, Value as JsonValue};
use std::fmt::Debug;
use terraform_provider_clerk::datasources::application::ApplicationDataState;
use terraform_provider_clerk::datasources::ApplicationDataSource;
use terraform_provider_clerk::provider::{ClerkProvider, ProviderState};
use terraform_provider_clerk::resources::application::ApplicationState;
use terraform_provider_clerk::resources::environment::{
    EnvironmentState, OrganizationSettingsState, RestrictionsState,
};
use terraform_provider_clerk::resources::organization::OrganizationState;
use terraform_provider_clerk::resources::{
    ApplicationResource, EnvironmentResource, OrganizationResource,
};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{DataSource, Diagnostics, Provider, Resource};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn application_body() -> JsonValue {
    json!({
        "application_id": "app_1",
        "instances": [
            {
                "instance_id": "ins_dev",
                "environment_type": "development",
                "publishable_key": "pk_test_1",
                "secret_key": "sk_test_1"
            },
            {
                "instance_id": "ins_prod",
                "environment_type": "production",
                "publishable_key": "pk_live_1",
                "secret_key": "sk_live_1"
            }
        ]
    })
}

fn organization_body() -> JsonValue {
    json!({
        "object": "organization",
        "id": "org_1",
        "name": "Acme",
        "slug": "acme",
        "max_allowed_memberships": 5,
        "admin_delete_enabled": true,
        "created_at": 1_700_000_000_000_i64,
        "updated_at": 1_700_000_000_500_i64
    })
}

fn string(value: &str) -> Value<String> {
    Value::Value(value.to_string())
}

async fn configured_provider(mock: &MockServer) -> ClerkProvider {
    let provider = ClerkProvider::new("0.0.0-test");
    let mut diags = Diagnostics::default();
    let config = ProviderState {
        platform_api_key: string("ak_test"),
        platform_api_url: string(&mock.uri()),
        backend_api_url: string(&mock.uri()),
    };
    provider
        .configure(&mut diags, "1.9.0".to_string(), config)
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    provider
}

/// Look up app_1 so its instance keys are registered
async fn register_application(provider: &ClerkProvider) {
    let mut diags = Diagnostics::default();
    let config = ApplicationDataState {
        id: string("app_1"),
        ..ApplicationDataState::default()
    };
    ApplicationDataSource::new(provider.client())
        .read(&mut diags, config, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
}

/// Known planned values must come back unchanged from apply
fn assert_kept<T: PartialEq + Debug>(name: &str, planned: &Value<T>, applied: &Value<T>) {
    if !planned.is_unknown() {
        assert_eq!(planned, applied, "{name} changed between plan and apply");
    }
    assert!(!applied.is_unknown(), "{name} is still unknown after apply");
}

fn assert_restrictions_kept(planned: &Value<RestrictionsState>, applied: &Value<RestrictionsState>) {
    let (Value::Value(planned), Value::Value(applied)) = (planned, applied) else {
        assert_kept("restrictions", planned, applied);
        return;
    };
    assert_kept("allowlist", &planned.allowlist, &applied.allowlist);
    assert_kept("blocklist", &planned.blocklist, &applied.blocklist);
    assert_kept(
        "block_email_subaddresses",
        &planned.block_email_subaddresses,
        &applied.block_email_subaddresses,
    );
    assert_kept(
        "block_disposable_email_domains",
        &planned.block_disposable_email_domains,
        &applied.block_disposable_email_domains,
    );
    assert_kept(
        "ignore_dots_for_gmail_addresses",
        &planned.ignore_dots_for_gmail_addresses,
        &applied.ignore_dots_for_gmail_addresses,
    );
}

fn assert_environment_kept(planned: &EnvironmentState, applied: &EnvironmentState) {
    assert_kept("id", &planned.id, &applied.id);
    assert_kept("application_id", &planned.application_id, &applied.application_id);
    assert_kept("environment", &planned.environment, &applied.environment);
    assert_kept("test_mode", &planned.test_mode, &applied.test_mode);
    assert_kept("hibp", &planned.hibp, &applied.hibp);
    assert_kept(
        "enhanced_email_deliverability",
        &planned.enhanced_email_deliverability,
        &applied.enhanced_email_deliverability,
    );
    assert_kept("support_email", &planned.support_email, &applied.support_email);
    assert_kept("clerk_js_version", &planned.clerk_js_version, &applied.clerk_js_version);
    assert_kept(
        "url_based_session_syncing",
        &planned.url_based_session_syncing,
        &applied.url_based_session_syncing,
    );
    assert_kept(
        "development_origin",
        &planned.development_origin,
        &applied.development_origin,
    );
    assert_restrictions_kept(&planned.restrictions, &applied.restrictions);
}

fn assert_served<P: Provider>(_provider: &P) {}

#[tokio::test]
async fn test_provider_is_served_through_tf_provider() {
    let provider = ClerkProvider::default();
    assert_served(&provider);

    let mut diags = Diagnostics::default();
    let schema = Provider::schema(&provider, &mut diags).unwrap();
    assert!(schema.block.attributes["platform_api_key"].sensitive);

    let mut resources: Vec<String> = provider
        .get_resources(&mut diags)
        .unwrap()
        .into_keys()
        .collect();
    resources.sort();
    assert_eq!(resources, vec!["application", "environment", "organization"]);
    assert!(diags.errors.is_empty());
}

#[tokio::test]
async fn test_application_create_registers_keys_for_environment() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/platform/applications"))
        .and(header("authorization", "Bearer ak_test"))
        .and(body_json(json!({
            "name": "acme",
            "environment_types": ["development", "production"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/instance"))
        .and(header("authorization", "Bearer sk_live_1"))
        .and(body_json(json!({"support_email": "help@acme.dev"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let mut diags = Diagnostics::default();

    let applications = ApplicationResource::new(provider.client());
    let config = ApplicationState {
        name: string("acme"),
        environment_types: Value::Value(vec!["development".to_string(), "production".to_string()]),
        ..ApplicationState::default()
    };
    let (planned, private) = applications
        .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
        .await
        .unwrap();
    let (state, _) = applications
        .create(&mut diags, planned, config, private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    assert_eq!(state.id, string("app_1"));
    assert_eq!(state.deletion_protection, Value::Value(true));
    assert_eq!(state.dev_secret_key, string("sk_test_1"));
    assert_eq!(state.prod_instance_id, string("ins_prod"));
    assert!(state.domain.is_null());

    let environments = EnvironmentResource::new(provider.client());
    let config = EnvironmentState {
        application_id: string("app_1"),
        environment: string("production"),
        support_email: string("help@acme.dev"),
        ..EnvironmentState::default()
    };
    let (planned, private) = environments
        .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
        .await
        .unwrap();
    let (state, _) = environments
        .create(&mut diags, planned, config, private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    assert_eq!(state.id, string("app_1/production"));
    assert_eq!(state.support_email, string("help@acme.dev"));
    assert!(state.test_mode.is_null());
    assert!(state.restrictions.is_null());
}

#[tokio::test]
async fn test_applied_environment_matches_plan() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .mount(&mock)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/instance"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;
    // The API reports allowlist off even though it was just enabled
    Mock::given(method("PATCH"))
        .and(path("/instance/restrictions"))
        .and(body_json(json!({"allowlist": true, "block_email_subaddresses": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "instance_restrictions",
            "allowlist": false,
            "blocklist": true,
            "block_email_subaddresses": true,
            "block_disposable_email_domains": false,
            "ignore_dots_for_gmail_addresses": true
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    register_application(&provider).await;

    let environments = EnvironmentResource::new(provider.client());
    let config = EnvironmentState {
        application_id: string("app_1"),
        environment: string("development"),
        test_mode: Value::Value(true),
        restrictions: Value::Value(RestrictionsState {
            allowlist: Value::Value(true),
            block_email_subaddresses: Value::Value(false),
            ..RestrictionsState::default()
        }),
        ..EnvironmentState::default()
    };

    let mut diags = Diagnostics::default();
    let (planned, private) = environments
        .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
        .await
        .unwrap();
    let (applied, _) = environments
        .create(&mut diags, planned.clone(), config, private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);

    assert_environment_kept(&planned, &applied);
    let Value::Value(restrictions) = &applied.restrictions else {
        panic!("restrictions missing after apply");
    };
    assert_eq!(restrictions.allowlist, Value::Value(true));
    assert_eq!(restrictions.blocklist, Value::Value(true));
    assert_eq!(restrictions.ignore_dots_for_gmail_addresses, Value::Value(true));
}

#[tokio::test]
async fn test_applied_organization_matches_plan() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .and(header("authorization", "Bearer sk_test_1"))
        .and(body_json(json!({"name": "Acme", "slug": "acme"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(organization_body()))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    register_application(&provider).await;

    let organizations = OrganizationResource::new(provider.client());
    let config = OrganizationState {
        application_id: string("app_1"),
        environment: string("development"),
        name: string("Acme"),
        slug: string("acme"),
        ..OrganizationState::default()
    };

    let mut diags = Diagnostics::default();
    let (planned, private) = organizations
        .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
        .await
        .unwrap();
    let (applied, _) = organizations
        .create(&mut diags, planned.clone(), config, private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);

    assert_kept("name", &planned.name, &applied.name);
    assert_kept("slug", &planned.slug, &applied.slug);
    assert_kept(
        "max_allowed_memberships",
        &planned.max_allowed_memberships,
        &applied.max_allowed_memberships,
    );
    assert_kept(
        "admin_delete_enabled",
        &planned.admin_delete_enabled,
        &applied.admin_delete_enabled,
    );
    assert_eq!(applied.id, string("org_1"));
    assert_eq!(applied.max_allowed_memberships, Value::Value(5));
}

#[tokio::test]
async fn test_environment_for_unknown_application_fails_without_request() {
    let mock = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let config = EnvironmentState {
        application_id: string("app_9"),
        environment: string("development"),
        test_mode: Value::Value(true),
        ..EnvironmentState::default()
    };
    let mut diags = Diagnostics::default();
    let created = EnvironmentResource::new(provider.client())
        .create(
            &mut diags,
            config.clone(),
            config,
            ValueEmpty::default(),
            ValueEmpty::default(),
        )
        .await;

    assert!(created.is_none());
    let error = &diags.errors[0];
    assert!(
        error.detail.contains("no backend client registered"),
        "{}",
        error.detail
    );
}

#[tokio::test]
async fn test_deletion_protection_blocks_destroy() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let prior = ApplicationState {
        id: string("app_1"),
        name: string("acme"),
        deletion_protection: Value::Value(true),
        ..ApplicationState::default()
    };
    let mut diags = Diagnostics::default();
    let destroyed = ApplicationResource::new(provider.client())
        .destroy(&mut diags, prior, ValueEmpty::default(), ValueEmpty::default())
        .await;

    assert!(destroyed.is_none());
    assert_eq!(
        diags.errors[0].summary,
        "Cannot destroy application with deletion protection enabled"
    );
}

#[tokio::test]
async fn test_unprotected_application_is_deleted() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleted": true,
            "object": "application",
            "id": "app_1"
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let prior = ApplicationState {
        id: string("app_1"),
        name: string("acme"),
        deletion_protection: Value::Value(false),
        ..ApplicationState::default()
    };
    let mut diags = Diagnostics::default();
    ApplicationResource::new(provider.client())
        .destroy(&mut diags, prior, ValueEmpty::default(), ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
}

#[tokio::test]
async fn test_missing_application_is_removed_from_state() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"code": "resource_not_found"}]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let state = ApplicationState {
        id: string("app_gone"),
        name: string("acme"),
        deletion_protection: Value::Value(true),
        ..ApplicationState::default()
    };
    let mut diags = Diagnostics::default();
    let read = ApplicationResource::new(provider.client())
        .read(&mut diags, state, ValueEmpty::default(), ValueEmpty::default())
        .await;

    assert!(read.is_none());
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
}

#[tokio::test]
async fn test_imported_organization_reads_through_application_data_source() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_1"))
        .and(query_param("include_secret_keys", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations/org_1"))
        .and(header("authorization", "Bearer sk_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(organization_body()))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    let mut diags = Diagnostics::default();

    let lookup = ApplicationDataSource::new(provider.client())
        .read(
            &mut diags,
            ApplicationDataState {
                id: string("app_1"),
                ..ApplicationDataState::default()
            },
            ValueEmpty::default(),
        )
        .await
        .unwrap();
    assert_eq!(lookup.dev_publishable_key, string("pk_test_1"));

    let organizations = OrganizationResource::new(provider.client());
    let (imported, private) = organizations
        .import(&mut diags, "app_1/development/org_1".to_string())
        .await
        .unwrap();
    assert_eq!(imported.id, string("org_1"));

    let (state, _) = organizations
        .read(&mut diags, imported, private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    assert_eq!(state.slug, string("acme"));
    assert_eq!(state.max_allowed_memberships, Value::Value(5));
    assert_eq!(state.created_at, Value::Value(1_700_000_000_000));
}

#[tokio::test]
async fn test_bad_import_id_is_rejected() {
    let mock = MockServer::start().await;
    let provider = configured_provider(&mock).await;

    let mut diags = Diagnostics::default();
    let imported = EnvironmentResource::new(provider.client())
        .import(&mut diags, "app_1/staging".to_string())
        .await;

    assert!(imported.is_none());
    assert_eq!(diags.errors[0].summary, "Invalid Environment");
}

#[tokio::test]
async fn test_environment_destroy_warns_when_reset_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .mount(&mock)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    register_application(&provider).await;

    let prior = EnvironmentState {
        id: string("app_1/development"),
        application_id: string("app_1"),
        environment: string("development"),
        ..EnvironmentState::default()
    };
    let mut diags = Diagnostics::default();
    EnvironmentResource::new(provider.client())
        .destroy(&mut diags, prior, ValueEmpty::default(), ValueEmpty::default())
        .await
        .unwrap();

    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    assert_eq!(diags.warnings.len(), 3);
    assert_eq!(diags.warnings[0].summary, "Failed to reset instance settings");
}

#[tokio::test]
async fn test_organization_settings_do_not_drift_after_apply() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/applications/app_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(application_body()))
        .mount(&mock)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/instance/organization_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "organization_settings",
            "enabled": true,
            "max_allowed_memberships": 10,
            "creator_role": "org:admin",
            "admin_delete_enabled": true,
            "domains_enabled": false,
            "domains_enrollment_modes": [],
            "domains_default_role": "org:member"
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let provider = configured_provider(&mock).await;
    register_application(&provider).await;

    let environments = EnvironmentResource::new(provider.client());
    let config = EnvironmentState {
        application_id: string("app_1"),
        environment: string("development"),
        organization_settings: Value::Value(OrganizationSettingsState {
            enabled: Value::Value(true),
            max_allowed_memberships: Value::Value(10),
            creator_role_id: string("role_admin"),
            ..OrganizationSettingsState::default()
        }),
        ..EnvironmentState::default()
    };

    let mut diags = Diagnostics::default();
    let (planned, private) = environments
        .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
        .await
        .unwrap();
    let (state, private) = environments
        .create(&mut diags, planned, config.clone(), private, ValueEmpty::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    let Value::Value(settings) = &state.organization_settings else {
        panic!("organization settings missing after apply");
    };
    assert_eq!(settings.creator_role_id, string("role_admin"));

    // Terraform proposes the prior state when the configuration is unchanged
    let (replanned, _, replace) = environments
        .plan_update(
            &mut diags,
            state.clone(),
            state.clone(),
            config,
            private,
            ValueEmpty::default(),
        )
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    assert!(replace.is_empty());
    assert_eq!(replanned, state);
}
