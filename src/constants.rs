//! # Constants
//!
//! Provider-wide defaults: API endpoints, environment variable names and the
//! values an environment is reset to when its resource is destroyed.

/// Provider type name; resource type names are `clerk_<suffix>`
pub const PROVIDER_TYPE_NAME: &str = "clerk";

/// Default Platform API base URL
pub const DEFAULT_PLATFORM_API_URL: &str = "https://api.clerk.com/v1";

/// Default Backend API base URL
pub const DEFAULT_BACKEND_API_URL: &str = "https://api.clerk.com/v1";

/// Workspace-level Platform API key
pub const PLATFORM_API_KEY_ENV: &str = "CLERK_PLATFORM_API_KEY";

/// Platform API base URL override
pub const PLATFORM_API_URL_ENV: &str = "CLERK_PLATFORM_API_URL";

/// Backend API base URL override
pub const BACKEND_API_URL_ENV: &str = "CLERK_BACKEND_API_URL";

/// Log level Terraform sets for provider plugins
pub const TF_LOG_PROVIDER_ENV: &str = "TF_LOG_PROVIDER";

/// Default tracing filter when neither `RUST_LOG` nor `TF_LOG_PROVIDER` is set
pub const DEFAULT_LOG_FILTER: &str = "terraform_provider_clerk=info";

pub const USER_AGENT: &str = concat!("terraform-provider-clerk/", env!("CARGO_PKG_VERSION"));

// Instance settings applied when a clerk_environment is destroyed
pub const RESET_TEST_MODE: bool = false;
pub const RESET_HIBP: bool = true;
pub const RESET_ENHANCED_EMAIL_DELIVERABILITY: bool = true;
pub const RESET_SUPPORT_EMAIL: &str = "";
pub const RESET_CLERK_JS_VERSION: &str = "";
pub const RESET_URL_BASED_SESSION_SYNCING: bool = false;
pub const RESET_DEVELOPMENT_ORIGIN: &str = "";

// All restrictions are switched off
pub const RESET_RESTRICTION: bool = false;

// Organization settings
pub const RESET_ORGANIZATIONS_ENABLED: bool = false;
pub const RESET_ORGANIZATION_ADMIN_DELETE_ENABLED: bool = false;
pub const RESET_ORGANIZATION_DOMAINS_ENABLED: bool = false;
