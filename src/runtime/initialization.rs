//! # Initialization
//!
//! Tracing setup for the provider process.
//!
//! Stdout carries the plugin transport, so logs always go to stderr, where
//! Terraform collects them. The filter comes from `RUST_LOG`, then
//! `TF_LOG_PROVIDER`, then the crate default.

use crate::constants::{DEFAULT_LOG_FILTER, TF_LOG_PROVIDER_ENV};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Build the log filter from the environment
pub fn log_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    std::env::var(TF_LOG_PROVIDER_ENV)
        .ok()
        .and_then(|level| EnvFilter::try_new(level.to_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the stderr tracing subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn initialize_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
    {
        warn!("Tracing subscriber already initialized: {}", e);
        return;
    }

    info!(
        "Starting terraform-provider-clerk v{}",
        env!("CARGO_PKG_VERSION")
    );
}
