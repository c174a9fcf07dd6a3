//! # terraform-provider-clerk
//!
//! Provider plugin binary. Terraform or OpenTofu starts it and talks to it
//! over the plugin protocol; run by hand it only answers `--help` and
//! `--version`.

use anyhow::Result;
use clap::Parser;
use terraform_provider_clerk::constants::PROVIDER_TYPE_NAME;
use terraform_provider_clerk::provider::ClerkProvider;
use terraform_provider_clerk::runtime::initialize_tracing;

#[derive(Parser, Debug)]
#[command(name = "terraform-provider-clerk")]
#[command(version, about = "Terraform/OpenTofu provider for Clerk", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    Cli::parse();
    initialize_tracing();

    if let Err(e) = tf_provider::serve(PROVIDER_TYPE_NAME, ClerkProvider::default()).await {
        anyhow::bail!("Provider server failed: {e}");
    }

    Ok(())
}
