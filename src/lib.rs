//! # Terraform Provider for Clerk
//!
//! A Terraform/OpenTofu provider that manages Clerk applications, their
//! development and production instances, and organizations.
//!
//! ## Overview
//!
//! - **Applications** are managed through the Clerk Platform API with a
//!   workspace-level Platform API key.
//! - **Environments** and **organizations** are managed through the Backend
//!   API of one instance, authenticated with that instance's secret key.
//!
//! Instance secret keys are learned when an application is created, read or
//! looked up, and kept in a registry keyed by application and environment.
//! Resources that target an instance resolve their Backend API client from
//! that registry, so an application must be known to the provider before
//! anything inside it can be managed.
//!
//! ## Usage
//!
//! See the [README.md](../README.md) for provider configuration and examples.

pub mod client;
pub mod config;
pub mod constants;
pub mod datasources;
pub mod provider;
pub mod resources;
pub mod runtime;
