//! # Composite Identifiers
//!
//! Import ids of the form `{application_id}/{environment}` and
//! `{application_id}/{environment}/{organization_id}`. The id is split into at
//! most two or three parts, so any further slashes stay in the last part.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Accepted values of every `environment` attribute
pub const ENVIRONMENTS: &[&str] = &["development", "production"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeIdError {
    #[error("Expected format: {expected}, got: {got:?}")]
    Malformed { expected: &'static str, got: String },

    #[error("Environment must be \"development\" or \"production\", got: {0:?}")]
    InvalidEnvironment(String),
}

impl CompositeIdError {
    /// Diagnostic summary
    pub fn summary(&self) -> &'static str {
        match self {
            CompositeIdError::Malformed { .. } => "Invalid Import ID",
            CompositeIdError::InvalidEnvironment(_) => "Invalid Environment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CompositeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(CompositeIdError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// `{application_id}/{environment}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentId {
    pub application_id: String,
    pub environment: Environment,
}

impl EnvironmentId {
    const FORMAT: &'static str = "{application_id}/{environment}";

    pub fn new(application_id: impl Into<String>, environment: Environment) -> Self {
        Self {
            application_id: application_id.into(),
            environment,
        }
    }
}

impl FromStr for EnvironmentId {
    type Err = CompositeIdError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = id.splitn(2, '/').collect();
        let [application_id, environment] = parts[..] else {
            return Err(malformed(Self::FORMAT, id));
        };
        if application_id.is_empty() || environment.is_empty() {
            return Err(malformed(Self::FORMAT, id));
        }
        Ok(Self {
            application_id: application_id.to_string(),
            environment: environment.parse()?,
        })
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.application_id, self.environment)
    }
}

/// `{application_id}/{environment}/{organization_id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationId {
    pub application_id: String,
    pub environment: Environment,
    pub organization_id: String,
}

impl OrganizationId {
    const FORMAT: &'static str = "{application_id}/{environment}/{organization_id}";
}

impl FromStr for OrganizationId {
    type Err = CompositeIdError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = id.splitn(3, '/').collect();
        let [application_id, environment, organization_id] = parts[..] else {
            return Err(malformed(Self::FORMAT, id));
        };
        if application_id.is_empty() || environment.is_empty() || organization_id.is_empty() {
            return Err(malformed(Self::FORMAT, id));
        }
        Ok(Self {
            application_id: application_id.to_string(),
            environment: environment.parse()?,
            organization_id: organization_id.to_string(),
        })
    }
}

fn malformed(expected: &'static str, got: &str) -> CompositeIdError {
    CompositeIdError::Malformed {
        expected,
        got: got.to_string(),
    }
}
