//! Error types
//!
//! Typed errors for the two failure domains the inventory distinguishes:
//! configuration problems (fatal, raised before any provider call) and
//! provider call failures (recovered per resource type or per item).

use thiserror::Error;

/// Fatal problems with the resource definitions document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse resource definitions: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("resource definitions contain no resources")]
    NoResources,

    #[error("resource '{resource}': {reason}")]
    Invalid { resource: String, reason: String },

    #[error("unknown resource type(s): {0}")]
    UnknownResources(String),
}

impl ConfigError {
    pub(crate) fn invalid(resource: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }
}

/// A failed provider call, carrying the provider's error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct InvokeError {
    pub code: String,
    pub message: String,
}

impl InvokeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
