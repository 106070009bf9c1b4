use thiserror::Error;

use crate::diagnostics::Diagnostic;

#[derive(Error, Debug)]
pub enum Error {
    #[error("UnknownResourceType: {0}")]
    UnknownResourceType(String),

    #[error("InvalidConfiguration: {}", diagnostics::join(.0))]
    InvalidConfiguration(Vec<Diagnostic>),

    #[error("DecodeError: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("SerializationError: {0}")]
    SerializationError(#[source] serde_yaml::Error),

    #[error("MetricsError: {0}")]
    MetricsError(#[source] prometheus::Error),
}

impl Error {
    /// The diagnostics to hand back to Terraform for this error.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::InvalidConfiguration(diagnostics) => diagnostics.clone(),
            Error::UnknownResourceType(name) => vec![Diagnostic::error(
                "Unknown Resource Type",
                format!("The provider does not implement a resource named \"{name}\"."),
            )],
            Error::DecodeError(e) => vec![Diagnostic::error(
                "Unable to decode configuration",
                format!("The configuration could not be converted into the resource type.\n\nDecode Error: {e}"),
            )],
            Error::SerializationError(e) => vec![Diagnostic::error(
                "Unable to marshal resource",
                format!("An unexpected error occurred while marshalling the resource. Please report this issue to the provider developers.\n\nMarshal Error: {e}"),
            )],
            Error::MetricsError(e) => vec![Diagnostic::error("Metrics unavailable", e.to_string())],
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub mod crds;
pub mod diagnostics;
pub mod manager;
pub mod metadata;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod server;
pub mod validators;
