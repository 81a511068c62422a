//! crates/symptom_guide_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the hosted language model and of the local storage backend.

use crate::domain::{GuidanceResult, SymptomIntake};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for local persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Guidance Error Taxonomy
//=========================================================================================

/// The client-visible failure kinds of a guidance request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuidanceError {
    #[error("No API credential is configured")]
    MissingCredential,
    #[error("The API credential was rejected")]
    Unauthorized,
    #[error("The guidance service is busy")]
    ServiceUnavailable,
    #[error("The guidance service is not available in this location")]
    RegionRestricted,
    #[error("The guidance service returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("Analysis failed: {0}")]
    UnknownFailure(String),
}

impl GuidanceError {
    /// Only a busy service is worth retrying, and only after a short pause.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GuidanceError::ServiceUnavailable)
    }

    /// Failures that persist until configuration is fixed outside the app.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GuidanceError::MissingCredential | GuidanceError::Unauthorized
        )
    }

    /// Human-readable message for display.
    pub fn user_message(&self) -> String {
        match self {
            GuidanceError::MissingCredential => {
                "API key missing: set GEMINI_API_KEY in your environment or .env file.".to_string()
            }
            GuidanceError::Unauthorized => {
                "Authentication failed: the configured API key is invalid or lacks permission."
                    .to_string()
            }
            GuidanceError::ServiceUnavailable => {
                "The guidance service is overloaded right now.".to_string()
            }
            GuidanceError::RegionRestricted => {
                "The guidance service is not supported in your location.".to_string()
            }
            GuidanceError::MalformedResponse(detail) => {
                format!("The guidance service returned an unusable answer ({}).", detail)
            }
            GuidanceError::UnknownFailure(message) => format!("Analysis failed: {}", message),
        }
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait GuidanceService: Send + Sync {
    /// Issues a single guidance request for the intake. Never retries.
    async fn request_guidance(
        &self,
        intake: &SymptomIntake,
    ) -> Result<GuidanceResult, GuidanceError>;
}

/// A string key-value store standing in for browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}
