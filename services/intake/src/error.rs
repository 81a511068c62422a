//! services/intake/src/error.rs
//!
//! Defines the primary error type for the intake client.

use crate::adapters::ReportError;
use crate::config::ConfigError;
use symptom_guide_core::{GuidanceError, IntakeError, PortError};

/// The primary error type for the `intake` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The submitted form did not pass validation.
    #[error("{0}")]
    Intake(#[from] IntakeError),

    /// A guidance request failed with one of the client-visible kinds.
    #[error("{0}")]
    Guidance(#[from] GuidanceError),

    /// Represents an error that propagated up from local storage.
    #[error("Local storage error: {0}")]
    Port(#[from] PortError),

    /// Report generation or export failed.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The disclaimer has not been accepted yet.
    #[error("The medical disclaimer must be accepted before requesting guidance")]
    ConsentRequired,
}
