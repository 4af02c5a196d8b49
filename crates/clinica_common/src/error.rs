use std::fmt;
use thiserror::Error;

/// The base error type for all Clinica errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for ClinicaError.
#[derive(Error, Debug)]
pub enum ClinicaError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error reported by the remote clinic API
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// A scheduling conflict that was not (or could not be) negotiated
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ClinicaError {
    /// Process exit code used by the terminal front-ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClinicaError::ConfigError(_) => 78,
            ClinicaError::ValidationError(_) | ClinicaError::ParseError(_) => 65,
            ClinicaError::HttpError(_) | ClinicaError::ExternalServiceError { .. } => 69,
            ClinicaError::ConflictError(_) => 75,
            ClinicaError::InternalError(_) => 70,
        }
    }
}

/// A trait for adding context to errors.
///
/// This trait can be implemented by error types to provide a consistent way
/// to add context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, ClinicaError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, ClinicaError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ClinicaError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| internal_error(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, ClinicaError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| internal_error(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for ClinicaError {
    fn from(err: reqwest::Error) -> Self {
        ClinicaError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for ClinicaError {
    fn from(err: serde_json::Error) -> Self {
        ClinicaError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for ClinicaError {
    fn from(err: std::io::Error) -> Self {
        internal_error(err)
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ClinicaError {
    ClinicaError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ClinicaError {
    ClinicaError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> ClinicaError {
    ClinicaError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> ClinicaError {
    ClinicaError::InternalError(message.to_string())
}
