// --- File: crates/clinica_common/src/lib.rs ---

// Declare modules within this crate
pub mod models;   // Appointment data structures and the API envelope
pub mod error;    // Error handling
pub mod http;     // HTTP utilities
pub mod services; // Service abstractions
pub mod logging;  // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    ClinicaError,
    Context,
    config_error,
    validation_error,
    external_service_error,
    internal_error,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_api_client, create_client};

// Re-export logging utilities for easier access
pub use logging::{init_with_level, log_error, log_result};

// This crate provides functionality shared by the scheduling library and its front-ends.
// It includes domain models, error handling, logging setup, and HTTP client construction.
