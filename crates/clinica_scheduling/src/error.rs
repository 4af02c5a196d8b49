use clinica_common::{external_service_error, internal_error, ClinicaError};
use thiserror::Error;

/// Errors raised by [`crate::client::ApiClient`] before an envelope could be read.
#[derive(Error, Debug)]
pub enum ApiClientError {
    /// Transport failure or timeout
    #[error("Clinic API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The body was not a valid response envelope
    #[error("Clinic API returned an unexpected response (Status: {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Errors of the scheduling workflow.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// The API could not be reached or answered with something unreadable
    #[error("Clinic API unavailable: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Ordinary rejection (validation, authorization, server error)
    #[error("{message}")]
    Rejected { message: String },

    /// A conflict reported where no negotiation is possible,
    /// e.g. on the forced retry itself
    #[error("Scheduling conflict: {message}")]
    Conflict { message: String },

    /// The API reported success without returning the entity
    #[error("Clinic API reported success without data")]
    MissingData,

    /// A new write was attempted while a conflict awaits the user's decision
    #[error("A scheduling conflict is awaiting confirmation; confirm or cancel it first")]
    ConflictAlreadyPending,

    /// confirm/cancel called with nothing pending
    #[error("No scheduling conflict is pending")]
    NoPendingConflict,

    /// An update reached the transport without the appointment to update
    #[error("Update requested without a target appointment id")]
    MissingUpdateTarget,
}

impl SchedulingError {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SchedulingError::Transport(Box::new(err))
    }
}

/// Convert SchedulingError to ClinicaError
impl From<SchedulingError> for ClinicaError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Transport(e) => ClinicaError::HttpError(e.to_string()),
            SchedulingError::Rejected { message } => external_service_error("Clinic API", message),
            SchedulingError::Conflict { message } => ClinicaError::ConflictError(message),
            SchedulingError::MissingData => {
                external_service_error("Clinic API", "success reported without data")
            }
            e @ (SchedulingError::ConflictAlreadyPending | SchedulingError::NoPendingConflict) => {
                ClinicaError::ValidationError(e.to_string())
            }
            e @ SchedulingError::MissingUpdateTarget => internal_error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_server_message_verbatim() {
        let err = SchedulingError::Rejected { message: "Invalid duration".to_string() };
        assert_eq!(err.to_string(), "Invalid duration");
    }

    #[test]
    fn test_conversion_into_common_taxonomy() {
        let conflict: ClinicaError = SchedulingError::Conflict { message: "busy".into() }.into();
        assert!(matches!(conflict, ClinicaError::ConflictError(m) if m == "busy"));

        let rejected: ClinicaError = SchedulingError::Rejected { message: "nope".into() }.into();
        assert!(matches!(rejected, ClinicaError::ExternalServiceError { .. }));

        let pending: ClinicaError = SchedulingError::ConflictAlreadyPending.into();
        assert!(matches!(pending, ClinicaError::ValidationError(_)));

        let untargeted: ClinicaError = SchedulingError::MissingUpdateTarget.into();
        assert_eq!(untargeted.exit_code(), 70);

        let unexpected = ApiClientError::UnexpectedResponse { status: 502, body: "<html>".into() };
        let transport: ClinicaError = SchedulingError::transport(unexpected).into();
        assert!(matches!(transport, ClinicaError::HttpError(m) if m.contains("502")));
    }
}
