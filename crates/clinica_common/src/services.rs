// --- File: crates/clinica_common/src/services.rs ---
//! Service abstractions for the remote clinic API.
//!
//! The scheduling workflow talks to the API only through [`SchedulingApi`],
//! which keeps the workflow testable against scripted implementations and
//! decoupled from the concrete HTTP client.

use std::future::Future;
use std::pin::Pin;

use crate::models::{
    ApiResponse, Appointment, AppointmentListQuery, AppointmentPayload, AvailabilityQuery,
};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Appointment operations offered by the clinic API.
///
/// Implementations return the API envelope as-is: a rejected write is an
/// `Ok(ApiResponse { success: false, .. })`, while `Err` is reserved for
/// transport failures and responses that are not a valid envelope.
/// Interpreting `success` and `is_conflict` is the caller's job.
pub trait SchedulingApi: Send + Sync {
    /// Error type returned on transport failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ask whether the professional is free for the window described by `query`.
    fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> BoxFuture<'_, ApiResponse<bool>, Self::Error>;

    /// Create an appointment. `force_schedule` persists it despite a conflict.
    fn create_appointment(
        &self,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error>;

    /// Update an existing appointment. `force_schedule` persists it despite a conflict.
    fn update_appointment(
        &self,
        appointment_id: &str,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error>;

    /// List the tenant's appointments matching `query`.
    fn list_appointments(
        &self,
        query: &AppointmentListQuery,
    ) -> BoxFuture<'_, ApiResponse<Vec<Appointment>>, Self::Error>;
}
