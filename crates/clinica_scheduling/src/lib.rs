// --- File: crates/clinica_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod cache;
pub mod client;
pub mod error;
#[cfg(test)]
mod mock;
pub mod negotiator;
#[cfg(test)]
mod negotiator_proptest;

pub use availability::{AvailabilityChecker, AvailabilityVerdict};
pub use cache::AppointmentCache;
pub use client::ApiClient;
pub use error::{ApiClientError, SchedulingError};
pub use negotiator::{
    ConflictNegotiator, NegotiationState, PendingConflict, WriteOperation, WriteOutcome,
};
