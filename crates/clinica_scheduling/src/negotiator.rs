// --- File: crates/clinica_scheduling/src/negotiator.rs ---
//! Appointment writes with explicit scheduling-conflict negotiation.
//!
//! A create or update is first sent without the force flag. When the clinic
//! API rejects it as a scheduling conflict, the write is parked as a
//! [`PendingConflict`] and the caller is told so instead of receiving an
//! error. The parked payload is resubmitted with `forceSchedule = true` only
//! from [`ConflictNegotiator::confirm_conflict`], and dropped by
//! [`ConflictNegotiator::cancel_conflict`].
//!
//! ```text
//! Idle/Resolved --write--> Submitting --success-------------> Resolved
//!                              |     --ordinary failure----> Idle (error)
//!                              +------conflict-------------> ConflictPending
//! ConflictPending --confirm--> Confirming -> Submitting(force) -> Resolved | Idle (error)
//! ConflictPending --cancel---> Cancelled -> Idle
//! ```
//!
//! A write attempted while a conflict is pending is rejected with
//! [`SchedulingError::ConflictAlreadyPending`]; the pending decision is kept.

use std::fmt;
use std::sync::Arc;

use clinica_common::models::{ApiResponse, Appointment, AppointmentPayload};
use clinica_common::services::SchedulingApi;
use tracing::{info, warn};

use crate::cache::AppointmentCache;
use crate::error::SchedulingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Submitting,
    ConflictPending,
    Confirming,
    Resolved,
    Cancelled,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::Submitting => "submitting",
            NegotiationState::ConflictPending => "conflict-pending",
            NegotiationState::Confirming => "confirming",
            NegotiationState::Resolved => "resolved",
            NegotiationState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
}

/// A write the API rejected as a scheduling conflict, awaiting the user's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConflict {
    pub payload: AppointmentPayload,
    pub error_message: String,
    pub operation: WriteOperation,
    /// Set for updates.
    pub target_appointment_id: Option<String>,
}

/// Result of a write that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Resolved(Appointment),
    /// The API reported a conflict; call `confirm_conflict` or `cancel_conflict`.
    ConflictPending { message: String },
}

/// Drives the create/update path of one appointment-editing session.
pub struct ConflictNegotiator<A: SchedulingApi> {
    api: Arc<A>,
    cache: Option<AppointmentCache>,
    state: NegotiationState,
    pending: Option<PendingConflict>,
}

impl<A: SchedulingApi> ConflictNegotiator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cache: None,
            state: NegotiationState::Idle,
            pending: None,
        }
    }

    /// Invalidate `cache` whenever a write resolves.
    pub fn with_cache(mut self, cache: AppointmentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn pending_conflict(&self) -> Option<&PendingConflict> {
        self.pending.as_ref()
    }

    pub async fn create_appointment(
        &mut self,
        payload: AppointmentPayload,
    ) -> Result<WriteOutcome, SchedulingError> {
        self.write(WriteOperation::Create, None, payload).await
    }

    pub async fn update_appointment(
        &mut self,
        appointment_id: &str,
        payload: AppointmentPayload,
    ) -> Result<WriteOutcome, SchedulingError> {
        self.write(WriteOperation::Update, Some(appointment_id.to_string()), payload)
            .await
    }

    /// Force the pending write through. Sends exactly one request.
    ///
    /// If the forced write fails, for any reason, the error is returned and
    /// the negotiator goes back to idle; there is no second negotiation round.
    pub async fn confirm_conflict(&mut self) -> Result<Appointment, SchedulingError> {
        if self.state != NegotiationState::ConflictPending {
            return Err(SchedulingError::NoPendingConflict);
        }
        let conflict = self.pending.take().ok_or(SchedulingError::NoPendingConflict)?;

        self.transition(NegotiationState::Confirming);
        self.transition(NegotiationState::Submitting);
        let response = self
            .send(
                conflict.operation,
                conflict.target_appointment_id.as_deref(),
                &conflict.payload,
                true,
            )
            .await;

        match response {
            Ok(response) if response.success => self.resolve(conflict.operation, response),
            Ok(response) => {
                self.transition(NegotiationState::Idle);
                let message = response.error_message();
                warn!("forced write rejected: {}", message);
                if response.is_conflict {
                    Err(SchedulingError::Conflict { message })
                } else {
                    Err(SchedulingError::Rejected { message })
                }
            }
            Err(e) => {
                self.transition(NegotiationState::Idle);
                Err(e)
            }
        }
    }

    /// Abandon the pending write. No request is sent.
    pub fn cancel_conflict(&mut self) -> Result<(), SchedulingError> {
        if self.state != NegotiationState::ConflictPending {
            return Err(SchedulingError::NoPendingConflict);
        }
        self.pending = None;
        self.transition(NegotiationState::Cancelled);
        self.transition(NegotiationState::Idle);
        Ok(())
    }

    async fn write(
        &mut self,
        operation: WriteOperation,
        target_appointment_id: Option<String>,
        payload: AppointmentPayload,
    ) -> Result<WriteOutcome, SchedulingError> {
        match self.state {
            NegotiationState::ConflictPending => {
                return Err(SchedulingError::ConflictAlreadyPending);
            }
            // Only reachable when a previous write future was dropped mid-flight
            NegotiationState::Submitting | NegotiationState::Confirming => {
                warn!("previous write was abandoned while {}", self.state);
            }
            _ => {}
        }

        self.transition(NegotiationState::Submitting);
        let response = match self
            .send(operation, target_appointment_id.as_deref(), &payload, false)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.transition(NegotiationState::Idle);
                return Err(e);
            }
        };

        if response.success {
            return self.resolve(operation, response).map(WriteOutcome::Resolved);
        }

        let message = response.error_message();
        if response.is_conflict {
            info!(?operation, "write rejected as scheduling conflict: {}", message);
            self.pending = Some(PendingConflict {
                payload,
                error_message: message.clone(),
                operation,
                target_appointment_id,
            });
            self.transition(NegotiationState::ConflictPending);
            return Ok(WriteOutcome::ConflictPending { message });
        }

        self.transition(NegotiationState::Idle);
        Err(SchedulingError::Rejected { message })
    }

    pub(crate) async fn send(
        &self,
        operation: WriteOperation,
        target_appointment_id: Option<&str>,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> Result<ApiResponse<Appointment>, SchedulingError> {
        let result = match (operation, target_appointment_id) {
            (WriteOperation::Create, _) => {
                self.api.create_appointment(payload, force_schedule).await
            }
            (WriteOperation::Update, Some(id)) => {
                self.api.update_appointment(id, payload, force_schedule).await
            }
            (WriteOperation::Update, None) => return Err(SchedulingError::MissingUpdateTarget),
        };
        result.map_err(SchedulingError::transport)
    }

    fn resolve(
        &mut self,
        operation: WriteOperation,
        response: ApiResponse<Appointment>,
    ) -> Result<Appointment, SchedulingError> {
        let Some(appointment) = response.data else {
            self.transition(NegotiationState::Idle);
            return Err(SchedulingError::MissingData);
        };

        if let Some(cache) = &self.cache {
            match operation {
                WriteOperation::Create => {
                    cache.invalidate_for(&appointment);
                }
                // The appointment's previous day and professional are unknown here
                WriteOperation::Update => {
                    cache.invalidate_all();
                }
            }
        }

        self.transition(NegotiationState::Resolved);
        info!(appointment_id = %appointment.id, ?operation, "appointment write resolved");
        Ok(appointment)
    }

    fn transition(&mut self, next: NegotiationState) {
        info!(from = %self.state, to = %next, "negotiation state change");
        self.state = next;
    }
}
