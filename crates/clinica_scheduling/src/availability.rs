// --- File: crates/clinica_scheduling/src/availability.rs ---
//! Debounced availability probing.
//!
//! While a user edits the professional, start time or duration of an
//! appointment, [`AvailabilityChecker::schedule`] is called on every change.
//! Only once the inputs have been stable for the debounce window is the
//! clinic API asked whether the slot is free, and only the answer for the
//! latest inputs is published as an [`AvailabilityVerdict`].
//!
//! A verdict only ever describes the inputs it was computed for: any input
//! change withdraws it until the new inputs are answered. The probe is
//! advisory, so failures are logged and swallowed (no verdict is shown for
//! those inputs) and nothing here ever blocks a write.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clinica_common::models::AvailabilityQuery;
use clinica_common::services::SchedulingApi;
use clinica_config::SchedulingConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::SchedulingError;

/// Input stability required before a probe is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub const AVAILABLE_MESSAGE: &str = "slot available";
pub const UNAVAILABLE_MESSAGE: &str = "professional already booked for this window";

/// Human-readable outcome of an availability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityVerdict {
    pub is_available: bool,
    pub message: String,
}

impl AvailabilityVerdict {
    pub fn from_availability(is_available: bool) -> Self {
        let message = if is_available {
            AVAILABLE_MESSAGE
        } else {
            UNAVAILABLE_MESSAGE
        };
        Self {
            is_available,
            message: message.to_string(),
        }
    }
}

/// Ask the API once whether `query`'s window is free.
///
/// A response with `success = false` is returned as
/// [`SchedulingError::Rejected`]; the conflict flag has no meaning here.
pub async fn check_availability<A: SchedulingApi>(
    api: &A,
    query: &AvailabilityQuery,
) -> Result<bool, SchedulingError> {
    let response = api
        .check_availability(query)
        .await
        .map_err(SchedulingError::transport)?;

    if !response.success {
        return Err(SchedulingError::Rejected {
            message: response.error_message(),
        });
    }
    response.data.ok_or(SchedulingError::MissingData)
}

/// Debounced, cancellable availability checker for one editing session.
///
/// [`schedule`](Self::schedule) spawns onto the current tokio runtime and
/// must be called from within one. Dropping the checker cancels any armed
/// probe.
pub struct AvailabilityChecker<A: SchedulingApi + 'static> {
    api: Arc<A>,
    debounce: Duration,
    // Bumped on every input change; a probe publishes only if its
    // generation is still current while holding this lock.
    generation: Arc<Mutex<u64>>,
    verdict: Arc<watch::Sender<Option<AvailabilityVerdict>>>,
    armed: Option<JoinHandle<()>>,
    last_query: Option<AvailabilityQuery>,
}

impl<A: SchedulingApi + 'static> AvailabilityChecker<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_debounce(api, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<A>, debounce: Duration) -> Self {
        let (verdict, _) = watch::channel(None);
        Self {
            api,
            debounce,
            generation: Arc::new(Mutex::new(0)),
            verdict: Arc::new(verdict),
            armed: None,
            last_query: None,
        }
    }

    pub fn from_config(api: Arc<A>, config: &SchedulingConfig) -> Self {
        Self::with_debounce(api, Duration::from_millis(config.debounce_ms))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Immediate, un-debounced probe. Does not touch the published verdict.
    pub async fn check_availability(
        &self,
        professional_id: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
        exclude_appointment_id: Option<&str>,
    ) -> Result<bool, SchedulingError> {
        let mut query = AvailabilityQuery::new(professional_id, start_time, duration_minutes);
        query.exclude_appointment_id = exclude_appointment_id.map(str::to_string);
        check_availability(self.api.as_ref(), &query).await
    }

    /// React to an input change.
    ///
    /// Cancels the armed probe (if any), withdraws the current verdict and
    /// arms a new probe for `query`. Re-submitting the inputs that are
    /// already armed or answered is a no-op. Incomplete inputs arm nothing.
    pub fn schedule(&mut self, query: AvailabilityQuery) {
        if self.last_query.as_ref() == Some(&query) {
            return;
        }

        let generation = self.invalidate();
        self.last_query = Some(query.clone());

        // The published verdict answered other inputs
        self.verdict.send_if_modified(|current| current.take().is_some());

        if !query.is_complete() {
            debug!("availability inputs incomplete, no probe armed");
            return;
        }

        let api = Arc::clone(&self.api);
        let current = Arc::clone(&self.generation);
        let verdict = Arc::clone(&self.verdict);
        let debounce = self.debounce;

        self.armed = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!(
                professional_id = %query.professional_id,
                start_time = %query.start_time,
                duration_minutes = query.duration_minutes,
                "probing availability"
            );

            match check_availability(api.as_ref(), &query).await {
                Ok(is_available) => {
                    let latest = current.lock().unwrap_or_else(PoisonError::into_inner);
                    if *latest == generation {
                        verdict.send_replace(Some(AvailabilityVerdict::from_availability(is_available)));
                    } else {
                        debug!("discarding availability answer for superseded inputs");
                    }
                }
                Err(e) => {
                    warn!("availability check failed, no verdict for these inputs: {}", e);
                }
            }
        }));
    }

    /// Abort the armed probe, if any. The current verdict is kept.
    pub fn cancel(&mut self) {
        self.invalidate();
        // Allow the same inputs to be scheduled again after a cancel
        self.last_query = None;
    }

    /// Cancel and forget the verdict, e.g. when the form is reset.
    pub fn clear(&mut self) {
        self.cancel();
        self.verdict.send_replace(None);
    }

    /// The verdict for the current inputs, once they have been answered.
    pub fn verdict(&self) -> Option<AvailabilityVerdict> {
        self.verdict.borrow().clone()
    }

    /// Watch verdict changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<AvailabilityVerdict>> {
        self.verdict.subscribe()
    }

    /// Whether a probe is armed or in flight.
    pub fn is_pending(&self) -> bool {
        self.armed.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn invalidate(&mut self) -> u64 {
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        *generation
    }
}

impl<A: SchedulingApi + 'static> Drop for AvailabilityChecker<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
    }
}
