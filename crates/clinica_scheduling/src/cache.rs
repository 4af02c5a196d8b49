// --- File: crates/clinica_scheduling/src/cache.rs ---
//! Cached appointment lists, keyed by day and professional within the tenant.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono_tz::Tz;
use clinica_common::models::{Appointment, AppointmentListQuery};
use clinica_common::services::SchedulingApi;
use clinica_common::{config_error, ClinicaError};
use clinica_config::SchedulingConfig;
use tracing::debug;

use crate::error::SchedulingError;

type Entries = HashMap<AppointmentListQuery, Vec<Appointment>>;

/// Shared cache of appointment list views.
///
/// Clones share the same entries, so the negotiator can invalidate what the
/// views read.
#[derive(Clone)]
pub struct AppointmentCache {
    entries: Arc<RwLock<Entries>>,
    time_zone: Tz,
}

impl AppointmentCache {
    pub fn new(time_zone: Tz) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            time_zone,
        }
    }

    pub fn from_config(config: &SchedulingConfig) -> Result<Self, ClinicaError> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|e| config_error(format!("invalid scheduling.time_zone '{}': {}", config.time_zone, e)))?;
        Ok(Self::new(time_zone))
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn get(&self, key: &AppointmentListQuery) -> Option<Vec<Appointment>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: AppointmentListQuery, appointments: Vec<Appointment>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, appointments);
    }

    /// Serve `key` from the cache, fetching and storing it on a miss.
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<A: SchedulingApi>(
        &self,
        api: &A,
        key: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }

        debug!(?key, "appointment list cache miss");
        let response = api
            .list_appointments(key)
            .await
            .map_err(SchedulingError::transport)?;
        if !response.success {
            return Err(SchedulingError::Rejected {
                message: response.error_message(),
            });
        }
        let appointments = response.data.ok_or(SchedulingError::MissingData)?;
        self.insert(key.clone(), appointments.clone());
        Ok(appointments)
    }

    /// Drop every cached list that could contain `appointment`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_for(&self, appointment: &Appointment) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| !key.may_contain(appointment, &self.time_zone));
        let removed = before - entries.len();
        debug!(appointment_id = %appointment.id, removed, "invalidated appointment lists");
        removed
    }

    /// Drop everything.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.len();
        entries.clear();
        debug!(removed, "invalidated all appointment lists");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
