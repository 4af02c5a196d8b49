// --- File: crates/clinica_common/src/models.rs ---

// Data structures shared between the scheduling library and its front-ends:
// - Appointment entities as returned by the clinic API
// - Write payloads for create/update
// - Query types for availability and appointment lists
// - The response envelope every API call is wrapped in

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment as tracked by the clinic API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

/// An appointment stored by the clinic API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub tenant_id: String,
    pub patient_id: String,
    pub professional_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    /// The calendar day the appointment starts on, in the clinic's time zone.
    pub fn local_day(&self, time_zone: &Tz) -> NaiveDate {
        self.start_time.with_timezone(time_zone).date_naive()
    }
}

/// Body of a create or update request.
///
/// The same value is resubmitted unchanged when a scheduling conflict is
/// force-confirmed, so it carries no request-specific state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub patient_id: String,
    pub professional_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPayload {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }

    /// The availability probe matching this payload.
    pub fn availability_query(&self, exclude_appointment_id: Option<&str>) -> AvailabilityQuery {
        AvailabilityQuery {
            professional_id: self.professional_id.clone(),
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            exclude_appointment_id: exclude_appointment_id.map(str::to_string),
        }
    }
}

/// Parameters of a single availability probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub professional_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    /// Appointment to ignore, used when editing an existing appointment in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_appointment_id: Option<String>,
}

impl AvailabilityQuery {
    pub fn new(professional_id: impl Into<String>, start_time: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            professional_id: professional_id.into(),
            start_time,
            duration_minutes,
            exclude_appointment_id: None,
        }
    }

    pub fn excluding(mut self, appointment_id: impl Into<String>) -> Self {
        self.exclude_appointment_id = Some(appointment_id.into());
        self
    }

    /// A probe is only meaningful once a professional and a positive duration are set.
    pub fn is_complete(&self) -> bool {
        !self.professional_id.trim().is_empty() && self.duration_minutes > 0
    }
}

/// Filter for listing appointments; also the key of cached appointment lists.
///
/// Lists are always scoped to the tenant the client is configured for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    /// Clinic-local day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
}

impl AppointmentListQuery {
    pub fn for_day(day: NaiveDate) -> Self {
        Self { day: Some(day), professional_id: None }
    }

    pub fn for_professional(professional_id: impl Into<String>) -> Self {
        Self { day: None, professional_id: Some(professional_id.into()) }
    }

    pub fn with_professional(mut self, professional_id: impl Into<String>) -> Self {
        self.professional_id = Some(professional_id.into());
        self
    }

    /// Whether a list filtered by this query could contain `appointment`.
    pub fn may_contain(&self, appointment: &Appointment, time_zone: &Tz) -> bool {
        let day_matches = self
            .day
            .map_or(true, |day| day == appointment.local_day(time_zone));
        let professional_matches = self
            .professional_id
            .as_deref()
            .map_or(true, |id| id == appointment.professional_id);
        day_matches && professional_matches
    }
}

/// Envelope wrapping every response of the clinic API.
///
/// `is_conflict` is the only signal that distinguishes a scheduling conflict
/// from any other failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub is_conflict: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, is_conflict: false }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()), is_conflict: false }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()), is_conflict: true }
    }

    /// The server message, or a generic one when the API sent none.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "request rejected by the clinic API".to_string())
    }
}
