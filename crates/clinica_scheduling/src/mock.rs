//! Scripted implementation of [`SchedulingApi`] for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use clinica_common::models::{
    ApiResponse, Appointment, AppointmentListQuery, AppointmentPayload, AppointmentStatus,
    AvailabilityQuery,
};
use clinica_common::services::{BoxFuture, SchedulingApi};
use thiserror::Error;

/// A request received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CheckAvailability(AvailabilityQuery),
    Create {
        payload: AppointmentPayload,
        force: bool,
    },
    Update {
        appointment_id: String,
        payload: AppointmentPayload,
        force: bool,
    },
    List(AppointmentListQuery),
}

#[derive(Error, Debug)]
#[error("mock transport failure")]
pub struct MockTransportError;

type Scripted<T> = Result<ApiResponse<T>, MockTransportError>;

/// Mock clinic API.
///
/// Responses are consumed from per-operation queues; when a queue is empty
/// the mock answers with success (slot free, write echoed back, empty list).
pub struct MockSchedulingApi {
    calls: Mutex<Vec<ApiCall>>,
    availability: Mutex<VecDeque<(Duration, Scripted<bool>)>>,
    writes: Mutex<VecDeque<Scripted<Appointment>>>,
    lists: Mutex<VecDeque<Scripted<Vec<Appointment>>>>,
}

impl MockSchedulingApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            availability: Mutex::new(VecDeque::new()),
            writes: Mutex::new(VecDeque::new()),
            lists: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_availability(&self, response: ApiResponse<bool>) {
        self.push_delayed_availability(Duration::ZERO, response);
    }

    /// Script an availability answer that arrives only after `delay`.
    pub fn push_delayed_availability(&self, delay: Duration, response: ApiResponse<bool>) {
        self.availability.lock().unwrap().push_back((delay, Ok(response)));
    }

    pub fn push_availability_error(&self) {
        self.availability
            .lock()
            .unwrap()
            .push_back((Duration::ZERO, Err(MockTransportError)));
    }

    pub fn push_write(&self, response: ApiResponse<Appointment>) {
        self.writes.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_write_error(&self) {
        self.writes.lock().unwrap().push_back(Err(MockTransportError));
    }

    pub fn push_list(&self, response: ApiResponse<Vec<Appointment>>) {
        self.lists.lock().unwrap().push_back(Ok(response));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_write(&self, id: &str, payload: &AppointmentPayload) -> Scripted<Appointment> {
        self.writes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(appointment_from(id, payload))))
    }
}

impl Default for MockSchedulingApi {
    fn default() -> Self {
        Self::new()
    }
}

/// The entity the API would store for `payload`.
pub fn appointment_from(id: &str, payload: &AppointmentPayload) -> Appointment {
    Appointment {
        id: id.to_string(),
        tenant_id: "clinic-test".to_string(),
        patient_id: payload.patient_id.clone(),
        professional_id: payload.professional_id.clone(),
        room_id: payload.room_id.clone(),
        start_time: payload.start_time,
        end_time: payload.start_time + ChronoDuration::minutes(payload.duration_minutes),
        duration_minutes: payload.duration_minutes,
        status: payload.status.unwrap_or(AppointmentStatus::Scheduled),
        notes: payload.notes.clone(),
    }
}

impl SchedulingApi for MockSchedulingApi {
    type Error = MockTransportError;

    fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> BoxFuture<'_, ApiResponse<bool>, Self::Error> {
        self.record(ApiCall::CheckAvailability(query.clone()));
        let (delay, scripted) = self
            .availability
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(ApiResponse::ok(true))));

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            scripted
        })
    }

    fn create_appointment(
        &self,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error> {
        self.record(ApiCall::Create {
            payload: payload.clone(),
            force: force_schedule,
        });
        let scripted = self.next_write("apt-new", payload);
        Box::pin(async move { scripted })
    }

    fn update_appointment(
        &self,
        appointment_id: &str,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error> {
        self.record(ApiCall::Update {
            appointment_id: appointment_id.to_string(),
            payload: payload.clone(),
            force: force_schedule,
        });
        let scripted = self.next_write(appointment_id, payload);
        Box::pin(async move { scripted })
    }

    fn list_appointments(
        &self,
        query: &AppointmentListQuery,
    ) -> BoxFuture<'_, ApiResponse<Vec<Appointment>>, Self::Error> {
        self.record(ApiCall::List(query.clone()));
        let scripted = self
            .lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(Vec::new())));
        Box::pin(async move { scripted })
    }
}
