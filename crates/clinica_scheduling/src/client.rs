// --- File: crates/clinica_scheduling/src/client.rs ---
//! reqwest implementation of [`SchedulingApi`] for the remote clinic API.

use chrono::SecondsFormat;
use clinica_common::http::{join_url, REQUEST_ID_HEADER};
use clinica_common::models::{
    ApiResponse, Appointment, AppointmentListQuery, AppointmentPayload, AvailabilityQuery,
};
use clinica_common::services::{BoxFuture, SchedulingApi};
use clinica_common::{create_api_client, ClinicaError};
use clinica_config::ApiConfig;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiClientError;

/// Longest body excerpt kept in an [`ApiClientError::UnexpectedResponse`].
const MAX_BODY_EXCERPT: usize = 512;

/// Client for the appointment endpoints of the clinic API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration (tenant and auth headers included).
    pub fn new(config: &ApiConfig) -> Result<Self, ClinicaError> {
        let client = create_api_client(config)?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Sends the request and reads the envelope, whatever the HTTP status.
    ///
    /// The API reports rejections (including conflicts, usually with 409)
    /// inside the envelope, so the status code alone is not an error here.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiClientError> {
        let request_id = Uuid::new_v4().to_string();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%request_id, status = status.as_u16(), "clinic API responded");

        serde_json::from_str::<ApiResponse<T>>(&body).map_err(|e| {
            warn!(%request_id, status = status.as_u16(), "unreadable response envelope: {}", e);
            ApiClientError::UnexpectedResponse {
                status: status.as_u16(),
                body: excerpt(&body),
            }
        })
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// Same precision as the serde form used in write bodies
fn format_timestamp(time: &chrono::DateTime<chrono::Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn availability_params(query: &AvailabilityQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("professionalId", query.professional_id.clone()),
        ("startTime", format_timestamp(&query.start_time)),
        ("durationMinutes", query.duration_minutes.to_string()),
    ];
    if let Some(exclude) = &query.exclude_appointment_id {
        params.push(("excludeAppointmentId", exclude.clone()));
    }
    params
}

fn list_params(query: &AppointmentListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(day) = query.day {
        params.push(("date", day.format("%Y-%m-%d").to_string()));
    }
    if let Some(professional_id) = &query.professional_id {
        params.push(("professionalId", professional_id.clone()));
    }
    params
}

impl SchedulingApi for ApiClient {
    type Error = ApiClientError;

    fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> BoxFuture<'_, ApiResponse<bool>, Self::Error> {
        let request = self
            .client
            .get(self.url("appointments/availability"))
            .query(&availability_params(query));

        Box::pin(async move { self.send::<bool>(request).await })
    }

    fn create_appointment(
        &self,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error> {
        let request = self
            .client
            .post(self.url("appointments"))
            .query(&[("forceSchedule", force_schedule)])
            .json(payload);

        Box::pin(async move { self.send::<Appointment>(request).await })
    }

    fn update_appointment(
        &self,
        appointment_id: &str,
        payload: &AppointmentPayload,
        force_schedule: bool,
    ) -> BoxFuture<'_, ApiResponse<Appointment>, Self::Error> {
        let request = self
            .client
            .put(self.url(&format!("appointments/{}", appointment_id)))
            .query(&[("forceSchedule", force_schedule)])
            .json(payload);

        Box::pin(async move { self.send::<Appointment>(request).await })
    }

    fn list_appointments(
        &self,
        query: &AppointmentListQuery,
    ) -> BoxFuture<'_, ApiResponse<Vec<Appointment>>, Self::Error> {
        let request = self
            .client
            .get(self.url("appointments"))
            .query(&list_params(query));

        Box::pin(async move { self.send::<Vec<Appointment>>(request).await })
    }
}
