// --- File: crates/clinica_common/src/http/client.rs ---
use clinica_config::ApiConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

use crate::error::{config_error, ClinicaError};
use crate::http::TENANT_HEADER;

/// Creates a new HTTP client that never follows redirects.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for every request
/// * `headers` - Headers attached to every request
///
/// # Returns
///
/// A new reqwest::Client instance with the specified configuration
pub fn create_client(timeout_secs: u64, headers: HeaderMap) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        // An auth redirect must surface as a failed response, not a different body
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(headers)
        .build()
}

/// Creates the client used to talk to the remote clinic API.
///
/// The tenant header and, when a token is configured, the bearer
/// `Authorization` header are attached to every request by default.
pub fn create_api_client(config: &ApiConfig) -> Result<Client, ClinicaError> {
    let headers = default_headers(config)?;
    create_client(config.timeout_secs, headers).map_err(ClinicaError::from)
}

fn default_headers(config: &ApiConfig) -> Result<HeaderMap, ClinicaError> {
    let mut headers = HeaderMap::new();

    let tenant = HeaderValue::from_str(&config.tenant_id)
        .map_err(|e| config_error(format!("invalid tenant_id for header: {e}")))?;
    headers.insert(TENANT_HEADER, tenant);

    if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| config_error(format!("invalid api token for header: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
