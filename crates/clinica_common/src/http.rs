// --- File: crates/clinica_common/src/http.rs ---

// Include the client module
pub mod client;

/// Header carrying the tenant (clinic account) every request is scoped to.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Joins a base URL and a path without doubling or dropping the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
