// File: services/clinica_agenda/src/cli.rs
use std::path::PathBuf;

use clap::Parser;

/// Book or move an appointment through the Clinica API.
///
/// The payload file holds the appointment as JSON, e.g.
/// `{"patientId": "..", "professionalId": "..", "startTime": "2025-05-05T14:00:00Z", "durationMinutes": 50}`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the appointment payload (JSON)
    pub payload: PathBuf,

    /// Update this existing appointment instead of creating a new one
    #[arg(short, long, value_name = "APPOINTMENT_ID")]
    pub update: Option<String>,

    /// Skip the agenda printed after a successful booking
    #[arg(long)]
    pub no_agenda: bool,
}

/// Whether an answer to a yes/no prompt means yes. Anything else is a no.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
