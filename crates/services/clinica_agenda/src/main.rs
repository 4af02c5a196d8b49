// File: services/clinica_agenda/src/main.rs
mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clinica_common::logging::{self, log_error, log_result};
use clinica_common::models::{AppointmentListQuery, AppointmentPayload};
use clinica_common::{config_error, validation_error, ClinicaError, Context};
use clinica_config::{load_config, AppConfig};
use clinica_scheduling::{
    ApiClient, AppointmentCache, AvailabilityChecker, AvailabilityVerdict, ConflictNegotiator,
    WriteOutcome,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::cli::{is_confirmation, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            let err = config_error(e);
            eprintln!("{}", err);
            return exit_code(&err);
        }
    };

    // Keep the guard alive so the file appender flushes on exit
    let _guard = logging::init_with_level(
        logging::parse_level(&config.logging.level),
        config.logging.directory.as_deref().map(Path::new),
    );

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e, "clinica-agenda failed");
            eprintln!("{}", e);
            exit_code(&e)
        }
    }
}

fn exit_code(err: &ClinicaError) -> ExitCode {
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), ClinicaError> {
    let payload = read_payload(&cli.payload).await?;

    let api = Arc::new(ApiClient::new(&config.api)?);
    let cache = AppointmentCache::from_config(&config.scheduling)?;
    info!(base_url = %api.base_url(), "using clinic API");

    println!(
        "Checking {} from {} to {}",
        payload.professional_id,
        payload.start_time.format("%Y-%m-%d %H:%M UTC"),
        payload.end_time().format("%H:%M UTC")
    );
    // Advisory only: a failed or negative check never blocks the write
    let checker = AvailabilityChecker::from_config(Arc::clone(&api), &config.scheduling);
    match checker
        .check_availability(
            &payload.professional_id,
            payload.start_time,
            payload.duration_minutes,
            cli.update.as_deref(),
        )
        .await
    {
        Ok(is_available) => println!("{}", AvailabilityVerdict::from_availability(is_available).message),
        Err(e) => warn!("availability check failed: {}", e),
    }

    let mut negotiator = ConflictNegotiator::new(Arc::clone(&api)).with_cache(cache.clone());
    let outcome = match cli.update.as_deref() {
        Some(appointment_id) => negotiator.update_appointment(appointment_id, payload).await?,
        None => negotiator.create_appointment(payload).await?,
    };

    let appointment = match outcome {
        WriteOutcome::Resolved(appointment) => appointment,
        WriteOutcome::ConflictPending { message } => {
            println!("Scheduling conflict: {}", message);
            if ask("Force this booking? [y/N] ").await? {
                log_result(
                    negotiator.confirm_conflict().await,
                    "forced booking accepted",
                    "forced booking failed",
                )?
            } else {
                negotiator.cancel_conflict()?;
                println!("Booking cancelled, nothing was saved.");
                return Ok(());
            }
        }
    };

    let time_zone = cache.time_zone();
    println!(
        "Booked {} for {} at {} ({} min)",
        appointment.id,
        appointment.patient_id,
        appointment.start_time.with_timezone(&time_zone).format("%Y-%m-%d %H:%M %Z"),
        appointment.duration_minutes
    );

    if cli.no_agenda {
        return Ok(());
    }

    let day = appointment.local_day(&time_zone);
    let key = AppointmentListQuery::for_day(day).with_professional(&appointment.professional_id);
    let agenda = cache.get_or_fetch(api.as_ref(), &key).await?;
    println!("Agenda of {} on {}:", appointment.professional_id, day);
    for entry in agenda {
        println!(
            "  {}-{}  {}  {:?}",
            entry.start_time.with_timezone(&time_zone).format("%H:%M"),
            entry.end_time.with_timezone(&time_zone).format("%H:%M"),
            entry.patient_id,
            entry.status
        );
    }

    Ok(())
}

async fn read_payload(path: &Path) -> Result<AppointmentPayload, ClinicaError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read payload file {}", path.display()))?;
    let payload: AppointmentPayload = serde_json::from_str(&raw)?;

    if !payload.availability_query(None).is_complete() {
        return Err(validation_error(
            "payload needs a professionalId and a positive durationMinutes",
        ));
    }
    Ok(payload)
}

async fn ask(question: &str) -> Result<bool, ClinicaError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
    Ok(is_confirmation(&answer))
}
