mod booking_system;
mod config;
mod dates;
mod db;
mod shell;
mod validate;

use std::path::Path;

use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

use crate::{
    booking_system::BookingSystem,
    config::{Config, CONFIG_FILE_NAME},
    shell::Shell,
};

/// A single booking as stored in the DB
///
/// The text columns are nullable, so rows written by other tools may lack any of them.
#[derive(Debug, sqlx::FromRow)]
struct Booking {
    /// assigned by the DB on insertion
    id: i64,
    /// letters only, first one upper case
    customer_name: Option<String>,
    /// always `YY/MM/DD` when written by us
    date: Option<String>,
    service: Option<String>,
}

/// Log to the configured file so log lines do not end up between the prompts.
fn setup_tracing(config: &Config) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let directory = config
        .log_file
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let file_name = config
        .log_file
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&config.log_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // problems in the config file are reported on stderr, the log file is not open yet
    let config = Config::create()?;
    // keep the guard alive until the end of main, dropping it flushes the log
    let guard = setup_tracing(&config)?;
    if Path::new(CONFIG_FILE_NAME).exists() {
        info!("Read config from {CONFIG_FILE_NAME}");
    } else {
        info!("Config file {CONFIG_FILE_NAME} not present, using defaults");
    }
    info!("Starting booking manager with {config:?}");

    let system = BookingSystem::open(&config).await?;

    let mut shell = Shell::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    let interrupted = tokio::select! {
        res = shell.run(&system) => {
            if let Err(e) = res {
                error!("Ending session after error: {e}");
                println!("\n**********An error occurred: {e}**********");
            }
            false
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, ending session");
            true
        }
    };

    system.close_connection().await;
    println!("\n------------Database connection closed------------");
    if interrupted {
        // the pending stdin read sits on a blocking thread that would keep the runtime alive
        drop(guard);
        std::process::exit(0);
    }
    Ok(())
}
