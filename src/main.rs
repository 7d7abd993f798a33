//! xdb - command-line entry point.
//!
//! Connects once, runs a single command, and prints the outcome. Any error
//! is reported on stderr with a non-zero exit status.

use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xdb::config::{Command, Config};
use xdb::{Connection, XdbResult, quote_identifier};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run(config: &Config) -> XdbResult<()> {
    let mut conn = Connection::connect_with(&config.connection_config()?)?;
    conn.set_query_listener(|sql| info!(target: "xdb::sql", %sql, "Executing"));
    let params = config.query_params();

    match &config.command {
        Command::Select { sql } => {
            let started = Instant::now();
            let result = conn.select_with(sql, &params)?;
            println!("{}", config.format.render(&result, started.elapsed()).trim_end());
        }
        Command::Exec { sql } => {
            conn.query_with(sql, &params)?;
            println!("OK");
        }
        Command::Scalar { sql } => {
            println!("{}", conn.scalar_with(sql, &params)?);
        }
        Command::TableExists { name } => {
            println!("{}", conn.is_table_exists(name)?);
        }
        Command::CreateDatabase { name } => {
            xdb::query!(
                conn,
                "CREATE DATABASE IF NOT EXISTS {}",
                quote_identifier(name)
            )?;
            println!("OK");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = Config::parse_args();

    init_tracing(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
