use std::path::Path;

use anyhow::bail;
use bursar_shared::telemetry;

const APP_NAME: &str = "bursar_cli";

pub fn init(cli: &super::cli::Cli) -> anyhow::Result<()> {
    fn init_to_file() -> anyhow::Result<()> {
        let (file, filename) =
            telemetry::create_trace_file_in(Path::new(telemetry::TRACE_FOLDER), APP_NAME)?;
        let subscriber = telemetry::get_subscriber(APP_NAME.into(), "info", file);

        // Start logging to file
        match telemetry::init_subscriber(subscriber) {
            Ok(_) => {
                tracing::info!(?filename, "tracing started");
                Ok(())
            }
            Err(e) => {
                bail!("Failed to start tracing to file. Error: {e}");
            }
        }
    }

    if !cli.is_to_std_out {
        // Log to file
        match init_to_file() {
            Ok(_) => return Ok(()),
            Err(e) => {
                // Print error and fall though to logging to stdout
                eprintln!("Failed to start logging to file: {e}");
            }
        }
    }

    // Log to stderr so command output stays clean on stdout
    match tracing_subscriber::fmt().with_writer(std::io::stderr).try_init() {
        Ok(_) => Ok(()),
        Err(e) => {
            bail!("Failed to start tracing. Error: {e}");
        }
    }
}
