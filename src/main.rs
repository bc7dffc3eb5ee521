/*
 * Command-line front end: `shell_dialogs <request.json>`. Reads a dialog
 * request, shows the dialog, and prints the outcome as one JSON line on
 * stdout. Logging goes to stderr and to a log file in the application's local
 * configuration directory.
 */
use shell_dialogs::core::config::{self, DialogOutcome, DialogRequest};
use shell_dialogs::core::path_utils;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

const APP_NAME: &str = "ShellDialogs";
const LOG_FILE_NAME: &str = "shell_dialogs.log";

fn initialize_logging(level: LevelFilter) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let log_path = path_utils::get_base_app_config_local_dir(APP_NAME)
        .map(|dir| dir.join(LOG_FILE_NAME));
    if let Some(path) = &log_path {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, log_config, file)),
            Err(e) => eprintln!("Failed to create log file {path:?}: {e}"),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logger: {e}");
        return;
    }
    log::debug!("Main: Logging initialized at level {level}. Log file: {log_path:?}");
}

fn print_outcome(outcome: &DialogOutcome) {
    match serde_json::to_string(outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize dialog outcome: {e}"),
    }
}

#[cfg(target_os = "windows")]
fn run(request: &DialogRequest) -> DialogOutcome {
    use shell_dialogs::platform_layer::{PlatformError, PlatformInterface};

    let platform = match PlatformInterface::new(APP_NAME.to_string()) {
        Ok(platform) => platform,
        Err(e) => {
            log::error!("Main: Failed to initialize platform layer: {e}");
            return failed_outcome(&e);
        }
    };
    match platform.run_request(request, None) {
        Ok(result) => DialogOutcome::from(result),
        Err(PlatformError::Dialog(e)) => {
            log::error!("Main: Dialog failed: {e}");
            DialogOutcome::from(&e)
        }
        Err(e) => {
            log::error!("Main: Dialog failed: {e}");
            failed_outcome(&e)
        }
    }
}

#[cfg(target_os = "windows")]
fn failed_outcome(err: &shell_dialogs::platform_layer::PlatformError) -> DialogOutcome {
    DialogOutcome::Failed {
        code: err.status().to_string(),
        message: err.to_string(),
    }
}

#[cfg(not(target_os = "windows"))]
fn run(request: &DialogRequest) -> DialogOutcome {
    log::error!(
        "Main: Cannot show {:?} dialog: the shell dialog service is only available on Windows.",
        request.kind
    );
    DialogOutcome::Failed {
        code: shell_dialogs::StatusCode(0x8000_4001).to_string(),
        message: "The native shell dialog service is not available on this platform".to_string(),
    }
}

fn main() -> ExitCode {
    let Some(request_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: shell_dialogs <request.json>");
        return ExitCode::FAILURE;
    };

    let request = match config::load_request(&request_path) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Failed to load dialog request {request_path:?}: {e}");
            return ExitCode::FAILURE;
        }
    };

    initialize_logging(request.log_level_filter());
    log::info!("Main: Running {:?} dialog from {request_path:?}.", request.kind);

    let outcome = run(&request);
    print_outcome(&outcome);
    match outcome {
        DialogOutcome::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
