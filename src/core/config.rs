/*
 * Configuration for dialog invocations. A `DialogRequest` describes one dialog
 * (kind, title, initial directory, filters, ...) and is loaded from a JSON
 * file; a `DialogOutcome` is the serializable answer. Between invocations the
 * crate remembers the last directory the user picked from, persisted as JSON
 * in the application's local configuration directory.
 *
 * Persistence goes through the `ConfigManagerOperations` trait so the dialog
 * runner can be tested against an in-memory or temp-dir implementation.
 */
use crate::core::dialog_session::{DialogKind, DialogOptions, DialogResult};
use crate::core::error::DialogError;
use crate::core::filter::Filter;
use crate::core::path_utils;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DIALOG_STATE_FILENAME: &str = "dialog_state.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "Configuration JSON error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_remember_directory() -> bool {
    true
}

/// One dialog invocation, as read from a request file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub kind: DialogKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub initial_directory: Option<String>,
    #[serde(default)]
    pub default_file_name: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub default_filter_index: Option<usize>,
    #[serde(default = "default_remember_directory")]
    pub remember_directory: bool,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl DialogRequest {
    pub fn new(kind: DialogKind) -> Self {
        DialogRequest {
            kind,
            title: None,
            initial_directory: None,
            default_file_name: None,
            filters: Vec::new(),
            default_filter_index: None,
            remember_directory: true,
            log_level: None,
        }
    }

    pub fn to_options(&self) -> DialogOptions {
        DialogOptions {
            title: self.title.clone(),
            initial_directory: self.initial_directory.clone(),
            default_file_name: self.default_file_name.clone(),
            filters: self.filters.clone(),
            default_filter_index: self.default_filter_index,
            ..DialogOptions::default()
        }
    }

    /// `Info` unless the request names a valid level.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| LevelFilter::from_str(level.trim()).ok())
            .unwrap_or(LevelFilter::Info)
    }
}

/// Reads and validates a request file. Filters are validated while parsing.
pub fn load_request(path: &Path) -> Result<DialogRequest> {
    log::trace!("Config: Loading dialog request from {path:?}");
    let file = File::open(path)?;
    let request: DialogRequest = serde_json::from_reader(BufReader::new(file))?;
    Ok(request)
}

/// The serializable answer to a `DialogRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DialogOutcome {
    Selected { paths: Vec<String> },
    Cancelled,
    Failed { code: String, message: String },
}

impl From<DialogResult> for DialogOutcome {
    fn from(result: DialogResult) -> Self {
        match result {
            DialogResult::Selected(paths) => DialogOutcome::Selected { paths },
            DialogResult::Cancelled => DialogOutcome::Cancelled,
        }
    }
}

impl From<&DialogError> for DialogOutcome {
    fn from(err: &DialogError) -> Self {
        DialogOutcome::Failed {
            code: err.status().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DialogState {
    #[serde(default)]
    last_directory: Option<PathBuf>,
}

pub trait ConfigManagerOperations {
    fn load_last_directory(&self, app_name: &str) -> Result<Option<PathBuf>>;
    fn save_last_directory(&self, app_name: &str, directory: Option<&Path>) -> Result<()>;
}

/// Stores dialog state under the platform's local config directory.
pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }

    fn state_file(&self, app_name: &str) -> Result<PathBuf> {
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        Ok(config_dir.join(DIALOG_STATE_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_state(file_path: &Path) -> Result<DialogState> {
    if !file_path.exists() {
        log::debug!("Config: Dialog state file {file_path:?} does not exist.");
        return Ok(DialogState::default());
    }
    let file = File::open(file_path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_state(file_path: &Path, state: &DialogState) -> Result<()> {
    let mut writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(&mut writer, state)?;
    writer.flush()?;
    Ok(())
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_last_directory(&self, app_name: &str) -> Result<Option<PathBuf>> {
        let file_path = self.state_file(app_name)?;
        let state = read_state(&file_path)?;
        log::debug!(
            "Config: Loaded last directory {:?} from {file_path:?}.",
            state.last_directory
        );
        Ok(state.last_directory)
    }

    fn save_last_directory(&self, app_name: &str, directory: Option<&Path>) -> Result<()> {
        let file_path = self.state_file(app_name)?;
        let state = DialogState {
            last_directory: directory.map(Path::to_path_buf),
        };
        write_state(&file_path, &state)?;
        log::debug!("Config: Saved last directory {directory:?} to {file_path:?}.");
        Ok(())
    }
}
