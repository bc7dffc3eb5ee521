/*
 * This module consolidates the platform-agnostic logic of the crate: status
 * code classification (`status_code`), filter validation and packing
 * (`filter`, `filter_spec`), the dialog session state machine
 * (`dialog_session`), extraction of selected paths (`result_extractor`), the
 * caller-facing open/save/browse operations (`file_dialogs`), and request and
 * state persistence (`config`). Native objects are reached only through the
 * traits in `native`, so everything here is testable without a desktop.
 * Unit tests for the session and operations are in `dialog_session_tests.rs`.
 */
pub mod config;
pub mod dialog_session;
pub mod error;
pub mod file_dialogs;
pub mod filter;
pub mod filter_spec;
pub mod native;
pub mod path_utils;
pub mod result_extractor;
pub mod status_code;


pub use config::{
    ConfigError, ConfigManagerOperations, CoreConfigManager, DialogOutcome, DialogRequest,
};
pub use dialog_session::{DialogKind, DialogOptions, DialogResult, DialogSession, SessionState};
pub use error::{DialogError, ProtocolReason};
pub use file_dialogs::{
    NativeDialogFactory, browse_for_folder, open_file, open_files, run_request, save_file,
};
pub use filter::{Filter, FilterError};
pub use filter_spec::PackedFilterBuffer;
pub use native::{DialogFlags, NativeDialogHandle, ParentWindow};
pub use status_code::{Customer, Facility, Severity, StatusCode};
