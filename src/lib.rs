/*
 * Wrappers around the Windows Shell common item dialogs (open file, save file,
 * browse for folder) that return plain path strings. The platform-agnostic
 * logic lives in `core`; the COM-backed implementation of the native traits
 * lives in `platform_layer` and is only built on Windows.
 */
pub mod core;

#[cfg(target_os = "windows")]
pub mod platform_layer;

pub use crate::core::{
    DialogError, DialogKind, DialogOptions, DialogOutcome, DialogRequest, DialogResult, Filter,
    FilterError, ParentWindow, StatusCode,
};
