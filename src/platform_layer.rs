/*
 * The Windows implementation of the native dialog traits. `shell_dialog`
 * wraps the Common Item Dialog COM objects, `com` manages the thread's COM
 * apartment, and `app::PlatformInterface` ties them together into the
 * caller-facing open, save and browse operations.
 */
pub mod app;
pub mod com;
pub mod error;
pub mod shell_dialog;

pub use app::PlatformInterface;
pub use error::{PlatformError, Result as PlatformResult};
pub use shell_dialog::ShellDialogFactory;
