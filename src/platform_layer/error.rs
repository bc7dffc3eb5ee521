use crate::core::error::DialogError;
use crate::core::status_code::StatusCode;
use windows::core::Error as WinError;

// Represents errors that can occur within the platform layer.
//
// Dialog failures keep their own type (`DialogError`); this enum adds the
// conditions that occur before any dialog exists, such as COM refusing to
// initialise on the calling thread.
#[derive(Debug, Clone)]
pub enum PlatformError {
    /// `CoInitializeEx` failed with the given status.
    ComInitialization(StatusCode),
    /// A dialog invocation failed.
    Dialog(DialogError),
}

impl PlatformError {
    pub fn status(&self) -> StatusCode {
        match self {
            PlatformError::ComInitialization(status) => *status,
            PlatformError::Dialog(e) => e.status(),
        }
    }
}

impl From<DialogError> for PlatformError {
    fn from(err: DialogError) -> Self {
        PlatformError::Dialog(err)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::ComInitialization(status) => {
                write!(f, "COM initialization failed with status {status}")
            }
            PlatformError::Dialog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Dialog(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Converts the `windows` crate's result for `operation` into a dialog result.
pub(crate) fn native_call<T>(
    operation: &str,
    result: windows::core::Result<T>,
) -> crate::core::error::Result<T> {
    result.map_err(|e| {
        let status = StatusCode::from_i32(e.code().0);
        let err = DialogError::native_call_failed(status, operation, e.message().trim());
        log::debug!("PlatformLayer: {err}");
        err
    })
}

impl From<WinError> for DialogError {
    fn from(err: WinError) -> Self {
        DialogError::native_call_failed(
            StatusCode::from_i32(err.code().0),
            "native call",
            err.message().trim(),
        )
    }
}
