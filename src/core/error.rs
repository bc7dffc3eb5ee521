use crate::core::status_code::StatusCode;

// Errors surfaced by a dialog invocation.
//
// A user cancelling the dialog is not an error and never appears here; see
// `DialogResult::Cancelled`. Cosmetic configuration failures (an initial
// directory that cannot be resolved) are logged and recovered locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The native layer returned a well-formed status code describing a real failure.
    Protocol {
        status: StatusCode,
        reason: ProtocolReason,
    },
    /// The native layer returned a status code that fails validity checks.
    ContractViolation { status: StatusCode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolReason {
    /// The dialog was driven through an interface pointer from the wrong
    /// apartment or entry point. This is a programming error, not a runtime condition.
    WrongInterface,
    /// Any other failure, with a diagnostic naming the operation.
    Unexpected(String),
}

impl DialogError {
    pub fn protocol(status: StatusCode, message: impl Into<String>) -> Self {
        DialogError::Protocol {
            status,
            reason: ProtocolReason::Unexpected(message.into()),
        }
    }

    /// A failed native call. `RPC_E_WRONG_THREAD` keeps its dedicated reason
    /// whichever call reported it.
    pub fn native_call_failed(status: StatusCode, operation: &str, detail: &str) -> Self {
        if status == StatusCode::RPC_E_WRONG_THREAD {
            return DialogError::Protocol {
                status,
                reason: ProtocolReason::WrongInterface,
            };
        }
        if detail.is_empty() {
            DialogError::protocol(status, operation)
        } else {
            DialogError::protocol(status, format!("{operation}: {detail}"))
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DialogError::Protocol { status, .. } => *status,
            DialogError::ContractViolation { status } => *status,
        }
    }

    pub fn is_wrong_interface(&self) -> bool {
        matches!(
            self,
            DialogError::Protocol {
                reason: ProtocolReason::WrongInterface,
                ..
            }
        )
    }
}

impl std::fmt::Display for DialogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogError::Protocol {
                status,
                reason: ProtocolReason::WrongInterface,
            } => write!(
                f,
                "Dialog called through the wrong interface (wrong thread or entry point), status {status}"
            ),
            DialogError::Protocol {
                status,
                reason: ProtocolReason::Unexpected(message),
            } => write!(f, "Dialog failed with status {status}: {message}"),
            DialogError::ContractViolation { status } => write!(
                f,
                "Dialog returned an invalid status code {status}; refusing to interpret the result"
            ),
        }
    }
}

impl std::error::Error for DialogError {}

/// A specialized `Result` type for dialog operations.
pub type Result<T> = std::result::Result<T, DialogError>;
