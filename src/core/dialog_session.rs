/*
 * Drives one native dialog object through a single invocation:
 *
 *   Created -> Configured -> Succeeded | Cancelled | Failed -> Released
 *
 * The session owns the dialog through a `NativeDialogHandle`, so the native
 * reference is released exactly once whether the invocation succeeds, is
 * cancelled, fails part-way through configuration, or the session is simply
 * dropped. The status code returned by the modal call is classified with
 * `StatusCode` and never taken at face value: an invalid code is a contract
 * violation, not a cancellation.
 *
 * Unit tests for the session live in `dialog_session_tests.rs`.
 */
use crate::core::error::{DialogError, ProtocolReason, Result};
use crate::core::filter::Filter;
use crate::core::filter_spec;
use crate::core::native::{
    DialogFlags, NativeDialogHandle, NativeFileDialog, ParentWindow, ShellItemResolver,
};
use crate::core::result_extractor;
use crate::core::status_code::{ERROR_CANCELLED, ERROR_SUCCESS, Facility, StatusCode};
use serde::{Deserialize, Serialize};

/// `E_UNEXPECTED`, used when the session is driven out of order.
const E_UNEXPECTED: StatusCode = StatusCode(0x8000_FFFF);

/// The concrete operation a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Open,
    OpenMultiple,
    Save,
    Folder,
}

impl DialogKind {
    /// Flags specific to this operation, on top of `DialogFlags::MANDATORY`.
    pub fn operation_flags(self) -> DialogFlags {
        match self {
            DialogKind::Open => DialogFlags::empty(),
            DialogKind::OpenMultiple => DialogFlags::ALLOW_MULTI_SELECT,
            DialogKind::Save => DialogFlags::OVERWRITE_PROMPT,
            DialogKind::Folder => DialogFlags::PICK_FOLDERS,
        }
    }

    pub fn uses_save_dialog(self) -> bool {
        self == DialogKind::Save
    }

    pub fn accepts_filters(self) -> bool {
        self != DialogKind::Folder
    }
}

/// Caller-supplied configuration for one dialog invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub initial_directory: Option<String>,
    pub default_file_name: Option<String>,
    pub filters: Vec<Filter>,
    /// 0-based index into `filters`. Out-of-range values are ignored.
    pub default_filter_index: Option<usize>,
    pub extra_flags: DialogFlags,
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn initial_directory(mut self, directory: impl Into<String>) -> Self {
        self.initial_directory = Some(directory.into());
        self
    }

    pub fn default_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.default_file_name = Some(file_name.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn default_filter_index(mut self, index: usize) -> Self {
        self.default_filter_index = Some(index);
        self
    }

    pub fn extra_flags(mut self, flags: DialogFlags) -> Self {
        self.extra_flags |= flags;
        self
    }
}

/// Outcome of a dialog the user dismissed. Errors travel separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult<T = Vec<String>> {
    Selected(T),
    Cancelled,
}

impl<T> DialogResult<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogResult::Cancelled)
    }

    pub fn selected(self) -> Option<T> {
        match self {
            DialogResult::Selected(value) => Some(value),
            DialogResult::Cancelled => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> DialogResult<U> {
        match self {
            DialogResult::Selected(value) => DialogResult::Selected(f(value)),
            DialogResult::Cancelled => DialogResult::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Configured,
    Succeeded,
    Cancelled,
    Failed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Accepted,
    Cancelled,
}

/*
 * Interprets the status returned by the modal show call. Accepted only for a
 * recognisable success, cancelled only for the Win32 cancel code. The
 * wrong-interface RPC failure is reported with its own reason; every other
 * status, including an invalid one, is an error.
 */
pub fn classify_show_status(status: StatusCode) -> Result<ShowOutcome> {
    if !status.is_valid() {
        return Err(DialogError::ContractViolation { status });
    }
    if status == StatusCode::RPC_E_WRONG_THREAD {
        return Err(DialogError::Protocol {
            status,
            reason: ProtocolReason::WrongInterface,
        });
    }

    let (is_legacy, legacy_code) = status.try_get_legacy_error_code();
    if is_legacy {
        match legacy_code {
            ERROR_SUCCESS if status.is_success() => return Ok(ShowOutcome::Accepted),
            // Only HRESULT_FROM_WIN32(ERROR_CANCELLED); the same low word under
            // another facility or with success severity is not a cancel.
            ERROR_CANCELLED
                if status.facility() == Facility::Win32 && !status.is_success() =>
            {
                return Ok(ShowOutcome::Cancelled);
            }
            _ => {}
        }
    }

    Err(DialogError::protocol(
        status,
        format!(
            "unexpected status from IModalWindow::Show (severity {:?}, facility {:?}, code {})",
            status.severity(),
            status.facility(),
            status.code()
        ),
    ))
}

pub struct DialogSession<'r, D, R> {
    handle: NativeDialogHandle<D>,
    resolver: &'r R,
    kind: DialogKind,
    state: SessionState,
}

impl<'r, D, R> DialogSession<'r, D, R>
where
    D: NativeFileDialog,
    R: ShellItemResolver<Folder = D::Folder>,
{
    pub fn new(dialog: D, resolver: &'r R, kind: DialogKind) -> Self {
        log::trace!("DialogSession: Created {kind:?} session.");
        DialogSession {
            handle: NativeDialogHandle::new(dialog),
            resolver,
            kind,
            state: SessionState::Created,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    /*
     * Applies flags, title, initial folder, default file name and filters. A
     * failure to resolve or apply the initial folder is logged and ignored so
     * the dialog still appears; any other native failure fails the session
     * and releases the dialog.
     */
    pub fn configure(&mut self, options: &DialogOptions) -> Result<()> {
        if self.state != SessionState::Created {
            return Err(self.out_of_order("configure"));
        }
        match self.apply_configuration(options) {
            Ok(()) => {
                self.state = SessionState::Configured;
                Ok(())
            }
            Err(e) => {
                log::error!("DialogSession: Configuration failed: {e}");
                self.finish(SessionState::Failed);
                Err(e)
            }
        }
    }

    fn apply_configuration(&self, options: &DialogOptions) -> Result<()> {
        let dialog = self
            .handle
            .get()
            .ok_or_else(|| self.out_of_order("configure"))?;

        let flags = DialogFlags::MANDATORY | self.kind.operation_flags() | options.extra_flags;
        log::debug!("DialogSession: Setting options {flags:?}.");
        dialog.set_options(flags)?;

        if let Some(title) = &options.title {
            dialog.set_title(title)?;
        }

        if let Some(directory) = &options.initial_directory {
            self.apply_initial_directory(dialog, directory);
        }

        if let Some(file_name) = &options.default_file_name {
            dialog.set_file_name(file_name)?;
        }

        if self.kind.accepts_filters() {
            self.apply_filters(dialog, options)?;
        } else if !options.filters.is_empty() {
            log::debug!("DialogSession: Ignoring filters for {:?} dialog.", self.kind);
        }
        Ok(())
    }

    fn apply_initial_directory(&self, dialog: &D, directory: &str) {
        match self.resolver.parse_folder(directory) {
            Ok(folder) => {
                if let Err(e) = dialog.set_folder(&folder) {
                    log::warn!(
                        "DialogSession: Could not set initial folder {directory:?}, opening without it: {e}"
                    );
                }
            }
            Err(e) => {
                log::warn!(
                    "DialogSession: Could not resolve initial folder {directory:?}, opening without it: {e}"
                );
            }
        }
    }

    fn apply_filters(&self, dialog: &D, options: &DialogOptions) -> Result<()> {
        // The packed buffer lives only for this block; the native call copies it.
        let Some(buffer) = filter_spec::encode(&options.filters) else {
            return Ok(());
        };
        dialog.set_file_types(&buffer)?;

        if let Some(index) = options.default_filter_index {
            if index < buffer.len() {
                dialog.set_file_type_index(index as u32 + 1)?;
            } else {
                log::debug!(
                    "DialogSession: Default filter index {index} out of range for {} filters; ignored.",
                    buffer.len()
                );
            }
        }
        Ok(())
    }

    /*
     * Shows the dialog modally and interprets the result. The dialog is
     * released before this returns, whatever the outcome.
     */
    pub fn show(&mut self, parent: Option<ParentWindow>) -> Result<DialogResult> {
        if self.state != SessionState::Configured {
            let err = self.out_of_order("show");
            self.finish(SessionState::Failed);
            return Err(err);
        }

        let result = self.show_and_extract(parent);
        match &result {
            Ok(DialogResult::Selected(paths)) => {
                log::debug!("DialogSession: User selected {} item(s).", paths.len());
                self.finish(SessionState::Succeeded);
            }
            Ok(DialogResult::Cancelled) => {
                log::debug!("DialogSession: User cancelled the dialog.");
                self.finish(SessionState::Cancelled);
            }
            Err(e) => {
                log::error!("DialogSession: Show failed: {e}");
                self.finish(SessionState::Failed);
            }
        }
        result
    }

    fn show_and_extract(&self, parent: Option<ParentWindow>) -> Result<DialogResult> {
        let dialog = self
            .handle
            .get()
            .ok_or_else(|| self.out_of_order("show"))?;

        let status = dialog.show(parent);
        log::trace!("DialogSession: Show returned {status}.");

        match classify_show_status(status)? {
            ShowOutcome::Cancelled => Ok(DialogResult::Cancelled),
            ShowOutcome::Accepted if self.kind.uses_save_dialog() => {
                let paths = result_extractor::extract_one(dialog.get_result()?)
                    .into_iter()
                    .collect();
                Ok(DialogResult::Selected(paths))
            }
            ShowOutcome::Accepted => {
                let items = dialog.get_results()?;
                Ok(DialogResult::Selected(result_extractor::extract_all(&items)?))
            }
        }
    }

    /// Releases the native dialog. Safe to call more than once.
    pub fn release(&mut self) {
        self.handle.release();
        self.state = SessionState::Released;
    }

    // Records the terminal outcome, then releases. `state` reports the
    // outcome until `release` is called explicitly.
    fn finish(&mut self, outcome: SessionState) {
        self.handle.release();
        self.state = outcome;
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }

    fn out_of_order(&self, operation: &str) -> DialogError {
        DialogError::protocol(
            E_UNEXPECTED,
            format!(
                "DialogSession::{operation} called in state {:?}",
                self.state
            ),
        )
    }
}

/// Creates, configures, shows and releases a session in one call.
pub fn run_session<D, R>(
    dialog: D,
    resolver: &R,
    kind: DialogKind,
    options: &DialogOptions,
    parent: Option<ParentWindow>,
) -> Result<DialogResult>
where
    D: NativeFileDialog,
    R: ShellItemResolver<Folder = D::Folder>,
{
    let mut session = DialogSession::new(dialog, resolver, kind);
    session.configure(options)?;
    session.show(parent)
}
