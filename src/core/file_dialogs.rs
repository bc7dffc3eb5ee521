/*
 * The caller-facing operations: open (single or multiple), save and browse
 * for folder. Each call creates its own native dialog through a
 * `NativeDialogFactory`, runs one `DialogSession`, and returns either the
 * selection or an explicit `DialogResult::Cancelled`.
 *
 * A successful dialog that yields no paths is reported as cancelled. The
 * native service is not documented to do this, so the mapping is kept in one
 * place (`collapse_empty`).
 */
use crate::core::config::{ConfigManagerOperations, DialogRequest};
use crate::core::dialog_session::{self, DialogKind, DialogOptions, DialogResult};
use crate::core::error::Result;
use crate::core::native::{NativeFileDialog, ParentWindow, ShellItemResolver};
use crate::core::path_utils;
use std::path::Path;

/// Creates native dialog objects and resolves folder paths for them.
pub trait NativeDialogFactory {
    type Folder;
    type Dialog: NativeFileDialog<Folder = Self::Folder>;
    type Resolver: ShellItemResolver<Folder = Self::Folder>;

    /// A fresh, unshared dialog object for `kind`.
    fn create_dialog(&self, kind: DialogKind) -> Result<Self::Dialog>;
    fn resolver(&self) -> &Self::Resolver;
}

/// Runs one dialog of `kind` and returns every selected path.
pub fn show_dialog<F: NativeDialogFactory>(
    factory: &F,
    kind: DialogKind,
    parent: Option<ParentWindow>,
    options: &DialogOptions,
) -> Result<DialogResult> {
    log::debug!(
        "FileDialogs: Showing {kind:?} dialog. Title: {:?}, Initial Dir: {:?}, Filters: {}",
        options.title,
        options.initial_directory,
        options.filters.len()
    );
    let dialog = factory.create_dialog(kind)?;
    let result = dialog_session::run_session(dialog, factory.resolver(), kind, options, parent)?;
    Ok(collapse_empty(result))
}

fn collapse_empty(result: DialogResult) -> DialogResult {
    match result {
        DialogResult::Selected(paths) if paths.is_empty() => {
            log::debug!("FileDialogs: Dialog accepted with no items; treating as cancelled.");
            DialogResult::Cancelled
        }
        other => other,
    }
}

fn first_path(result: DialogResult) -> DialogResult<String> {
    match result {
        DialogResult::Selected(paths) => paths
            .into_iter()
            .next()
            .map_or(DialogResult::Cancelled, DialogResult::Selected),
        DialogResult::Cancelled => DialogResult::Cancelled,
    }
}

pub fn open_file<F: NativeDialogFactory>(
    factory: &F,
    parent: Option<ParentWindow>,
    options: &DialogOptions,
) -> Result<DialogResult<String>> {
    show_dialog(factory, DialogKind::Open, parent, options).map(first_path)
}

pub fn open_files<F: NativeDialogFactory>(
    factory: &F,
    parent: Option<ParentWindow>,
    options: &DialogOptions,
) -> Result<DialogResult<Vec<String>>> {
    show_dialog(factory, DialogKind::OpenMultiple, parent, options)
}

pub fn save_file<F: NativeDialogFactory>(
    factory: &F,
    parent: Option<ParentWindow>,
    options: &DialogOptions,
) -> Result<DialogResult<String>> {
    show_dialog(factory, DialogKind::Save, parent, options).map(first_path)
}

/// Filters and the default filter index in `options` are ignored.
pub fn browse_for_folder<F: NativeDialogFactory>(
    factory: &F,
    parent: Option<ParentWindow>,
    options: &DialogOptions,
) -> Result<DialogResult<String>> {
    show_dialog(factory, DialogKind::Folder, parent, options).map(first_path)
}

/*
 * Runs the dialog described by `request`. When the request asks for it, the
 * last remembered directory is used as the initial directory (unless the
 * request names one), and the directory of the new selection is remembered.
 * Failures to load or store that state are logged and never fail the dialog.
 */
pub fn run_request<F, C>(
    factory: &F,
    config: &C,
    app_name: &str,
    request: &DialogRequest,
    parent: Option<ParentWindow>,
) -> Result<DialogResult>
where
    F: NativeDialogFactory,
    C: ConfigManagerOperations + ?Sized,
{
    let mut options = request.to_options();

    if request.remember_directory && options.initial_directory.is_none() {
        match config.load_last_directory(app_name) {
            Ok(Some(directory)) => {
                options.initial_directory = Some(directory.to_string_lossy().into_owned());
            }
            Ok(None) => {}
            Err(e) => log::warn!("FileDialogs: Could not load last directory: {e}"),
        }
    }

    let result = match request.kind {
        DialogKind::Open => open_file(factory, parent, &options)?.map(|path| vec![path]),
        DialogKind::OpenMultiple => open_files(factory, parent, &options)?,
        DialogKind::Save => save_file(factory, parent, &options)?.map(|path| vec![path]),
        DialogKind::Folder => browse_for_folder(factory, parent, &options)?.map(|path| vec![path]),
    };

    if request.remember_directory {
        if let DialogResult::Selected(paths) = &result {
            remember_directory(config, app_name, request.kind, paths);
        }
    }
    Ok(result)
}

fn remember_directory<C: ConfigManagerOperations + ?Sized>(
    config: &C,
    app_name: &str,
    kind: DialogKind,
    paths: &[String],
) {
    let Some(first) = paths.first() else {
        return;
    };
    let Some(directory) = path_utils::directory_to_remember(kind == DialogKind::Folder, first)
    else {
        return;
    };
    if let Err(e) = config.save_last_directory(app_name, Some(Path::new(&directory))) {
        log::warn!("FileDialogs: Could not remember directory {directory:?}: {e}");
    }
}
