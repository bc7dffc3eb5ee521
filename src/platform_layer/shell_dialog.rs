/*
 * COM-backed implementations of the traits in `core::native`, built on the
 * Common Item Dialog (`IFileOpenDialog` / `IFileSaveDialog`). Every wrapper
 * owns one interface reference, which the `windows` crate releases when the
 * wrapper is dropped.
 */
use super::error::native_call;
use crate::core::dialog_session::DialogKind;
use crate::core::error::{DialogError, Result};
use crate::core::file_dialogs::NativeDialogFactory;
use crate::core::filter_spec::PackedFilterBuffer;
use crate::core::native::{
    DialogFlags, NativeFileDialog, NativeItem, NativeItemCollection, ParentWindow,
    ShellItemResolver,
};
use crate::core::status_code::StatusCode;

use std::ffi::c_void;

use windows::{
    Win32::{
        Foundation::{E_NOINTERFACE, HWND},
        System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance, CoTaskMemFree},
        UI::Shell::{
            Common::COMDLG_FILTERSPEC, FILEOPENDIALOGOPTIONS, FileOpenDialog, FileSaveDialog,
            IFileDialog, IFileOpenDialog, IShellItem, IShellItemArray,
            SHCreateItemFromParsingName, SIGDN_DESKTOPABSOLUTEPARSING,
        },
    },
    core::{HSTRING, Interface, PCWSTR},
};

/// A shell item returned as (part of) the dialog's result.
pub struct ShellItem(IShellItem);

impl NativeItem for ShellItem {
    fn display_name(&self) -> Option<String> {
        unsafe {
            match self.0.GetDisplayName(SIGDN_DESKTOPABSOLUTEPARSING) {
                Ok(pwstr) => {
                    let name = pwstr.to_string();
                    CoTaskMemFree(Some(pwstr.as_ptr() as *const c_void));
                    match name {
                        Ok(name) => Some(name),
                        Err(e) => {
                            log::warn!("ShellDialog: Display name is not valid UTF-16: {e}");
                            None
                        }
                    }
                }
                Err(e) => {
                    log::debug!("ShellDialog: IShellItem::GetDisplayName failed: {:?}", e);
                    None
                }
            }
        }
    }
}

pub struct ShellItemArray(IShellItemArray);

impl NativeItemCollection for ShellItemArray {
    type Item = ShellItem;

    fn count(&self) -> Result<u32> {
        native_call("IShellItemArray::GetCount", unsafe { self.0.GetCount() })
    }

    fn item_at(&self, index: u32) -> Result<ShellItem> {
        native_call("IShellItemArray::GetItemAt", unsafe {
            self.0.GetItemAt(index)
        })
        .map(ShellItem)
    }
}

/// A folder reference used as the dialog's initial location.
pub struct ShellFolder(IShellItem);

#[derive(Debug, Default)]
pub struct ShellFolderResolver;

impl ShellItemResolver for ShellFolderResolver {
    type Folder = ShellFolder;

    fn parse_folder(&self, path: &str) -> Result<ShellFolder> {
        let path_hstring = HSTRING::from(path);
        native_call("SHCreateItemFromParsingName", unsafe {
            SHCreateItemFromParsingName::<_, _, IShellItem>(&path_hstring, None)
        })
        .map(ShellFolder)
    }
}

/*
 * One Common Item Dialog. `dialog` is the shared `IFileDialog` view used for
 * configuration and `Show`; `open_dialog` is present only for open and
 * folder dialogs, which are the only ones that can return several items.
 */
pub struct ShellFileDialog {
    dialog: IFileDialog,
    open_dialog: Option<IFileOpenDialog>,
}

impl ShellFileDialog {
    pub fn create(kind: DialogKind) -> Result<Self> {
        if kind.uses_save_dialog() {
            let dialog: IFileDialog = native_call("CoCreateInstance(FileSaveDialog)", unsafe {
                CoCreateInstance(&FileSaveDialog, None, CLSCTX_INPROC_SERVER)
            })?;
            return Ok(ShellFileDialog {
                dialog,
                open_dialog: None,
            });
        }
        let open_dialog: IFileOpenDialog =
            native_call("CoCreateInstance(FileOpenDialog)", unsafe {
                CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER)
            })?;
        let dialog: IFileDialog = native_call("IFileOpenDialog::QueryInterface", open_dialog.cast())?;
        Ok(ShellFileDialog {
            dialog,
            open_dialog: Some(open_dialog),
        })
    }
}

impl NativeFileDialog for ShellFileDialog {
    type Folder = ShellFolder;
    type Item = ShellItem;
    type Items = ShellItemArray;

    fn set_options(&self, flags: DialogFlags) -> Result<()> {
        native_call("IFileDialog::SetOptions", unsafe {
            self.dialog.SetOptions(FILEOPENDIALOGOPTIONS(flags.bits()))
        })
    }

    fn set_title(&self, title: &str) -> Result<()> {
        let h_title = HSTRING::from(title);
        native_call("IFileDialog::SetTitle", unsafe {
            self.dialog.SetTitle(&h_title)
        })
    }

    fn set_file_name(&self, file_name: &str) -> Result<()> {
        let h_name = HSTRING::from(file_name);
        native_call("IFileDialog::SetFileName", unsafe {
            self.dialog.SetFileName(&h_name)
        })
    }

    fn set_folder(&self, folder: &ShellFolder) -> Result<()> {
        native_call("IFileDialog::SetFolder", unsafe {
            self.dialog.SetFolder(&folder.0)
        })
    }

    fn set_file_types(&self, filters: &PackedFilterBuffer) -> Result<()> {
        // The dialog copies the strings during the call; the pointers only
        // need to stay valid until it returns.
        let specs: Vec<COMDLG_FILTERSPEC> = filters
            .entries()
            .iter()
            .map(|entry| COMDLG_FILTERSPEC {
                pszName: PCWSTR(filters.ptr_at(entry.name_offset)),
                pszSpec: PCWSTR(filters.ptr_at(entry.spec_offset)),
            })
            .collect();
        native_call("IFileDialog::SetFileTypes", unsafe {
            self.dialog.SetFileTypes(&specs)
        })
    }

    fn set_file_type_index(&self, one_based_index: u32) -> Result<()> {
        native_call("IFileDialog::SetFileTypeIndex", unsafe {
            self.dialog.SetFileTypeIndex(one_based_index)
        })
    }

    fn show(&self, parent: Option<ParentWindow>) -> StatusCode {
        let owner = parent.map(|p| HWND(p.0 as *mut c_void));
        // The `windows` wrapper returns `Result<()>` and folds every
        // non-negative HRESULT (S_FALSE included) into `Ok`, so the exact
        // success code is not observable here and is reported as S_OK.
        match unsafe { self.dialog.Show(owner) } {
            Ok(()) => StatusCode::OK,
            Err(e) => StatusCode::from_i32(e.code().0),
        }
    }

    fn get_result(&self) -> Result<Option<ShellItem>> {
        native_call("IFileDialog::GetResult", unsafe { self.dialog.GetResult() })
            .map(|item| Some(ShellItem(item)))
    }

    fn get_results(&self) -> Result<ShellItemArray> {
        let Some(open_dialog) = &self.open_dialog else {
            return Err(DialogError::protocol(
                StatusCode::from_i32(E_NOINTERFACE.0),
                "IFileOpenDialog::GetResults called on a save dialog",
            ));
        };
        native_call("IFileOpenDialog::GetResults", unsafe {
            open_dialog.GetResults()
        })
        .map(ShellItemArray)
    }
}

/// Creates Common Item Dialogs on the calling thread.
#[derive(Debug, Default)]
pub struct ShellDialogFactory {
    resolver: ShellFolderResolver,
}

impl ShellDialogFactory {
    pub fn new() -> Self {
        ShellDialogFactory::default()
    }
}

impl NativeDialogFactory for ShellDialogFactory {
    type Folder = ShellFolder;
    type Dialog = ShellFileDialog;
    type Resolver = ShellFolderResolver;

    fn create_dialog(&self, kind: DialogKind) -> Result<ShellFileDialog> {
        log::trace!("ShellDialog: Creating native dialog for {kind:?}.");
        ShellFileDialog::create(kind)
    }

    fn resolver(&self) -> &ShellFolderResolver {
        &self.resolver
    }
}
