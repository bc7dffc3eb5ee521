/*
 * Abstractions over the native shell dialog service. The session and result
 * extraction logic are written against these traits; the Windows
 * implementation lives in `platform_layer::shell_dialog`, and tests supply
 * mock implementations.
 *
 * Native objects are reference-counted foreign resources. Implementations are
 * expected to release their reference in `Drop`, so ownership of a value of an
 * implementing type is ownership of exactly one native reference.
 */
use crate::core::error::Result;
use crate::core::filter_spec::PackedFilterBuffer;
use crate::core::status_code::StatusCode;
use bitflags::bitflags;

bitflags! {
    /// `FILEOPENDIALOGOPTIONS` bits used by this crate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DialogFlags: u32 {
        const OVERWRITE_PROMPT = 0x0000_0002;
        const PICK_FOLDERS = 0x0000_0020;
        const FORCE_FILESYSTEM = 0x0000_0040;
        const ALLOW_MULTI_SELECT = 0x0000_0200;
        const PATH_MUST_EXIST = 0x0000_0800;
        const NO_TEST_FILE_CREATE = 0x0001_0000;
    }
}

impl DialogFlags {
    /// Flags every dialog gets regardless of the requested operation.
    pub const MANDATORY: DialogFlags = DialogFlags::FORCE_FILESYSTEM
        .union(DialogFlags::PATH_MUST_EXIST)
        .union(DialogFlags::NO_TEST_FILE_CREATE);
}

impl Default for DialogFlags {
    fn default() -> Self {
        DialogFlags::empty()
    }
}

/// Raw value of the owner window handle. Zero is treated as "no owner".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentWindow(pub isize);

impl ParentWindow {
    pub fn from_raw(raw: isize) -> Option<Self> {
        if raw == 0 { None } else { Some(ParentWindow(raw)) }
    }
}

/// A single selected shell item.
pub trait NativeItem {
    /// Fully qualified, parse-capable display name, or `None` if the native
    /// call produces nothing.
    fn display_name(&self) -> Option<String>;
}

/// The ordered selection returned by an open or folder dialog.
pub trait NativeItemCollection {
    type Item: NativeItem;

    fn count(&self) -> Result<u32>;
    fn item_at(&self, index: u32) -> Result<Self::Item>;
}

/// Parses path strings into native folder references.
pub trait ShellItemResolver {
    type Folder;

    fn parse_folder(&self, path: &str) -> Result<Self::Folder>;
}

/// One native file dialog object (open or save).
pub trait NativeFileDialog {
    type Folder;
    type Item: NativeItem;
    type Items: NativeItemCollection;

    fn set_options(&self, flags: DialogFlags) -> Result<()>;
    fn set_title(&self, title: &str) -> Result<()>;
    fn set_file_name(&self, file_name: &str) -> Result<()>;
    fn set_folder(&self, folder: &Self::Folder) -> Result<()>;
    /// The buffer only needs to outlive this call.
    fn set_file_types(&self, filters: &PackedFilterBuffer) -> Result<()>;
    /// 1-based, as the native service expects.
    fn set_file_type_index(&self, one_based_index: u32) -> Result<()>;
    /// Blocks until the user dismisses the dialog.
    fn show(&self, parent: Option<ParentWindow>) -> StatusCode;
    fn get_result(&self) -> Result<Option<Self::Item>>;
    fn get_results(&self) -> Result<Self::Items>;
}

/*
 * Exclusive owner of one native dialog for the lifetime of one invocation.
 * `release` drops the native reference; calling it again, or dropping the
 * handle afterwards, does nothing.
 */
pub struct NativeDialogHandle<D> {
    dialog: Option<D>,
}

impl<D> NativeDialogHandle<D> {
    pub fn new(dialog: D) -> Self {
        NativeDialogHandle {
            dialog: Some(dialog),
        }
    }

    pub fn get(&self) -> Option<&D> {
        self.dialog.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.dialog.is_none()
    }

    pub fn release(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            drop(dialog);
            log::trace!("NativeDialogHandle: Released native dialog.");
        }
    }
}

impl<D> Drop for NativeDialogHandle<D> {
    fn drop(&mut self) {
        self.release();
    }
}
