use super::com::ComApartment;
use super::error::Result as PlatformResult;
use super::shell_dialog::ShellDialogFactory;

use crate::core::config::{ConfigManagerOperations, CoreConfigManager, DialogRequest};
use crate::core::dialog_session::{DialogOptions, DialogResult};
use crate::core::file_dialogs;
use crate::core::native::ParentWindow;

/*
 * The entry point for showing shell dialogs on Windows. Creating a
 * `PlatformInterface` enters a single-threaded COM apartment on the calling
 * thread, which stays active until the interface is dropped. All dialogs must
 * be shown from that same thread; the type is deliberately not `Send`.
 *
 * Each call creates its own native dialog, so a `PlatformInterface` can be
 * reused for any number of sequential dialogs.
 */
pub struct PlatformInterface {
    app_name: String,
    factory: ShellDialogFactory,
    config_manager: Box<dyn ConfigManagerOperations>,
    _apartment: ComApartment,
}

impl PlatformInterface {
    /*
     * Initialises COM for the current thread. `app_name` names the local
     * configuration directory used to remember the last dialog directory.
     */
    pub fn new(app_name: String) -> PlatformResult<Self> {
        Self::with_config_manager(app_name, Box::new(CoreConfigManager::new()))
    }

    pub fn with_config_manager(
        app_name: String,
        config_manager: Box<dyn ConfigManagerOperations>,
    ) -> PlatformResult<Self> {
        let apartment = ComApartment::enter()?;
        log::debug!("Platform: Initialized for application {app_name:?}.");
        Ok(PlatformInterface {
            app_name,
            factory: ShellDialogFactory::new(),
            config_manager,
            _apartment: apartment,
        })
    }

    pub fn open_file(
        &self,
        parent: Option<ParentWindow>,
        options: &DialogOptions,
    ) -> PlatformResult<DialogResult<String>> {
        Ok(file_dialogs::open_file(&self.factory, parent, options)?)
    }

    pub fn open_files(
        &self,
        parent: Option<ParentWindow>,
        options: &DialogOptions,
    ) -> PlatformResult<DialogResult<Vec<String>>> {
        Ok(file_dialogs::open_files(&self.factory, parent, options)?)
    }

    pub fn save_file(
        &self,
        parent: Option<ParentWindow>,
        options: &DialogOptions,
    ) -> PlatformResult<DialogResult<String>> {
        Ok(file_dialogs::save_file(&self.factory, parent, options)?)
    }

    pub fn browse_for_folder(
        &self,
        parent: Option<ParentWindow>,
        options: &DialogOptions,
    ) -> PlatformResult<DialogResult<String>> {
        Ok(file_dialogs::browse_for_folder(
            &self.factory,
            parent,
            options,
        )?)
    }

    /// Runs a request, remembering the chosen directory if it asks for that.
    pub fn run_request(
        &self,
        request: &DialogRequest,
        parent: Option<ParentWindow>,
    ) -> PlatformResult<DialogResult> {
        Ok(file_dialogs::run_request(
            &self.factory,
            self.config_manager.as_ref(),
            &self.app_name,
            request,
            parent,
        )?)
    }
}
