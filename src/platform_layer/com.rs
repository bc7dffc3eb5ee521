/*
 * Per-thread COM initialisation. The shell dialogs are apartment-threaded
 * objects, so the thread that creates and shows them must have entered a
 * single-threaded apartment first.
 */
use super::error::{PlatformError, Result as PlatformResult};
use crate::core::status_code::StatusCode;
use std::marker::PhantomData;
use windows::Win32::{
    Foundation::{RPC_E_CHANGED_MODE, S_FALSE},
    System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize},
};

/*
 * Keeps COM initialised on the current thread while alive. Only the guard
 * whose `CoInitializeEx` call actually succeeded balances it with
 * `CoUninitialize`; if the thread was already in an apartment (possibly a
 * multithreaded one owned by the host), the guard leaves it alone.
 */
pub struct ComApartment {
    owns_initialization: bool,
    // COM apartments are bound to the thread that entered them.
    _not_send: PhantomData<*const ()>,
}

impl ComApartment {
    pub fn enter() -> PlatformResult<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            log::warn!(
                "ComApartment: Thread is already in a multithreaded apartment; dialogs may fail."
            );
            return Ok(ComApartment {
                owns_initialization: false,
                _not_send: PhantomData,
            });
        }
        if hr.is_err() {
            log::error!("ComApartment: CoInitializeEx failed: {:?}", hr);
            return Err(PlatformError::ComInitialization(StatusCode::from_i32(hr.0)));
        }
        if hr == S_FALSE {
            log::debug!("ComApartment: COM already initialized on this thread.");
        }
        // S_FALSE also increments the init count and must be balanced.
        Ok(ComApartment {
            owns_initialization: true,
            _not_send: PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owns_initialization {
            unsafe { CoUninitialize() };
            log::trace!("ComApartment: CoUninitialize called.");
        }
    }
}
