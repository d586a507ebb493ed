//! Safe RAII wrappers for Windows HANDLEs and the COM apartment
//!
//! These wrappers ensure that OS resources are released when they go out
//! of scope, including when a lazy module listing is dropped half-way.

use windows::core::HRESULT;
use windows::Win32::Foundation::{CloseHandle, HANDLE, RPC_E_CHANGED_MODE};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_MULTITHREADED};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
};

/// A safe wrapper around a ToolHelp32 snapshot HANDLE.
/// Automatically closes the handle when dropped.
pub struct SnapshotHandle(HANDLE);

impl SnapshotHandle {
    /// Creates a snapshot of the modules loaded in one process.
    ///
    /// Both 64-bit and 32-bit (WOW64) modules are included.
    ///
    /// # Returns
    /// * `Ok(SnapshotHandle)` - A wrapped handle to the snapshot
    /// * `Err` - If the process is gone or cannot be read
    pub fn create_module_snapshot(pid: u32) -> windows::core::Result<Self> {
        // SAFETY: CreateToolhelp32Snapshot has no pointer arguments; failure
        // is reported through the Result.
        let handle = unsafe {
            CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)?
        };
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for SnapshotHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it's valid.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Keeps COM initialized on the current thread for its lifetime.
///
/// If the thread already runs COM in another apartment mode, that
/// apartment is reused and nothing is uninitialized on drop.
pub struct ComApartment {
    owned: bool,
}

impl ComApartment {
    /// Joins (or creates) the multithreaded apartment.
    pub fn enter() -> windows::core::Result<Self> {
        // SAFETY: No reserved pointer is passed; balanced by Drop.
        let hr: HRESULT = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            return Ok(Self { owned: false });
        }
        hr.ok()?;
        Ok(Self { owned: true })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: Pairs with the successful CoInitializeEx in `enter`.
            unsafe { CoUninitialize() };
        }
    }
}
