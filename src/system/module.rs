//! Loaded module records and the source they are read from

use serde::Serialize;

use std::io;

use super::error::{InspectError, InspectResult};
use super::Pid;

/// Identifier of the System Idle Process, which has no modules
pub const IDLE_PID: Pid = 0;

/// Information about a loaded module/DLL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    /// Module name (e.g., "kernel32.dll")
    pub name: String,
    /// Full path to the module
    pub path: String,
    /// Base address in memory
    pub base_address: usize,
    /// Size of the mapped image in bytes
    pub size: u32,
}

impl ModuleRecord {
    /// Ordinal (byte-exact, case-sensitive) name comparison.
    pub fn name_is(&self, name: &str) -> bool {
        self.name.as_bytes() == name.as_bytes()
    }
}

/// Anything that can list the modules loaded in a process.
///
/// The returned iterator must produce records in the order the OS reports
/// them and fetch each one on demand. It owns whatever OS resource backs the
/// listing, so dropping it early releases that resource.
pub trait ModuleSource {
    /// Iterator over one process's modules.
    type Iter: Iterator<Item = ModuleRecord>;

    /// Starts a fresh listing for `pid`.
    fn modules(&self, pid: Pid) -> InspectResult<Self::Iter>;
}

/// Checks that `pid` names a process a module snapshot can describe.
///
/// The snapshot API reads 0 as "the calling process", so passing the Idle
/// process through would list the caller's own modules.
pub fn snapshot_target(pid: Pid) -> InspectResult<Pid> {
    if pid == IDLE_PID {
        return Err(InspectError::snapshot(pid, io::ErrorKind::InvalidInput.into()));
    }
    Ok(pid)
}

impl<S: ModuleSource + ?Sized> ModuleSource for &S {
    type Iter = S::Iter;

    fn modules(&self, pid: Pid) -> InspectResult<Self::Iter> {
        (**self).modules(pid)
    }
}
