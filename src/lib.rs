//! Process inspector
//!
//! Small utilities for looking into running Windows processes:
//!
//! - the full command line a process was launched with, read from WMI
//!   (`Win32_Process.CommandLine`);
//! - the first loaded module with an exact (ordinal) name;
//! - a lazy, predicate-filtered walk over the loaded module list.
//!
//! The free functions below use the live OS. `Inspector` accepts any
//! `CommandLineProvider` and `ModuleSource`, which is how the search logic
//! is tested without a Windows host.

pub mod constants;
#[cfg(windows)]
mod ffi;
pub mod system;

pub use system::command_line::CommandLineProvider;
pub use system::error::{CommandLineError, CommandLineResult, InspectError, InspectResult};
pub use system::inspector::Inspector;
pub use system::module::{ModuleRecord, ModuleSource};
pub use system::search::{FilteredModules, TryFilteredModules};
pub use system::Pid;

#[cfg(windows)]
pub use native::*;

#[cfg(windows)]
mod native {
    pub use crate::system::inspector::NativeInspector;
    pub use crate::system::toolhelp::ModuleIter;
    pub use crate::system::toolhelp::ToolhelpModules;
    pub use crate::system::wmi::WmiCommandLine;
    use crate::{CommandLineResult, FilteredModules, InspectResult, ModuleRecord, Pid, TryFilteredModules};

    /// Gets the command line `pid` was started with.
    ///
    /// Returns an empty string when WMI reports nothing, the process has
    /// exited, or access is denied.
    ///
    /// # Example
    /// ```no_run
    /// let line = process_inspector::get_command_line(std::process::id());
    /// println!("started as: {}", line);
    /// ```
    pub fn get_command_line(pid: Pid) -> String {
        NativeInspector::native().command_line(pid)
    }

    /// Gets the command line without folding failures into `""`.
    pub fn try_command_line(pid: Pid) -> CommandLineResult<Option<String>> {
        NativeInspector::native().try_command_line(pid)
    }

    /// Finds the first module of `pid` named exactly `module_name`.
    ///
    /// # Example
    /// ```no_run
    /// let ntdll = process_inspector::get_module(std::process::id(), "ntdll.dll")
    ///     .expect("ntdll is always loaded");
    /// println!("ntdll at {:#x}", ntdll.base_address);
    /// ```
    pub fn get_module(pid: Pid, module_name: &str) -> InspectResult<ModuleRecord> {
        NativeInspector::native().module(pid, module_name)
    }

    /// Lazily yields the modules of `pid` for which `predicate` is true.
    pub fn get_modules<F>(pid: Pid, predicate: F) -> InspectResult<FilteredModules<ModuleIter, F>>
    where
        F: FnMut(&ModuleRecord) -> bool,
    {
        NativeInspector::native().modules(pid, predicate)
    }

    /// Like `get_modules`, for a predicate that can fail. The first failure
    /// is yielded as `Err` and ends the sequence.
    pub fn try_get_modules<F, E>(pid: Pid, predicate: F) -> InspectResult<TryFilteredModules<ModuleIter, F>>
    where
        F: FnMut(&ModuleRecord) -> Result<bool, E>,
    {
        NativeInspector::native().try_modules(pid, predicate)
    }
}
