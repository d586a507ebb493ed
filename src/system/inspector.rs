//! The process inspector: command lines and module searches for a pid

use tracing::debug;

use super::command_line::{command_line_or_empty, CommandLineProvider};
use super::error::{CommandLineResult, InspectResult};
use super::module::{ModuleRecord, ModuleSource};
use super::search::{find_module, FilteredModules, TryFilteredModules};
use super::Pid;

/// Binds a command-line provider and a module source.
///
/// Every call goes straight to the providers; nothing is cached, so two
/// calls for the same pid may see different module lists.
#[derive(Debug, Clone, Default)]
pub struct Inspector<C, M> {
    command_lines: C,
    modules: M,
}

impl<C, M> Inspector<C, M>
where
    C: CommandLineProvider,
    M: ModuleSource,
{
    /// Creates an inspector from explicit providers.
    pub fn new(command_lines: C, modules: M) -> Self {
        Self { command_lines, modules }
    }

    /// Command line `pid` was started with, or `""` if the OS would not say.
    pub fn command_line(&self, pid: Pid) -> String {
        command_line_or_empty(&self.command_lines, pid)
    }

    /// Same query as `command_line`, without collapsing failures.
    pub fn try_command_line(&self, pid: Pid) -> CommandLineResult<Option<String>> {
        self.command_lines.query(pid)
    }

    /// First module whose name equals `name` exactly (ordinal comparison).
    ///
    /// # Errors
    /// * `InspectError::ModuleNotFound` - no module has that name
    /// * `InspectError::Snapshot` - the module list could not be read
    pub fn module(&self, pid: Pid, name: &str) -> InspectResult<ModuleRecord> {
        find_module(&self.modules, pid, name)
    }

    /// Lazily yields the modules of `pid` accepted by `predicate`, in the
    /// order the OS reports them.
    pub fn modules<F>(&self, pid: Pid, predicate: F) -> InspectResult<FilteredModules<M::Iter, F>>
    where
        F: FnMut(&ModuleRecord) -> bool,
    {
        debug!(pid, "starting module search");
        Ok(FilteredModules::new(self.modules.modules(pid)?, predicate))
    }

    /// Like `modules`, for a predicate that can fail. The first failure is
    /// yielded as `Err` and ends the sequence.
    pub fn try_modules<F, E>(&self, pid: Pid, predicate: F) -> InspectResult<TryFilteredModules<M::Iter, F>>
    where
        F: FnMut(&ModuleRecord) -> Result<bool, E>,
    {
        debug!(pid, "starting fallible module search");
        Ok(TryFilteredModules::new(self.modules.modules(pid)?, predicate))
    }
}

#[cfg(windows)]
mod native {
    use super::Inspector;
    use crate::system::toolhelp::ToolhelpModules;
    use crate::system::wmi::WmiCommandLine;

    /// Inspector wired to WMI and ToolHelp32.
    pub type NativeInspector = Inspector<WmiCommandLine, ToolhelpModules>;

    impl NativeInspector {
        /// Inspector backed by the live OS.
        pub fn native() -> Self {
            Inspector::new(WmiCommandLine, ToolhelpModules)
        }
    }
}

#[cfg(windows)]
pub use native::NativeInspector;
