//! Custom error types for type-safe error handling
//!
//! Module lookups and command-line queries fail in different ways, so each
//! gets its own enum. Callers can match on the variant instead of parsing
//! message strings.

use thiserror::Error;

use super::Pid;

// ============================================================================
// Inspect Error
// ============================================================================

/// Errors raised by module lookups and enumeration.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The scan finished without an ordinal name match
    #[error("module \"{name}\" not found")]
    ModuleNotFound {
        /// Name the caller asked for
        name: String,
    },

    /// The module list of the process could not be obtained at all
    #[error("cannot snapshot modules of process {pid}: {source}")]
    Snapshot {
        /// Target process
        pid: Pid,
        /// Underlying OS failure
        #[source]
        source: std::io::Error,
    },

    /// Native inspection requested on a target without the Win32 bindings
    #[error("process inspection is only supported on Windows")]
    Unsupported,
}

impl InspectError {
    /// Builds a `ModuleNotFound` for `name`.
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Self::ModuleNotFound { name: name.into() }
    }

    /// Builds a `Snapshot` error with process context.
    pub fn snapshot(pid: Pid, source: std::io::Error) -> Self {
        Self::Snapshot { pid, source }
    }

    /// True for the "no such module" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound { .. })
    }
}

// ============================================================================
// Command Line Error
// ============================================================================

/// Reasons a command-line query produced no answer.
///
/// `get_command_line` folds all of these into an empty string; they are only
/// visible through `try_command_line`. An exited process is not an error:
/// the query matches no rows and yields `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandLineError {
    /// The caller lacks the privilege to query the target
    #[error("access denied while querying process {pid}")]
    AccessDenied {
        /// Target process
        pid: Pid,
    },

    /// The management query itself failed
    #[error("{stage} failed (error code: 0x{code:08X})")]
    Query {
        /// Name of the failing call
        stage: &'static str,
        /// HRESULT reported by the OS
        code: i32,
    },
}

// ============================================================================
// Result type aliases
// ============================================================================

/// Result type for module operations
pub type InspectResult<T> = Result<T, InspectError>;

/// Result type for command-line queries
pub type CommandLineResult<T> = Result<T, CommandLineError>;
