//! Process inspection - command lines and loaded modules
//!
//! The search logic and the provider traits are platform independent so
//! they can be driven by fakes; the Win32 bindings are Windows-only.

pub mod command_line;
pub mod error;
pub mod inspector;
pub mod module;
pub mod search;
#[cfg(windows)]
pub mod toolhelp;
#[cfg(windows)]
pub mod wmi;

/// Operating-system process identifier.
pub type Pid = u32;
