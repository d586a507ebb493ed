//! Module enumeration using the ToolHelp32 API
//!
//! A module snapshot is taken with CreateToolhelp32Snapshot and walked with
//! Module32FirstW/Module32NextW, one entry per `next()` call.

use std::io;
use std::mem;

use tracing::debug;
use windows::Win32::System::Diagnostics::ToolHelp::{
    Module32FirstW, Module32NextW, MODULEENTRY32W,
};

use crate::ffi::SnapshotHandle;

use super::error::{InspectError, InspectResult};
use super::module::{snapshot_target, ModuleRecord, ModuleSource};
use super::Pid;

impl ModuleRecord {
    /// Creates a ModuleRecord from a MODULEENTRY32W struct
    fn from_entry(entry: &MODULEENTRY32W) -> Self {
        Self {
            name: wide_to_string(&entry.szModule),
            path: wide_to_string(&entry.szExePath),
            base_address: entry.modBaseAddr as usize,
            size: entry.modBaseSize,
        }
    }
}

/// Converts a null-terminated wide string (u16 slice) to a Rust String
fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

/// Native module source backed by ToolHelp32 snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolhelpModules;

impl ModuleSource for ToolhelpModules {
    type Iter = ModuleIter;

    fn modules(&self, pid: Pid) -> InspectResult<ModuleIter> {
        let pid = snapshot_target(pid).inspect_err(|err| {
            debug!(pid, error = %err, "refusing module snapshot");
        })?;
        let snapshot = SnapshotHandle::create_module_snapshot(pid).map_err(|err| {
            debug!(pid, error = %err, "module snapshot failed");
            InspectError::snapshot(pid, io::Error::from(err))
        })?;

        Ok(ModuleIter {
            snapshot,
            entry: MODULEENTRY32W {
                // CRITICAL: dwSize must be set before the first call
                dwSize: mem::size_of::<MODULEENTRY32W>() as u32,
                ..Default::default()
            },
            started: false,
            done: false,
        })
    }
}

/// Walks one module snapshot. The snapshot is closed when this is dropped.
pub struct ModuleIter {
    snapshot: SnapshotHandle,
    entry: MODULEENTRY32W,
    started: bool,
    done: bool,
}

impl Iterator for ModuleIter {
    type Item = ModuleRecord;

    fn next(&mut self) -> Option<ModuleRecord> {
        if self.done {
            return None;
        }

        // SAFETY: We have a valid snapshot handle and a properly sized entry.
        let step = unsafe {
            if self.started {
                Module32NextW(self.snapshot.as_raw(), &mut self.entry)
            } else {
                self.started = true;
                Module32FirstW(self.snapshot.as_raw(), &mut self.entry)
            }
        };

        match step {
            Ok(()) => Some(ModuleRecord::from_entry(&self.entry)),
            Err(_) => {
                // ERROR_NO_MORE_FILES ends the walk
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for ModuleIter {}
