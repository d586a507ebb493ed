//! FFI module - Safe wrappers around Win32 handles and COM state
//!
//! This module provides RAII wrappers so snapshots are closed and COM is
//! uninitialized when they go out of scope.

mod handles;

pub use handles::{ComApartment, SnapshotHandle};
