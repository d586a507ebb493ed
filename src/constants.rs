//! Centralized constants for the library and the CLI

// ============================================================================
// Application Info
// ============================================================================

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// WMI
// ============================================================================

/// Namespace hosting the Win32_Process class
pub const WMI_NAMESPACE: &str = "ROOT\\CIMV2";

/// Query language accepted by IWbemServices::ExecQuery
pub const WMI_QUERY_LANGUAGE: &str = "WQL";

// ============================================================================
// Logging
// ============================================================================

/// Filter used when RUST_LOG is unset, indexed by `-v` count
pub const LOG_LEVELS: [&str; 4] = ["warn", "info", "debug", "trace"];

// ============================================================================
// Byte Size Conversions
// ============================================================================

/// Bytes in a kilobyte
pub const BYTES_PER_KB: f64 = 1024.0;

/// Bytes in a megabyte
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Bytes in a gigabyte
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

// ============================================================================
// Text Output
// ============================================================================

/// Lowercase directory prefixes whose modules are shown dimmed
pub const SYSTEM_MODULE_DIRS: [&str; 3] = [
    "c:\\windows\\system32\\",
    "c:\\windows\\syswow64\\",
    "c:\\windows\\winsxs\\",
];

/// Column width of module paths before truncation
pub const PATH_COLUMN_WIDTH: usize = 72;
