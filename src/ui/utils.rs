//! Utility functions for text rendering

use crossterm::style::Color;

use process_inspector::ModuleRecord;

use process_inspector::constants::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, SYSTEM_MODULE_DIRS};

/// Formats a byte count as a human-readable string (B, KB, MB, GB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value >= BYTES_PER_GB {
        format!("{:.1} GB", value / BYTES_PER_GB)
    } else if value >= BYTES_PER_MB {
        format!("{:.1} MB", value / BYTES_PER_MB)
    } else if value >= BYTES_PER_KB {
        format!("{:.1} KB", value / BYTES_PER_KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncates a string to fit within a given width.
///
/// If the string exceeds `max_len` characters, it is cut and "..." appended.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Color for a module row.
///
/// * Green - executable images
/// * DarkGrey - modules loaded from the Windows system directories
/// * White - everything else (third-party libraries)
#[must_use]
pub fn module_color(module: &ModuleRecord) -> Color {
    let path = module.path.to_ascii_lowercase();
    if path.ends_with(".exe") {
        Color::Green
    } else if SYSTEM_MODULE_DIRS.iter().any(|dir| path.starts_with(dir)) {
        Color::DarkGrey
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(path: &str) -> ModuleRecord {
        ModuleRecord {
            name: path.rsplit('\\').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            base_address: 0,
            size: 0,
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
        assert_eq!(format_bytes(3 * 1_073_741_824), "3.0 GB");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("C:\\very\\long\\path.dll", 10), "C:\\very...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_module_color() {
        assert_eq!(module_color(&module("C:\\Games\\game.exe")), Color::Green);
        assert_eq!(module_color(&module("C:\\WINDOWS\\System32\\ntdll.dll")), Color::DarkGrey);
        assert_eq!(module_color(&module("C:\\Windows\\SysWOW64\\user32.dll")), Color::DarkGrey);
        assert_eq!(module_color(&module("D:\\Games\\steam_api64.dll")), Color::White);
    }
}
