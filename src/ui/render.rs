//! Text rendering logic

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use process_inspector::constants::PATH_COLUMN_WIDTH;
use process_inspector::{ModuleRecord, Pid};

use super::utils::{format_bytes, module_color, truncate_string};

/// Writes styled text to any writer; colors can be switched off.
pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    /// Prints one line in the given color
    fn line(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor, Print("\n"))
        } else {
            queue!(self.out, Print(text), Print("\n"))
        }
    }

    /// Renders the command line of `pid`; an empty line when unavailable
    pub fn command_line(&mut self, line: &str) -> io::Result<()> {
        self.line(Color::White, line)?;
        self.out.flush()
    }

    /// Renders a single module in detail
    pub fn module(&mut self, pid: Pid, module: &ModuleRecord) -> io::Result<()> {
        self.line(Color::Yellow, &format!("═══ {} (PID: {}) ═══", module.name, pid))?;
        self.line(Color::White, &format!("  Name:        {}", module.name))?;
        self.line(Color::White, &format!("  Path:        {}", module.path))?;
        self.line(Color::White, &format!("  Base:        0x{:016X}", module.base_address))?;
        self.line(
            Color::White,
            &format!("  Size:        {} ({} bytes)", format_bytes(u64::from(module.size)), module.size),
        )?;
        self.out.flush()
    }

    /// Renders modules as a table, streaming rows as they arrive.
    ///
    /// Returns the number of rows written.
    pub fn module_table<I>(&mut self, pid: Pid, modules: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = ModuleRecord>,
    {
        self.line(Color::Cyan, &format!("── Modules of PID {} ──", pid))?;
        self.line(
            Color::Cyan,
            &format!("  {:<18} {:>10}  {:<28} {}", "BASE", "SIZE", "NAME", "PATH"),
        )?;

        let mut rows = 0;
        for module in modules {
            let row = format!(
                "  {:016X}   {:>10}  {:<28} {}",
                module.base_address,
                format_bytes(u64::from(module.size)),
                truncate_string(&module.name, 28),
                truncate_string(&module.path, PATH_COLUMN_WIDTH),
            );
            self.line(module_color(&module), &row)?;
            rows += 1;
        }

        if rows == 0 {
            self.line(Color::DarkGrey, "  No matching modules")?;
        } else {
            self.line(Color::Cyan, &format!("── {} module(s) ──", rows))?;
        }
        self.out.flush()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> ModuleRecord {
        ModuleRecord {
            name: name.to_string(),
            path: format!("C:\\Windows\\System32\\{}", name),
            base_address: 0x7FFA_0000_0000,
            size: 2048,
        }
    }

    fn plain() -> Renderer<Vec<u8>> {
        Renderer::new(Vec::new(), false)
    }

    fn text(renderer: Renderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_command_line_plain() {
        let mut r = plain();
        r.command_line("app.exe --flag").unwrap();
        assert_eq!(text(r), "app.exe --flag\n");
    }

    #[test]
    fn test_module_detail() {
        let mut r = plain();
        r.module(10, &module("ntdll.dll")).unwrap();
        let out = text(r);
        assert!(out.starts_with("═══ ntdll.dll (PID: 10) ═══\n"));
        assert!(out.contains("  Base:        0x00007FFA00000000\n"));
        assert!(out.contains("  Size:        2.0 KB (2048 bytes)\n"));
    }

    #[test]
    fn test_module_table_counts_rows() {
        let mut r = plain();
        let rows = r.module_table(10, vec![module("ntdll.dll"), module("kernel32.dll")]).unwrap();
        assert_eq!(rows, 2);
        let out = text(r);
        assert!(out.contains("ntdll.dll"));
        assert!(out.ends_with("── 2 module(s) ──\n"));
    }

    #[test]
    fn test_empty_module_table() {
        let mut r = plain();
        assert_eq!(r.module_table(10, Vec::new()).unwrap(), 0);
        assert!(text(r).ends_with("  No matching modules\n"));
    }
}
