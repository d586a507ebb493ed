//! CSV and JSON output

use std::io::{self, Write};

use serde::Serialize;

use process_inspector::{ModuleRecord, Pid};

/// Command-line result as written by `--output json`
#[derive(Debug, Serialize)]
pub struct CommandLineReport<'a> {
    pub pid: Pid,
    pub command_line: &'a str,
}

/// Escapes a string for CSV format
/// Wraps in quotes if contains comma, quote, or newline
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Writes modules as CSV, one row per module, as they are produced.
///
/// Returns the number of rows written.
pub fn write_modules_csv<W, I>(writer: &mut W, modules: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = ModuleRecord>,
{
    writeln!(writer, "Name,BaseAddress,Size,Path")?;

    let mut rows = 0;
    for module in modules {
        writeln!(
            writer,
            "{},0x{:X},{},{}",
            escape_csv(&module.name),
            module.base_address,
            module.size,
            escape_csv(&module.path),
        )?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

/// Writes the command line as a one-row CSV.
pub fn write_command_line_csv<W: Write>(writer: &mut W, pid: Pid, line: &str) -> io::Result<()> {
    writeln!(writer, "PID,CommandLine")?;
    writeln!(writer, "{},{}", pid, escape_csv(line))?;
    writer.flush()
}

/// Writes any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, path: &str) -> ModuleRecord {
        ModuleRecord {
            name: name.to_string(),
            path: path.to_string(),
            base_address: 0x7FFA_1000_0000,
            size: 4096,
        }
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("ntdll.dll"), "ntdll.dll");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_modules_csv() {
        let mut out = Vec::new();
        let rows = write_modules_csv(
            &mut out,
            vec![
                module("ntdll.dll", "C:\\Windows\\System32\\ntdll.dll"),
                module("odd,name.dll", "C:\\x\\odd,name.dll"),
            ],
        )
        .unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name,BaseAddress,Size,Path\n\
             ntdll.dll,0x7FFA10000000,4096,C:\\Windows\\System32\\ntdll.dll\n\
             \"odd,name.dll\",0x7FFA10000000,4096,\"C:\\x\\odd,name.dll\"\n"
        );
    }

    #[test]
    fn test_command_line_csv_quotes_embedded_quotes() {
        let mut out = Vec::new();
        write_command_line_csv(&mut out, 7, r#""C:\app.exe" -x"#).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PID,CommandLine\n7,\"\"\"C:\\app.exe\"\" -x\"\n"
        );
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        write_json(&mut out, &CommandLineReport { pid: 7, command_line: "app.exe" }).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["pid"], 7);
        assert_eq!(value["command_line"], "app.exe");
    }
}
