//! Command-line retrieval through an injected management query

use tracing::debug;

use super::error::CommandLineResult;
use super::Pid;

/// Answers "what command line was this process started with".
///
/// `Ok(None)` means the query ran but produced no usable value. A process
/// that has exited lands here too, since the query simply matches no rows.
/// `Err` carries the OS-level reason the query could not run.
pub trait CommandLineProvider {
    /// Runs the query for `pid`. Only the first usable record counts.
    fn query(&self, pid: Pid) -> CommandLineResult<Option<String>>;
}

impl<P: CommandLineProvider + ?Sized> CommandLineProvider for &P {
    fn query(&self, pid: Pid) -> CommandLineResult<Option<String>> {
        (**self).query(pid)
    }
}

/// Builds the WQL statement selecting one process's command line.
pub fn command_line_query(pid: Pid) -> String {
    format!("SELECT CommandLine FROM Win32_Process WHERE ProcessId = {}", pid)
}

/// Picks the first present CommandLine field out of the query's records.
///
/// Records whose field is NULL are skipped; records after the chosen one are
/// never pulled.
pub fn first_present<I>(fields: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    fields.into_iter().flatten().next()
}

/// Runs the query and folds every failure into an empty string.
pub fn command_line_or_empty<P: CommandLineProvider>(provider: &P, pid: Pid) -> String {
    match provider.query(pid) {
        Ok(Some(line)) => line,
        Ok(None) => {
            debug!(pid, "no command line reported");
            String::new()
        }
        Err(err) => {
            debug!(pid, error = %err, "command line query failed");
            String::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::*;

    /// Canned answers keyed by pid; unknown pids behave like exited processes.
    #[derive(Default)]
    pub struct CannedCommandLines {
        pub answers: HashMap<Pid, CommandLineResult<Option<String>>>,
    }

    impl CannedCommandLines {
        pub fn answer(mut self, pid: Pid, answer: CommandLineResult<Option<String>>) -> Self {
            self.answers.insert(pid, answer);
            self
        }
    }

    impl CommandLineProvider for CannedCommandLines {
        fn query(&self, pid: Pid) -> CommandLineResult<Option<String>> {
            self.answers.get(&pid).cloned().unwrap_or(Ok(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::CannedCommandLines;
    use super::*;
    use crate::system::error::CommandLineError;

    #[test]
    fn test_query_text() {
        assert_eq!(
            command_line_query(1234),
            "SELECT CommandLine FROM Win32_Process WHERE ProcessId = 1234"
        );
    }

    #[test]
    fn test_known_command_line_is_returned_verbatim() {
        let line = r#""C:\Program Files\App\app.exe" --port 8080 -v"#;
        let provider = CannedCommandLines::default().answer(10, Ok(Some(line.to_string())));
        assert_eq!(command_line_or_empty(&provider, 10), line);
    }

    #[test]
    fn test_empty_command_line_is_kept() {
        let provider = CannedCommandLines::default().answer(10, Ok(Some(String::new())));
        assert_eq!(provider.query(10), Ok(Some(String::new())));
        assert_eq!(command_line_or_empty(&provider, 10), "");
    }

    #[test]
    fn test_missing_record_collapses_to_empty() {
        let provider = CannedCommandLines::default();
        assert_eq!(command_line_or_empty(&provider, 77), "");
    }

    #[test]
    fn test_failures_collapse_to_empty() {
        let provider = CannedCommandLines::default()
            .answer(4, Err(CommandLineError::AccessDenied { pid: 4 }))
            .answer(6, Err(CommandLineError::Query { stage: "ConnectServer", code: -1 }));

        for pid in [4, 6] {
            assert!(provider.query(pid).is_err());
            assert_eq!(command_line_or_empty(&provider, pid), "");
        }
    }

    #[test]
    fn test_null_fields_are_skipped() {
        let fields = vec![None, Some("b".to_string()), Some("c".to_string())];
        assert_eq!(first_present(fields), Some("b".to_string()));
    }

    #[test]
    fn test_all_null_or_no_records_is_none() {
        assert_eq!(first_present(vec![None, None]), None);
        assert_eq!(first_present(Vec::<Option<String>>::new()), None);
    }

    #[test]
    fn test_later_records_are_not_pulled() {
        let mut pulled = 0;
        let fields = [None, Some("first"), Some("second")].into_iter().map(|f: Option<&str>| {
            pulled += 1;
            f.map(str::to_string)
        });
        assert_eq!(first_present(fields), Some("first".to_string()));
        assert_eq!(pulled, 2);
    }
}
