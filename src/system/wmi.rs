//! Command-line lookup through WMI (Win32_Process)
//!
//! Every query opens its own COM apartment, locator and service connection
//! and releases them before returning. Nothing is cached between calls, and
//! security settings are applied to the one service proxy only, never to the
//! process.

use tracing::debug;
use windows::core::{w, BSTR, PCWSTR, VARIANT};
use windows::Win32::Foundation::E_ACCESSDENIED;
use windows::Win32::System::Com::{
    CoCreateInstance, CoSetProxyBlanket, CLSCTX_INPROC_SERVER, EOAC_NONE, RPC_C_AUTHN_LEVEL_CALL,
    RPC_C_IMP_LEVEL_IMPERSONATE,
};
use windows::Win32::System::Rpc::{RPC_C_AUTHN_WINNT, RPC_C_AUTHZ_NONE};
use windows::Win32::System::Wmi::{
    IEnumWbemClassObject, IWbemClassObject, IWbemLocator, WbemLocator, WBEM_E_ACCESS_DENIED,
    WBEM_FLAG_FORWARD_ONLY, WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_INFINITE,
};

use crate::constants::{WMI_NAMESPACE, WMI_QUERY_LANGUAGE};
use crate::ffi::ComApartment;

use super::command_line::{command_line_query, first_present, CommandLineProvider};
use super::error::{CommandLineError, CommandLineResult};
use super::Pid;

/// Native command-line provider backed by the local WMI service.
#[derive(Debug, Clone, Copy, Default)]
pub struct WmiCommandLine;

impl CommandLineProvider for WmiCommandLine {
    fn query(&self, pid: Pid) -> CommandLineResult<Option<String>> {
        // Declared first so every COM interface below is released before it.
        let _apartment = ComApartment::enter().map_err(|e| classify(pid, "CoInitializeEx", e))?;

        // SAFETY: COM is initialized on this thread for the rest of the call.
        let locator: IWbemLocator = unsafe { CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER) }
            .map_err(|e| classify(pid, "CoCreateInstance", e))?;

        let services = unsafe {
            locator.ConnectServer(
                &BSTR::from(WMI_NAMESPACE),
                &BSTR::new(),
                &BSTR::new(),
                &BSTR::new(),
                0,
                &BSTR::new(),
                None,
            )
        }
        .map_err(|e| classify(pid, "ConnectServer", e))?;

        // SAFETY: `services` is a live proxy; the principal name is null and
        // no auth identity is passed, so the current token is used.
        unsafe {
            CoSetProxyBlanket(
                &services,
                RPC_C_AUTHN_WINNT,
                RPC_C_AUTHZ_NONE,
                PCWSTR::null(),
                RPC_C_AUTHN_LEVEL_CALL,
                RPC_C_IMP_LEVEL_IMPERSONATE,
                None,
                EOAC_NONE,
            )
        }
        .map_err(|e| classify(pid, "CoSetProxyBlanket", e))?;

        let query = command_line_query(pid);
        debug!(pid, %query, "running WMI query");

        let rows = unsafe {
            services.ExecQuery(
                &BSTR::from(WMI_QUERY_LANGUAGE),
                &BSTR::from(query.as_str()),
                WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
                None,
            )
        }
        .map_err(|e| classify(pid, "ExecQuery", e))?;

        let mut failure = None;
        let fields = std::iter::from_fn(|| match next_record(&rows) {
            Ok(record) => record.map(|object| read_command_line(&object)),
            Err(e) => {
                failure = Some(classify(pid, "IEnumWbemClassObject::Next", e));
                None
            }
        });
        let line = first_present(fields);

        if let Some(err) = failure {
            return Err(err);
        }
        if line.is_none() {
            debug!(pid, "WMI query returned no usable record");
        }
        Ok(line)
    }
}

/// Pulls the next result row; `None` once the enumeration is exhausted.
fn next_record(rows: &IEnumWbemClassObject) -> windows::core::Result<Option<IWbemClassObject>> {
    let mut row: [Option<IWbemClassObject>; 1] = [None];
    let mut returned = 0u32;
    // SAFETY: `row` has room for exactly the one object requested.
    unsafe { rows.Next(WBEM_INFINITE, &mut row, &mut returned) }.ok()?;
    Ok(row[0].take().filter(|_| returned > 0))
}

/// Reads the CommandLine property; `None` when it is NULL or unreadable.
fn read_command_line(object: &IWbemClassObject) -> Option<String> {
    let mut value = VARIANT::default();
    // SAFETY: `value` is a valid, default-initialized VARIANT owned here.
    unsafe { object.Get(w!("CommandLine"), 0, &mut value, None, None) }.ok()?;
    if value.is_empty() {
        return None;
    }
    // VT_NULL does not convert to a BSTR
    BSTR::try_from(&value).ok().map(|line| line.to_string())
}

/// Maps a COM failure onto the command-line error taxonomy.
fn classify(pid: Pid, stage: &'static str, err: windows::core::Error) -> CommandLineError {
    let code = err.code();
    if code == E_ACCESSDENIED || code.0 == WBEM_E_ACCESS_DENIED.0 {
        CommandLineError::AccessDenied { pid }
    } else {
        CommandLineError::Query { stage, code: code.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_command_line() {
        let line = WmiCommandLine
            .query(std::process::id())
            .expect("query should run")
            .expect("own command line should be visible");
        let exe = std::env::current_exe().expect("current exe");
        let stem = exe.file_stem().and_then(|s| s.to_str()).expect("exe stem");
        assert!(line.contains(stem), "{line:?} should mention {stem}");
    }

    #[test]
    fn test_missing_process_has_no_command_line() {
        assert_eq!(WmiCommandLine.query(0xFFFF_FFFF), Ok(None));
    }

    #[test]
    fn test_repeated_queries_leave_process_security_alone() {
        let pid = std::process::id();
        let first = WmiCommandLine.query(pid).expect("first query should run");
        let second = WmiCommandLine.query(pid).expect("second query should run");
        assert_eq!(first, second);
    }
}
