//! Command dispatch for the inspector CLI
//!
//! `run` works against any `Inspector`, so the whole command path can be
//! exercised with in-memory providers.

pub mod cli;
pub mod export;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use process_inspector::{CommandLineProvider, Inspector, ModuleRecord, ModuleSource, Pid};

use crate::ui::Renderer;

use cli::{CmdlineArgs, Cli, Command, ModuleArgs, ModulesArgs, OutputFormat};
use export::{write_command_line_csv, write_json, write_modules_csv, CommandLineReport};

/// Outcome of one command, mapped to the process exit code by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command produced its answer
    Success,
    /// The command ran but the answer is "nothing" (unknown module, no
    /// command line under --strict)
    NotFound,
}

/// Executes the parsed command, writing the result to `out`.
pub fn run<C, M, W>(cli: &Cli, inspector: &Inspector<C, M>, mut out: W) -> Result<Outcome>
where
    C: CommandLineProvider,
    M: ModuleSource,
    W: Write,
{
    match &cli.command {
        Command::Cmdline(args) => run_cmdline(cli.output, !cli.no_color, args, inspector, &mut out),
        Command::Module(args) => run_module(cli.output, !cli.no_color, args, inspector, &mut out),
        Command::Modules(args) => run_modules(cli.output, !cli.no_color, args, inspector, &mut out),
    }
}

fn run_cmdline<C, M, W>(
    format: OutputFormat,
    color: bool,
    args: &CmdlineArgs,
    inspector: &Inspector<C, M>,
    out: &mut W,
) -> Result<Outcome>
where
    C: CommandLineProvider,
    M: ModuleSource,
    W: Write,
{
    let line = if args.strict {
        match inspector.try_command_line(args.pid) {
            Ok(Some(line)) => line,
            Ok(None) => {
                eprintln!("error: no command line reported for process {}", args.pid);
                return Ok(Outcome::NotFound);
            }
            Err(err) => return Err(err).context(format!("querying process {}", args.pid)),
        }
    } else {
        inspector.command_line(args.pid)
    };

    info!(pid = args.pid, len = line.len(), "command line retrieved");
    match format {
        OutputFormat::Text => Renderer::new(out, color).command_line(&line)?,
        OutputFormat::Csv => write_command_line_csv(out, args.pid, &line)?,
        OutputFormat::Json => write_json(
            out,
            &CommandLineReport {
                pid: args.pid,
                command_line: &line,
            },
        )?,
    }
    Ok(Outcome::Success)
}

fn run_module<C, M, W>(
    format: OutputFormat,
    color: bool,
    args: &ModuleArgs,
    inspector: &Inspector<C, M>,
    out: &mut W,
) -> Result<Outcome>
where
    C: CommandLineProvider,
    M: ModuleSource,
    W: Write,
{
    let module = match inspector.module(args.pid, &args.name) {
        Ok(module) => module,
        Err(err) if err.is_not_found() => {
            eprintln!("error: {}", err);
            return Ok(Outcome::NotFound);
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Text => Renderer::new(out, color).module(args.pid, &module)?,
        OutputFormat::Csv => {
            write_modules_csv(out, std::iter::once(module))?;
        }
        OutputFormat::Json => write_json(out, &module)?,
    }
    Ok(Outcome::Success)
}

fn run_modules<C, M, W>(
    format: OutputFormat,
    color: bool,
    args: &ModulesArgs,
    inspector: &Inspector<C, M>,
    out: &mut W,
) -> Result<Outcome>
where
    C: CommandLineProvider,
    M: ModuleSource,
    W: Write,
{
    let modules = inspector.modules(args.pid, |m: &ModuleRecord| args.matches(m))?;

    let rows = match format {
        OutputFormat::Text => Renderer::new(out, color).module_table(args.pid, modules)?,
        OutputFormat::Csv => write_modules_csv(out, modules)?,
        OutputFormat::Json => {
            // JSON needs the whole array; everything else streams
            let collected: Vec<ModuleRecord> = modules.collect();
            write_json(out, &collected)?;
            collected.len()
        }
    };

    info!(pid = args.pid, rows, "modules listed");
    Ok(Outcome::Success)
}

/// Runs against the live OS.
#[cfg(windows)]
pub fn run_native<W: Write>(cli: &Cli, out: W) -> Result<Outcome> {
    run(cli, &process_inspector::NativeInspector::native(), out)
}

/// Native inspection needs the Win32 bindings.
#[cfg(not(windows))]
pub fn run_native<W: Write>(_cli: &Cli, _out: W) -> Result<Outcome> {
    Err(process_inspector::InspectError::Unsupported.into())
}
