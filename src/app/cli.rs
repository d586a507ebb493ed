//! Command-line argument parsing using clap

use clap::{Args, Parser, Subcommand, ValueEnum};

use process_inspector::{ModuleRecord, Pid};

/// Inspect a running Windows process: its command line and loaded modules.
#[derive(Parser, Debug)]
#[command(name = "procinspect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the command line a process was started with
    Cmdline(CmdlineArgs),

    /// Look up one loaded module by exact (case-sensitive) name
    Module(ModuleArgs),

    /// List loaded modules, optionally filtered
    Modules(ModulesArgs),
}

#[derive(Args, Debug)]
pub struct CmdlineArgs {
    /// Process ID, or `self` for this process
    #[arg(value_parser = parse_pid)]
    pub pid: Pid,

    /// Fail with the underlying reason instead of printing an empty line
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ModuleArgs {
    /// Process ID, or `self` for this process
    #[arg(value_parser = parse_pid)]
    pub pid: Pid,

    /// Module name, e.g. "KERNEL32.DLL"
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ModulesArgs {
    /// Process ID, or `self` for this process
    #[arg(value_parser = parse_pid)]
    pub pid: Pid,

    /// Keep modules whose name contains this text
    #[arg(short, long)]
    pub contains: Option<String>,

    /// Make --contains case-insensitive
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Keep modules whose full path starts with this prefix
    #[arg(short, long)]
    pub path_prefix: Option<String>,
}

impl ModulesArgs {
    /// True when `module` passes every filter that was given.
    pub fn matches(&self, module: &ModuleRecord) -> bool {
        let name_ok = match &self.contains {
            None => true,
            Some(needle) if self.ignore_case => {
                module.name.to_lowercase().contains(&needle.to_lowercase())
            }
            Some(needle) => module.name.contains(needle.as_str()),
        };
        let path_ok = self
            .path_prefix
            .as_deref()
            .map_or(true, |prefix| module.path.starts_with(prefix));
        name_ok && path_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// Comma-separated values with a header row
    Csv,
    /// JSON document
    Json,
}

/// Parses a process ID, accepting `self` for the current process
fn parse_pid(s: &str) -> Result<Pid, String> {
    if s.eq_ignore_ascii_case("self") {
        return Ok(std::process::id());
    }
    s.parse::<Pid>()
        .map_err(|_| format!("invalid process id '{}'. Must be a number or 'self'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, path: &str) -> ModuleRecord {
        ModuleRecord {
            name: name.to_string(),
            path: path.to_string(),
            base_address: 0x1000,
            size: 0x2000,
        }
    }

    fn modules_args(argv: &[&str]) -> ModulesArgs {
        let cli = Cli::try_parse_from(argv).expect("should parse");
        match cli.command {
            Command::Modules(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("1234"), Ok(1234));
        assert_eq!(parse_pid("self"), Ok(std::process::id()));
        assert!(parse_pid("notepad.exe").is_err());
        assert!(parse_pid("-1").is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["procinspect", "cmdline", "42", "--strict", "-o", "json", "-vv"])
            .expect("should parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Cmdline(args) => {
                assert_eq!(args.pid, 42);
                assert!(args.strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_module_requires_name() {
        assert!(Cli::try_parse_from(["procinspect", "module", "42"]).is_err());
    }

    #[test]
    fn test_modules_without_filters_matches_everything() {
        let args = modules_args(&["procinspect", "modules", "42"]);
        assert!(args.matches(&module("a.dll", "C:\\a.dll")));
    }

    #[test]
    fn test_modules_contains_respects_case() {
        let args = modules_args(&["procinspect", "modules", "42", "--contains", "KERNEL"]);
        assert!(args.matches(&module("KERNEL32.DLL", "")));
        assert!(!args.matches(&module("kernel32.dll", "")));

        let args = modules_args(&["procinspect", "modules", "42", "-c", "KERNEL", "-i"]);
        assert!(args.matches(&module("kernel32.dll", "")));
    }

    #[test]
    fn test_modules_filters_combine() {
        let args = modules_args(&[
            "procinspect",
            "modules",
            "42",
            "--contains",
            ".dll",
            "--path-prefix",
            "C:\\Windows",
        ]);
        assert!(args.matches(&module("ntdll.dll", "C:\\Windows\\System32\\ntdll.dll")));
        assert!(!args.matches(&module("steam_api64.dll", "D:\\Games\\steam_api64.dll")));
        assert!(!args.matches(&module("app.exe", "C:\\Windows\\app.exe")));
    }
}
