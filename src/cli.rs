//! Command-line surface shared by the four tools.
//!
//! Each tool has its own clap-derived argument struct. Help and version
//! output are produced here rather than by clap so every tool prints the
//! same fixed banners, and every parse failure is reported as a single
//! `<tool>: invalid option -- '<arg>'` line.

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::error::{ContextKind, ContextValue};
use clap::{ArgAction, Args, Parser};

use crate::collector::{DEFAULT_TOP_PROCESSES, SourcePaths};
use crate::report::Palette;
use crate::report::cpu::CpuView;
use crate::report::disk::DiskView;
use crate::report::memory::MemoryView;
use crate::report::os::OsView;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_OPTION: i32 = 1;
    pub const PERMISSION_DENIED: i32 = 2;
    pub const FILE_NOT_FOUND: i32 = 3;
    pub const RUNTIME_ERROR: i32 = 4;
}

const PACKAGE: &str = "QCO InfoUtils";
const RELEASE: &str = "1.0";
const HOME_PAGE: &str = "https://github.com/Qainar-Projects/infoutils";

/// Roots of the pseudo-filesystems, overridable for fixtures and chroots.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Path to /proc filesystem.
    #[arg(long, value_name = "PATH", default_value = "/proc", env = "INFOUTILS_PROC_PATH", hide = true)]
    pub proc_path: PathBuf,

    /// Path to /sys filesystem.
    #[arg(long, value_name = "PATH", default_value = "/sys", env = "INFOUTILS_SYS_PATH", hide = true)]
    pub sys_path: PathBuf,

    /// Path to /etc directory.
    #[arg(long, value_name = "PATH", default_value = "/etc", env = "INFOUTILS_ETC_PATH", hide = true)]
    pub etc_path: PathBuf,
}

impl SourceArgs {
    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            proc: self.proc_path.clone(),
            sys: self.sys_path.clone(),
            etc: self.etc_path.clone(),
        }
    }
}

/// Flags accepted by every tool.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Display all available information.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Show detailed information.
    #[arg(short = 'd', long)]
    pub detailed: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log diagnostics to standard error; repeat for more.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'h', long)]
    pub help: bool,

    #[arg(short = 'V', long)]
    pub version: bool,

    #[command(flatten)]
    pub sources: SourceArgs,
}

impl CommonArgs {
    fn detailed(&self) -> bool {
        self.all || self.detailed
    }

    /// Colour is used only on a terminal and only without `--no-color`.
    pub fn color(&self) -> bool {
        !self.no_color && io::stdout().is_terminal()
    }
}

/// A tool's argument struct together with its fixed texts.
pub trait ToolArgs: Parser {
    const NAME: &'static str;
    /// One-line description printed under the usage line.
    const ABOUT: &'static str;
    /// Option table printed by `--help`.
    const OPTIONS: &'static str;
    /// Example invocations printed by `--help`.
    const EXAMPLES: &'static str;

    fn common(&self) -> &CommonArgs;
}

#[derive(Debug, Parser)]
#[command(name = "cpuinfo", disable_help_flag = true, disable_version_flag = true)]
pub struct CpuArgs {
    /// Show CPU frequency information.
    #[arg(short = 'f', long)]
    pub frequencies: bool,

    /// Show CPU load information.
    #[arg(short = 'l', long)]
    pub load: bool,

    /// Show CPU topology information.
    #[arg(short = 't', long)]
    pub topology: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl CpuArgs {
    pub fn view(&self) -> CpuView {
        let all = self.common.all;
        CpuView {
            detailed: self.common.detailed(),
            load: all || self.load,
            frequencies: all || self.frequencies,
            topology: all || self.topology,
        }
    }
}

impl ToolArgs for CpuArgs {
    const NAME: &'static str = "cpuinfo";
    const ABOUT: &'static str = "Display information about system CPU.";
    const OPTIONS: &'static str = "\
  -a, --all         display all available information
  -d, --detailed    show detailed CPU information
  -f, --frequencies show CPU frequency information
  -h, --help        display this help and exit
  -l, --load        show CPU load information
      --no-color    disable colored output
  -t, --topology    show CPU topology information
  -v, --verbose     log diagnostics to standard error
  -V, --version     output version information and exit
";
    const EXAMPLES: &'static str = "\
  cpuinfo           Show basic CPU information
  cpuinfo -a        Show comprehensive CPU report
  cpuinfo -l        Show CPU information with load
";

    fn common(&self) -> &CommonArgs {
        &self.common
    }
}

#[derive(Debug, Parser)]
#[command(name = "meminfo", disable_help_flag = true, disable_version_flag = true)]
pub struct MemArgs {
    /// Show top memory consuming processes.
    #[arg(short = 'p', long)]
    pub processes: bool,

    /// Show swap space information.
    #[arg(short = 's', long)]
    pub swap: bool,

    /// Number of processes in the process table.
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_TOP_PROCESSES)]
    pub top: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl MemArgs {
    pub fn view(&self) -> MemoryView {
        let all = self.common.all;
        MemoryView {
            detailed: self.common.detailed(),
            processes: all || self.processes,
            swap: all || self.swap,
            top: self.top,
        }
    }
}

impl ToolArgs for MemArgs {
    const NAME: &'static str = "meminfo";
    const ABOUT: &'static str = "Display information about system memory usage.";
    const OPTIONS: &'static str = "\
  -a, --all         display all available information
  -d, --detailed    show detailed memory breakdown
  -h, --help        display this help and exit
  -n, --top=N       list N processes with -p (default 15)
      --no-color    disable colored output
  -p, --processes   show top memory consuming processes
  -s, --swap        show swap space information
  -v, --verbose     log diagnostics to standard error
  -V, --version     output version information and exit
";
    const EXAMPLES: &'static str = "\
  meminfo           Show basic memory information
  meminfo -a        Show comprehensive memory report
  meminfo -p        Show memory usage with top processes
";

    fn common(&self) -> &CommonArgs {
        &self.common
    }
}

#[derive(Debug, Parser)]
#[command(name = "diskls", disable_help_flag = true, disable_version_flag = true)]
pub struct DiskArgs {
    /// Show disk space usage.
    #[arg(short = 'u', long)]
    pub usage: bool,

    /// Show mount point information.
    #[arg(short = 'm', long)]
    pub mounts: bool,

    /// Show disk types and filesystems.
    #[arg(short = 't', long)]
    pub types: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl DiskArgs {
    pub fn view(&self) -> DiskView {
        let all = self.common.all;
        DiskView {
            detailed: self.common.detailed(),
            usage: all || self.usage,
            mounts: all || self.mounts,
            types: all || self.types,
        }
    }
}

impl ToolArgs for DiskArgs {
    const NAME: &'static str = "diskls";
    const ABOUT: &'static str = "Display information about system disks and storage.";
    const OPTIONS: &'static str = "\
  -a, --all         display all available information
  -d, --detailed    show detailed disk information
  -h, --help        display this help and exit
  -m, --mounts      show mount point information
      --no-color    disable colored output
  -t, --types       show disk types and filesystems
  -u, --usage       show disk space usage
  -v, --verbose     log diagnostics to standard error
  -V, --version     output version information and exit
";
    const EXAMPLES: &'static str = "\
  diskls            Show basic disk information
  diskls -a         Show comprehensive disk report
  diskls -u         Show disk usage information
";

    fn common(&self) -> &CommonArgs {
        &self.common
    }
}

#[derive(Debug, Parser)]
#[command(name = "osinfo", disable_help_flag = true, disable_version_flag = true)]
pub struct OsArgs {
    /// Show distribution information.
    #[arg(short = 'r', long)]
    pub distro: bool,

    /// Show user information.
    #[arg(short = 'u', long)]
    pub users: bool,

    /// Show environment information.
    #[arg(short = 'e', long)]
    pub environment: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl OsArgs {
    pub fn view(&self) -> OsView {
        let all = self.common.all;
        OsView {
            detailed: self.common.detailed(),
            distro: all || self.distro,
            users: all || self.users,
            environment: all || self.environment,
        }
    }
}

impl ToolArgs for OsArgs {
    const NAME: &'static str = "osinfo";
    const ABOUT: &'static str = "Display information about the operating system.";
    const OPTIONS: &'static str = "\
  -a, --all         display all available information
  -d, --detailed    show detailed system information
  -e, --environment show environment information
  -h, --help        display this help and exit
      --no-color    disable colored output
  -r, --distro      show distribution information
  -u, --users       show user information
  -v, --verbose     log diagnostics to standard error
  -V, --version     output version information and exit
";
    const EXAMPLES: &'static str = "\
  osinfo            Show basic system information
  osinfo -a         Show comprehensive system report
  osinfo -r         Show distribution information
";

    fn common(&self) -> &CommonArgs {
        &self.common
    }
}

/// Outcome of a successful parse.
#[derive(Debug)]
pub enum Invocation<T> {
    Run(T),
    Help,
    Version,
}

pub fn help_text<T: ToolArgs>() -> String {
    format!(
        "Usage: {name} [OPTION]...\n{about}\n\n{options}\nExamples:\n{examples}\n{package} home page: <{home}>\n",
        name = T::NAME,
        about = T::ABOUT,
        options = T::OPTIONS,
        examples = T::EXAMPLES,
        package = PACKAGE,
        home = HOME_PAGE,
    )
}

pub fn version_text<T: ToolArgs>() -> String {
    format!(
        "{} ({}) {}\n\
         Copyright (C) 2025 AnmiTaliDev\n\
         License Apache 2.0: Apache License version 2.0\n\
         This is free software: you are free to change and redistribute it.\n\
         There is NO WARRANTY, to the extent permitted by law.\n",
        T::NAME,
        PACKAGE,
        RELEASE
    )
}

/// Picks the argument a clap error complains about.
fn offending_arg(err: &clap::Error) -> String {
    for kind in [ContextKind::InvalidValue, ContextKind::InvalidArg] {
        if let Some(ContextValue::String(arg)) = err.get(kind) {
            return arg.clone();
        }
    }
    err.kind().as_str().unwrap_or("unknown").to_string()
}

/// Parses `args` (including the program name) without exiting.
///
/// The error is the one-line diagnostic to print on standard error.
pub fn parse_args<T, I, S>(args: I) -> Result<Invocation<T>, String>
where
    T: ToolArgs,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(parsed) if parsed.common().help => Ok(Invocation::Help),
        Ok(parsed) if parsed.common().version => Ok(Invocation::Version),
        Ok(parsed) => Ok(Invocation::Run(parsed)),
        Err(err) => Err(format!(
            "{}: invalid option -- '{}'",
            T::NAME,
            offending_arg(&err)
        )),
    }
}

/// Parses the process arguments, handling `--help`, `--version` and
/// invalid options by exiting.
pub fn parse_or_exit<T: ToolArgs>() -> T {
    match parse_args::<T, _, _>(std::env::args_os()) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help) => {
            print!("{}", help_text::<T>());
            process::exit(exit_code::SUCCESS)
        }
        Ok(Invocation::Version) => {
            print!("{}", version_text::<T>());
            process::exit(exit_code::SUCCESS)
        }
        Err(message) => {
            let palette = Palette::new(io::stderr().is_terminal());
            eprintln!("{}", palette.red(&message));
            process::exit(exit_code::INVALID_OPTION)
        }
    }
}

/// Terminates the tool after rendering.
///
/// A closed pipe on stdout counts as success.
pub fn exit_with(tool: &str, result: io::Result<()>) -> ! {
    match result {
        Ok(()) => process::exit(exit_code::SUCCESS),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => process::exit(exit_code::SUCCESS),
        Err(e) => {
            eprintln!("{}: {}", tool, e);
            process::exit(exit_code::INVALID_OPTION)
        }
    }
}
