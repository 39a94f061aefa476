//! osinfo - display information about the operating system.
//!
//! Usage:
//!   osinfo              # kernel and host identity
//!   osinfo -a           # everything, with details
//!   osinfo --no-color   # plain text even on a terminal

use std::io;

use infoutils::cli::{self, OsArgs, ToolArgs};
use infoutils::collector::{OsCollector, RealFs, RealSystem};
use infoutils::logging::init_logging;
use infoutils::report::{Palette, Report, os};

fn main() {
    let args: OsArgs = cli::parse_or_exit();
    let color = args.common.color();
    init_logging(args.common.verbose, color);

    let paths = args.common.sources.source_paths();
    let collector = OsCollector::new(RealFs::new(), RealSystem::new(), paths);

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock(), Palette::new(color));
    let result = os::render(&mut report, &collector, &args.view()).and_then(|()| report.flush());

    cli::exit_with(OsArgs::NAME, result);
}
