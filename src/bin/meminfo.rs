//! meminfo - display information about system memory usage.
//!
//! Usage:
//!   meminfo              # memory summary
//!   meminfo -a           # everything, with details
//!   meminfo --no-color   # plain text even on a terminal

use std::io;

use infoutils::cli::{self, MemArgs, ToolArgs};
use infoutils::collector::{MemoryCollector, RealFs};
use infoutils::logging::init_logging;
use infoutils::report::{Palette, Report, memory};

fn main() {
    let args: MemArgs = cli::parse_or_exit();
    let color = args.common.color();
    init_logging(args.common.verbose, color);

    let paths = args.common.sources.source_paths();
    let collector = MemoryCollector::new(RealFs::new(), paths);

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock(), Palette::new(color));
    let result = memory::render(&mut report, &collector, &args.view()).and_then(|()| report.flush());

    cli::exit_with(MemArgs::NAME, result);
}
