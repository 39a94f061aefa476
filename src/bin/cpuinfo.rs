//! cpuinfo - display information about system CPU.
//!
//! Usage:
//!   cpuinfo              # model, vendor, cores, cache
//!   cpuinfo -a           # everything, with details
//!   cpuinfo --no-color   # plain text even on a terminal

use std::io;

use infoutils::cli::{self, CpuArgs, ToolArgs};
use infoutils::collector::{CpuCollector, RealFs};
use infoutils::logging::init_logging;
use infoutils::report::{Palette, Report, cpu};

fn main() {
    let args: CpuArgs = cli::parse_or_exit();
    let color = args.common.color();
    init_logging(args.common.verbose, color);

    let paths = args.common.sources.source_paths();
    let collector = CpuCollector::new(RealFs::new(), paths);

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock(), Palette::new(color));
    let result = cpu::render(&mut report, &collector, &args.view()).and_then(|()| report.flush());

    cli::exit_with(CpuArgs::NAME, result);
}
