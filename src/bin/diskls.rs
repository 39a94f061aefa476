//! diskls - display information about system disks and storage.
//!
//! Usage:
//!   diskls              # block device inventory
//!   diskls -a           # everything, with details
//!   diskls --no-color   # plain text even on a terminal

use std::io;

use infoutils::cli::{self, DiskArgs, ToolArgs};
use infoutils::collector::{DiskCollector, RealFs, RealSystem};
use infoutils::logging::init_logging;
use infoutils::report::{Palette, Report, disk};

fn main() {
    let args: DiskArgs = cli::parse_or_exit();
    let color = args.common.color();
    init_logging(args.common.verbose, color);

    let paths = args.common.sources.source_paths();
    let collector = DiskCollector::new(RealFs::new(), RealSystem::new(), paths);

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock(), Palette::new(color));
    let result = disk::render(&mut report, &collector, &args.view()).and_then(|()| report.flush());

    cli::exit_with(DiskArgs::NAME, result);
}
