//! Diagnostic logging for the command-line tools.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Maps the number of `-v` flags to the level of this crate's events.
pub fn verbosity_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a stderr subscriber.
///
/// `RUST_LOG` directives apply to other targets; the level of this crate
/// is taken from `verbose`. Calling it twice is a no-op.
pub fn init_logging(verbose: u8, ansi: bool) {
    let level = verbosity_level(verbose);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("infoutils={}", level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0), Level::WARN);
        assert_eq!(verbosity_level(1), Level::DEBUG);
        assert_eq!(verbosity_level(2), Level::TRACE);
        assert_eq!(verbosity_level(9), Level::TRACE);
    }

    #[test]
    fn test_init_twice() {
        init_logging(0, false);
        init_logging(2, false);
    }
}
