//! A minimal `log` backend that writes to stderr.
//!
//! The library only emits records through the `log` macros; the binary
//! installs this logger once at startup.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Log level argument for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:<5}] [{}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Level from `RUST_LOG` (a bare level name), if set and valid.
fn level_from_env() -> Option<LevelFilter> {
    std::env::var("RUST_LOG").ok()?.trim().parse().ok()
}

/// Pick the effective level: the CLI flag, then `RUST_LOG`, then warnings.
pub fn resolve_level(cli: Option<LogLevelArg>) -> LevelFilter {
    cli.map(LogLevelArg::to_level_filter)
        .or_else(level_from_env)
        .unwrap_or(LevelFilter::Warn)
}

/// Install the stderr logger. Calling it twice only updates the level.
pub fn init(cli: Option<LogLevelArg>) {
    let level = resolve_level(cli);
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    log::debug!("log level set to {}", level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(resolve_level(Some(LogLevelArg::Trace)), LevelFilter::Trace);
        assert_eq!(resolve_level(Some(LogLevelArg::Off)), LevelFilter::Off);
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(LogLevelArg::Warn.to_level_filter(), LevelFilter::Warn);
        assert_eq!(LogLevelArg::Debug.to_level_filter(), LevelFilter::Debug);
    }
}
