//! `log` backend for the command-line tools.
//!
//! Records go to standard error so they never mix with dump output.

use log::{Level, LevelFilter, Metadata, Record};

pub struct Logger;

static LOGGER: Logger = Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Debug | Level::Trace => eprintln!(
                "{} {} {}",
                label(record.level()),
                record.target(),
                record.args()
            ),
            level => eprintln!("{} {}", label(level), record.args()),
        }
    }

    fn flush(&self) {}
}

fn label(level: Level) -> &'static str {
    match level {
        Level::Debug => "[DEBUG]",
        Level::Error => "[ERROR]",
        Level::Info => "[INFO]",
        Level::Trace => "[TRACE]",
        Level::Warn => "[WARN]",
    }
}

/// Level for a `-v` count: warn by default, then info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install [`Logger`] as the global logger. Later calls only adjust the level.
pub fn init(verbosity: u8) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_for(verbosity));
}
