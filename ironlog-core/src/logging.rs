use log::{Level, LevelFilter};
use std::fmt::Display;
use std::io::Write;

/// One log line without the timestamp: `LEVEL target: message`.
fn format_line(level: Level, target: &str, message: impl Display) -> String {
    format!("{:<5} {}: {}", level, target, message)
}

/// Installs the process logger on stderr; stdout carries command output only.
pub fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}",
                buf.timestamp_seconds(),
                format_line(record.level(), record.target(), record.args())
            )
        })
        .target(env_logger::Target::Stderr)
        .filter_level(level);

    if builder.try_init().is_err() {
        // already installed; only the level changes
        log::debug!("Logger already initialised");
    }
    log::set_max_level(level);
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lvl = match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    };
    Some(lvl)
}

/// Installs the logger at the named level. Returns false for an unknown name.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl);
            true
        }
        None => false,
    }
}
