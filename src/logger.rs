//! Structured logging for bytepatch
//!
//! Plain output goes through `env_logger`; `json` or `json:<level>` switches to
//! one JSON object per line, written to `BYTEPATCH_LOG_PATH` or stderr.

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "BYTEPATCH_LOG_LEVEL";

/// Environment variable naming the JSON log file
pub const LOG_PATH_ENV: &str = "BYTEPATCH_LOG_PATH";

/// Level used when nothing is configured
pub(crate) const DEFAULT_LEVEL: &str = "warn";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

/// Split a level string into (json mode, bare level)
fn parse_level_spec(level_str: &str) -> (bool, &str) {
    if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, "info")
    } else {
        (false, level_str)
    }
}

pub(crate) fn parse_level_filter(level: &str) -> LevelFilter {
    match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = log_path.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("Warning: cannot open log file {path}: {e}; logging to stderr");
                    None
                }
            }
        });

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger with specified level
    pub fn init_with_level(level_str: &str) {
        let log_path = env::var(LOG_PATH_ENV).ok();
        let (use_json, actual_level) = parse_level_spec(level_str);
        let level_filter = parse_level_filter(actual_level);

        if !use_json {
            let result = env_logger::Builder::new()
                .filter_level(level_filter)
                .format(|buf, record| {
                    write!(buf, "🦀 ")?;
                    write!(
                        buf,
                        "[{} {} {}] ",
                        Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                        record.level(),
                        record.target()
                    )?;
                    writeln!(buf, "{}", record.args())
                })
                .try_init();
            if let Err(e) = result {
                eprintln!("Failed to initialize logger: {e}");
            }
            return;
        }

        let Some(level) = level_filter.to_level() else {
            log::set_max_level(LevelFilter::Off);
            return;
        };

        let logger = Box::new(JsonLogger::new(level, log_path));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return;
        }

        log::set_max_level(level_filter);
    }

    /// Initialize from `BYTEPATCH_LOG_LEVEL`, defaulting to warnings only
    pub fn init() {
        let log_level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
        Self::init_with_level(&log_level);
    }

    fn entry(record: &Record<'_>) -> serde_json::Value {
        json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
            "@file": record.file().unwrap_or("unknown"),
            "@line": record.line().unwrap_or(0),
        })
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let json_string = format!(
            "{}\n",
            serde_json::to_string(&Self::entry(record)).unwrap_or_default()
        );

        // Write to file or stderr
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(json_string.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(json_string.as_bytes());
        let _ = io::stderr().flush();
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}
