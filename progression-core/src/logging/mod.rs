//! Log setup for the progression crates
//!
//! Everything logs through `tracing`. This module only builds the global
//! subscriber: one level for the progression crates, one for `sqlx` query
//! noise and a base level for everything else. `RUST_LOG` replaces the
//! computed filter entirely when set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Crate targets that follow `LogConfig::progression`
const PROGRESSION_TARGETS: [&str; 2] = ["progression_core", "progression_server"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Line format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for targets not covered below
    pub base: LogLevel,
    /// Level for `progression_core` and `progression_server`
    pub progression: LogLevel,
    /// Level for `sqlx` (every statement logs at info)
    pub sql: LogLevel,
    pub format: LogFormat,
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base: LogLevel::Warn,
            progression: LogLevel::Info,
            sql: LogLevel::Warn,
            format: LogFormat::Compact,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Config with the progression crates turned up to `debug`
    pub fn verbose() -> Self {
        Self {
            progression: LogLevel::Debug,
            ..Self::default()
        }
    }

    /// `EnvFilter` directive string for this config
    pub fn directives(&self) -> String {
        let mut directives = vec![self.base.to_string()];
        directives.extend(
            PROGRESSION_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, self.progression)),
        );
        directives.push(format!("sqlx={}", self.sql));
        directives.join(",")
    }
}

static LOG_INIT: Once = Once::new();

/// Install the default subscriber. Safe to call from every test.
pub fn init_logging_default() {
    init_logging(&LogConfig::default());
}

/// Install the global subscriber once. Later calls are ignored, and so is
/// this one if the host application already installed a subscriber.
pub fn init_logging(config: &LogConfig) {
    let config = config.clone();
    LOG_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.directives()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_ids(config.thread_ids);

        let _ = match config.format {
            LogFormat::Compact => builder.compact().with_target(false).try_init(),
            LogFormat::Full => builder.with_target(true).try_init(),
        };
    });
}
