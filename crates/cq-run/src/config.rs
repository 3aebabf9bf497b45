use std::env;

use cq_lang::DEFAULT_MAX_CLAUSES;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Upper bound on the clauses a distributive rewrite may produce.
    pub max_clauses: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            max_clauses: DEFAULT_MAX_CLAUSES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from a variable lookup. Invalid values are reported on
    /// stderr and the default is kept.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(log_level) = var("RUST_LOG") {
            config.log_level = log_level;
        } else if let Some(log_level) = var("CQ_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Some(log_format) = var("CQ_LOG_FORMAT") {
            config.log_format = match log_format.to_lowercase().as_str() {
                "text" | "plain" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    eprintln!(
                        "Warning: Invalid CQ_LOG_FORMAT value '{}', using default text",
                        log_format
                    );
                    LogFormat::Text
                }
            };
        }

        if let Some(max_clauses_str) = var("CQ_MAX_CLAUSES") {
            if let Ok(max_clauses) = max_clauses_str.parse::<usize>() {
                config.max_clauses = max_clauses;
            } else {
                eprintln!(
                    "Warning: Invalid CQ_MAX_CLAUSES value '{}', using default {}",
                    max_clauses_str, config.max_clauses
                );
            }
        }

        config
    }
}

/// Installs the global subscriber. Logs go to stderr so that stdout only
/// carries the command output.
pub fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Warning: Invalid log filter '{}', using default warn",
            config.log_level
        );
        EnvFilter::new("warn")
    });

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
