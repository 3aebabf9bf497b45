mod cli;
mod config;

pub use cli::Cli;
pub use config::{Config, LogFormat, init_tracing};
