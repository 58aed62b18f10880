//! covacc CLI library
//!
//! Flag parsing, config file loading and console output around the
//! `covacc` core.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg};
pub use config::{
    build_acc_config, default_config_path, CliConfig, ColorChoice, FileConfig, CONFIG_FILE_NAME,
};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{execute, VERBOSE_DEPRECATION};
