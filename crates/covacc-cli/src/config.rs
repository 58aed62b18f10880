//! CLI configuration
//!
//! Flags win over the config file, the config file wins over built-in
//! defaults.

use crate::commands::Cli;
use crate::error::{CliError, CliResult};
use covacc::AccConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".accurate-code-coverage.yaml";

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Settings read from a YAML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Coverage mode
    pub covermode: Option<String>,
    /// Output path
    pub output: Option<PathBuf>,
    /// Ignore substrings
    pub ignore: Vec<String>,
    /// Build tags
    pub tags: Vec<String>,
}

impl FileConfig {
    fn parse(text: &str) -> Result<Self, serde_yaml_ng::Error> {
        // An empty document deserializes as null.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(text)
    }

    /// Parse a config file from YAML text
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        Self::parse(text).map_err(|e| CliError::config(e.to_string()))
    }

    /// Load a config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text).map_err(|e| CliError::config(format!("{}: {e}", path.display())))
    }

    /// Load the explicit config file, or the default one when it exists
    pub fn discover(explicit: Option<&Path>) -> CliResult<Option<(PathBuf, Self)>> {
        Self::discover_with_default(explicit, default_config_path())
    }

    /// [`Self::discover`] with the implicit file at `default`.
    ///
    /// An explicit file must load. An implicit file that fails to load is
    /// skipped with a warning.
    pub fn discover_with_default(
        explicit: Option<&Path>,
        default: Option<PathBuf>,
    ) -> CliResult<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            return Ok(Some((path.to_path_buf(), Self::load(path)?)));
        }
        match default {
            Some(path) if path.is_file() => match Self::load(&path) {
                Ok(config) => Ok(Some((path, config))),
                Err(e) => {
                    tracing::warn!("ignoring config file: {e}");
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }
}

/// `$HOME/.accurate-code-coverage.yaml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Presentation settings of the CLI itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliConfig {
    /// Color output choice
    pub color: ColorChoice,
    /// Suppress progress output
    pub quiet: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set quiet mode
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the run configuration from parsed flags and an optional file
pub fn build_acc_config(cli: &Cli, file: Option<&FileConfig>) -> CliResult<AccConfig> {
    let file = file.cloned().unwrap_or_default();
    let mut config = AccConfig::new()
        .with_test_command(cli.go_test_binary.trim())
        .with_args(cli.args.iter().cloned());

    if let Some(mode) = cli.covermode.clone().or(file.covermode) {
        config = config.with_covermode(mode);
    }

    if let Some(output) = cli.output.clone().or(file.output) {
        if output.as_os_str().is_empty() {
            return Err(CliError::invalid_argument("output path must not be empty"));
        }
        config = config.with_output(output);
    }

    let ignore = if cli.ignore.is_empty() {
        file.ignore
    } else {
        cli.ignore.clone()
    };
    config = config.with_ignore(non_blank(&ignore));

    let tags = if cli.tags.is_empty() {
        file.tags
    } else {
        cli.tags.clone()
    };
    config = config.with_tags(non_blank(&tags));

    if config.test_command.is_empty() {
        return Err(CliError::invalid_argument("GO_TEST_BINARY must not be empty"));
    }

    Ok(config)
}
