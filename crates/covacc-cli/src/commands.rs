//! CLI command definitions using clap

use clap::{Parser, ValueEnum};
use covacc::DEFAULT_TEST_COMMAND;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  $ covacc github.com/some/package
  $ covacc -o my-coverfile.txt github.com/some/package
  $ covacc ./...
  $ covacc --ignore mocks,testdata ./...

All flags understood by \"go test\" can be passed after \"--\":
  $ covacc . -- -short -v -failfast";

/// covacc: accurate code coverage reports for Go
#[derive(Parser, Debug)]
#[command(name = "covacc")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "covacc [OPTIONS] <PACKAGES>... [-- <GO TEST FLAGS>...]")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Which code coverage mode to use [default: atomic]
    #[arg(long, value_name = "MODE")]
    pub covermode: Option<String>,

    /// Location for the output file [default: coverage.txt]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Drop expanded packages containing any of these substrings
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Build tags passed to every test run
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Deprecated, pass -v after "--" instead
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (suppress progress output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,

    /// Config file [default: $HOME/.accurate-code-coverage.yaml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Test runner invocation, may contain several words
    #[arg(long, env = "GO_TEST_BINARY", default_value = DEFAULT_TEST_COMMAND, value_name = "CMD")]
    pub go_test_binary: String,

    /// Packages to test, followed by flags for go test
    #[arg(
        value_name = "PACKAGES",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
