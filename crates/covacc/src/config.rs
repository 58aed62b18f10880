//! Invocation configuration

use std::path::{Path, PathBuf};

/// Coverage mode used when none is given
pub const DEFAULT_COVERMODE: &str = "atomic";
/// Merged profile destination used when none is given
pub const DEFAULT_OUTPUT: &str = "coverage.txt";
/// Test runner invocation used when none is given
pub const DEFAULT_TEST_COMMAND: &str = "go test";
/// Package list invocation used when none is given
pub const DEFAULT_LIST_COMMAND: &str = "go list";

/// Everything the resolver, orchestrator and merger need for one run.
///
/// Built once by the caller and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccConfig {
    /// Coverage instrumentation mode, forwarded verbatim
    pub covermode: String,
    /// Destination of the merged profile
    pub output: PathBuf,
    /// Substrings; expanded packages containing any of them are dropped
    pub ignore: Vec<String>,
    /// Build tags, joined with commas
    pub tags: Vec<String>,
    /// Base test invocation, may contain several words
    pub test_command: String,
    /// Base package list invocation
    pub list_command: String,
    /// Raw positional arguments: packages, then passthrough flags
    pub args: Vec<String>,
}

impl Default for AccConfig {
    fn default() -> Self {
        Self {
            covermode: DEFAULT_COVERMODE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            ignore: Vec::new(),
            tags: Vec::new(),
            test_command: DEFAULT_TEST_COMMAND.to_string(),
            list_command: DEFAULT_LIST_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

impl AccConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set coverage mode
    #[must_use]
    pub fn with_covermode(mut self, mode: impl Into<String>) -> Self {
        self.covermode = mode.into();
        self
    }

    /// Set output path
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set ignore substrings
    #[must_use]
    pub fn with_ignore<I, S>(mut self, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = ignore.into_iter().map(Into::into).collect();
        self
    }

    /// Set build tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set base test invocation
    #[must_use]
    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = command.into();
        self
    }

    /// Set base package list invocation
    #[must_use]
    pub fn with_list_command(mut self, command: impl Into<String>) -> Self {
        self.list_command = command.into();
        self
    }

    /// Set positional arguments
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The `-tags=` flag, or an empty string when no tags are set
    #[must_use]
    pub fn tags_flag(&self) -> String {
        if self.tags.is_empty() {
            String::new()
        } else {
            format!("-tags={}", self.tags.join(","))
        }
    }

    /// Header line of the merged profile, newline included
    #[must_use]
    pub fn mode_header(&self) -> String {
        format!("mode: {}\n", self.covermode)
    }

    /// Output path
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }
}
