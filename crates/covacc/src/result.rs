//! Result and error types for covacc.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for covacc operations
pub type AccResult<T> = Result<T, AccError>;

/// Errors that can occur while resolving, testing or merging
#[derive(Debug, Error)]
pub enum AccError {
    /// The package list command exited unsuccessfully
    #[error("listing packages for {pattern} failed ({status}): {output}")]
    ListPackages {
        /// Pattern handed to the list command
        pattern: String,
        /// Exit status of the list command
        status: ExitStatus,
        /// Captured stdout and stderr
        output: String,
    },

    /// A subprocess could not be started
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Full command line
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The test run of a package exited unsuccessfully
    #[error("tests for {package} failed: {status}")]
    TestFailed {
        /// Package under test
        package: String,
        /// Exit status of the test run
        status: ExitStatus,
    },

    /// A stdio pipe was not attached to the child
    #[error("{stream} of `{command}` was not captured")]
    MissingPipe {
        /// Which stream is missing
        stream: &'static str,
        /// Full command line
        command: String,
    },

    /// Reading or writing a coverage profile failed
    #[error("coverage profile {}: {source}", path.display())]
    Profile {
        /// Path of the profile
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccError {
    /// Create a profile error for `path`
    #[must_use]
    pub fn profile(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Profile {
            path: path.into(),
            source,
        }
    }

    /// Create a spawn error for `command`
    #[must_use]
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }
}
