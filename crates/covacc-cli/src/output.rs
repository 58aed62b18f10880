//! Console output and progress reporting

use console::{style, Term};
use covacc::Progress;
use std::path::Path;

/// Progress reporter writing to stderr
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(&self.success_line(message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        // Warnings survive quiet mode.
        let _ = self.term.write_line(&self.warning_line(message));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the step marker for one package
    pub fn step(&self, index: usize, total: usize, package: &str) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(&self.step_line(index, total, package));
    }

    fn success_line(&self, message: &str) -> String {
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "DONE".to_string()
        };
        format!("{prefix} {message}")
    }

    fn warning_line(&self, message: &str) -> String {
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        format!("{prefix} {message}")
    }

    fn step_line(&self, index: usize, total: usize, package: &str) -> String {
        let counter = format!("[{index}/{total}]");
        if self.use_color {
            format!("{} {}", style(counter).cyan().bold(), style(package).bold())
        } else {
            format!("{counter} {package}")
        }
    }
}

impl Progress for ProgressReporter {
    fn package_started(&self, index: usize, total: usize, package: &str) {
        self.step(index, total, package);
    }

    fn profile_written(&self, path: &Path, merged: usize) {
        self.success(&format!(
            "merged {merged} profile(s) into {}",
            path.display()
        ));
    }
}
