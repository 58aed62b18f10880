//! Per-package test orchestration
//!
//! Runs one instrumented test invocation per resolved package, strictly in
//! order. Each child's stdout and stderr are drained concurrently through
//! [`filter_line`] while waiting for it to exit.

use crate::command::CommandBuilder;
use crate::config::AccConfig;
use crate::resolver::ResolvedArgs;
use crate::result::{AccError, AccResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use uuid::Uuid;

/// Diagnostic emitted for every coverpkg entry without dependent tests
pub const NO_DEPENDENTS_WARNING: &str = "no packages being tested depend on matches for pattern";

/// Marker of the per-package summary that lists the whole coverpkg set
const STATEMENTS_MARKER: &str = "% of statements in";

/// Extension of per-package profiles in the temp directory
const PROFILE_EXTENSION: &str = "cc.tmp";

/// One package paired with the profile its test run writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Package under test
    pub package: String,
    /// Per-package coverage profile
    pub profile: PathBuf,
}

impl Job {
    /// Job with a fresh profile path in the system temp directory
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self::in_dir(package, std::env::temp_dir())
    }

    /// Job with a fresh profile path under `dir`
    #[must_use]
    pub fn in_dir(package: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Self {
            package: package.into(),
            profile: dir
                .as_ref()
                .join(format!("{}.{PROFILE_EXTENSION}", Uuid::new_v4())),
        }
    }
}

/// Hooks for reporting orchestration progress
pub trait Progress {
    /// Called before the test run of package `index` (1-based) of `total`
    fn package_started(&self, _index: usize, _total: usize, _package: &str) {}

    /// Called once the merged profile has been written
    fn profile_written(&self, _path: &Path, _merged: usize) {}
}

impl Progress for () {}

/// Decide what to show of one line of test output.
///
/// Returns `None` for lines to discard. Coverage summaries are cut right
/// after the percentage.
#[must_use]
pub fn filter_line(line: &str) -> Option<&str> {
    if line.contains(NO_DEPENDENTS_WARNING) {
        return None;
    }
    match line.find(STATEMENTS_MARKER) {
        Some(idx) => Some(&line[..=idx]),
        None => Some(line),
    }
}

/// Arguments for testing `job.package` with coverage over every resolved package
#[must_use]
pub fn test_command(config: &AccConfig, resolved: &ResolvedArgs, job: &Job) -> CommandBuilder {
    CommandBuilder::new(&config.test_command)
        .arg([
            format!("-covermode={}", config.covermode),
            format!("-coverprofile={}", job.profile.display()),
            format!("-coverpkg={}", resolved.packages.join(",")),
        ])
        .arg_no_blank([config.tags_flag()])
        .arg(resolved.passthrough.iter().cloned())
        .arg([job.package.clone()])
}

/// Read `reader` to the end, handing every kept line to `sink`
pub async fn forward_lines<R, F>(reader: R, mut sink: F) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str) -> std::io::Result<()>,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    while let Some(segment) = segments.next_segment().await? {
        let line = String::from_utf8_lossy(&segment);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if let Some(kept) = filter_line(line) {
            sink(kept)?;
        }
    }
    Ok(())
}

fn print_line(line: &str) -> std::io::Result<()> {
    writeln!(std::io::stdout().lock(), "{line}")
}

/// Run the test invocation of a single job and wait for it.
///
/// Both output streams are drained to the end before the exit status is
/// looked at. A non-zero exit is an error.
pub async fn run_job(config: &AccConfig, resolved: &ResolvedArgs, job: &Job) -> AccResult<()> {
    let builder = test_command(config, resolved, job);
    tracing::debug!(package = %job.package, command = %builder, "running tests");

    let mut cmd = builder.to_tokio();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .map_err(|e| AccError::spawn(builder.to_string(), e))?;

    let stdout = child.stdout.take().ok_or_else(|| AccError::MissingPipe {
        stream: "stdout",
        command: builder.to_string(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| AccError::MissingPipe {
        stream: "stderr",
        command: builder.to_string(),
    })?;

    let (out, err, status) = tokio::join!(
        forward_lines(stdout, print_line),
        forward_lines(stderr, print_line),
        child.wait(),
    );
    out?;
    err?;
    let status = status?;

    if !status.success() {
        return Err(AccError::TestFailed {
            package: job.package.clone(),
            status,
        });
    }
    Ok(())
}

/// Test every resolved package in order, stopping at the first failure.
///
/// Returns the jobs in package order; their profiles are left on disk.
pub async fn run_packages(
    config: &AccConfig,
    resolved: &ResolvedArgs,
    progress: &dyn Progress,
) -> AccResult<Vec<Job>> {
    let total = resolved.packages.len();
    let mut jobs = Vec::with_capacity(total);

    for (idx, package) in resolved.packages.iter().enumerate() {
        let job = Job::new(package.as_str());
        progress.package_started(idx + 1, total, package);
        run_job(config, resolved, &job).await?;
        jobs.push(job);
    }

    Ok(jobs)
}
