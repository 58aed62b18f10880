//! covacc: accurate coverage across Go packages
//!
//! `go test -coverpkg` only attributes cross-package coverage correctly when
//! it is run once per package. This crate resolves the package arguments,
//! runs the instrumented tests package by package and merges the resulting
//! profiles into a single file with one `mode:` header.
//!
//! ```no_run
//! # async fn example() -> covacc::AccResult<()> {
//! let config = covacc::AccConfig::new()
//!     .with_covermode("set")
//!     .with_args(["./...", "-short"]);
//! let summary = covacc::run(&config, &()).await?;
//! println!("merged {} profiles", summary.merged);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod config;
mod merger;
mod orchestrator;
mod resolver;
mod result;

pub use command::CommandBuilder;
pub use config::{
    AccConfig, DEFAULT_COVERMODE, DEFAULT_LIST_COMMAND, DEFAULT_OUTPUT, DEFAULT_TEST_COMMAND,
};
pub use merger::{append_profile, merge_profiles, write_profile, MergedProfile};
pub use orchestrator::{
    filter_line, forward_lines, run_job, run_packages, test_command, Job, Progress,
    NO_DEPENDENTS_WARNING,
};
pub use resolver::{
    classify_args, is_wildcard, parse_package_list, resolve, GoList, PackageLister, ResolvedArgs,
    DIAGNOSTIC_PREFIX, WILDCARD_SUFFIX,
};
pub use result::{AccError, AccResult};

use std::path::PathBuf;

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Packages that were tested
    pub packages: usize,
    /// Per-package profiles that went into the output
    pub merged: usize,
    /// Where the merged profile was written
    pub output: PathBuf,
}

/// Resolve, test and merge according to `config`.
///
/// The output file is only written once every package's tests passed.
pub async fn run(config: &AccConfig, progress: &dyn Progress) -> AccResult<RunSummary> {
    let lister = GoList::new(config.list_command.as_str());
    run_with_lister(config, &lister, progress).await
}

/// [`run`] with a custom source for wildcard expansion
pub async fn run_with_lister(
    config: &AccConfig,
    lister: &dyn PackageLister,
    progress: &dyn Progress,
) -> AccResult<RunSummary> {
    let resolved = resolve(config, lister)?;
    let jobs = run_packages(config, &resolved, progress).await?;

    let profiles: Vec<_> = jobs.iter().map(|job| job.profile.as_path()).collect();
    let merged = merge_profiles(&config.covermode, &profiles)?;
    write_profile(config.output(), &merged.payload)?;
    progress.profile_written(config.output(), merged.merged);

    Ok(RunSummary {
        packages: jobs.len(),
        merged: merged.merged,
        output: config.output.clone(),
    })
}
