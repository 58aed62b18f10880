//! Coverage run driven by parsed CLI arguments

use crate::commands::Cli;
use crate::config::{build_acc_config, CliConfig, FileConfig};
use crate::error::CliResult;
use crate::output::ProgressReporter;
use clap::CommandFactory;

/// Notice printed for the deprecated `-v` flag
pub const VERBOSE_DEPRECATION: &str =
    "Flag -v has been deprecated, use `covacc -- -v` instead!";

/// Run the coverage workflow for `cli`.
///
/// Without package arguments only the help text is printed.
pub fn execute(cli: &Cli) -> CliResult<()> {
    if cli.args.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli_config = CliConfig::new()
        .with_color(cli.color.clone().into())
        .with_quiet(cli.quiet);
    let use_color = cli_config.color.should_color();
    console::set_colors_enabled(use_color);
    console::set_colors_enabled_stderr(use_color);
    let reporter = ProgressReporter::new(use_color, cli_config.quiet);

    if cli.verbose {
        reporter.warning(VERBOSE_DEPRECATION);
    }

    let file = FileConfig::discover(cli.config.as_deref())?;
    if let Some((path, _)) = &file {
        reporter.info(&format!("Using config file: {}", path.display()));
    }

    let config = build_acc_config(cli, file.as_ref().map(|(_, config)| config))?;
    tracing::debug!(?config, "starting coverage run");

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(covacc::run(&config, &reporter))?;
    tracing::debug!(
        packages = summary.packages,
        merged = summary.merged,
        output = %summary.output.display(),
        "coverage run finished"
    );

    Ok(())
}
