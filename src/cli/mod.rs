//! # Command-line entry points
//!
//! Every step binary and the runner share [`CommonArgs`]; the runner forwards
//! them verbatim to each child process so all steps see the same files and
//! base URL.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, CommandFactory, FromArgMatches, Parser};

use crate::environment::{
    DEFAULT_BASE_URL, DEFAULT_BOOKS_FILE, DEFAULT_ENV_FILE, FlowConfig, REQUEST_TIMEOUT,
};
use crate::http::ReqwestTransport;
use crate::logging;
use crate::steps::StepKind;
use crate::testing::{self, PipelineRunner, ProcessLauncher};

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Base URL of the Book Store API
    #[arg(long, env = "BOOKSTORE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Key=value file holding credentials, user id and token
    #[arg(long, env = "BOOKSTORE_ENV_FILE", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// JSON file holding the ISBN-to-title catalog
    #[arg(long, env = "BOOKSTORE_BOOKS_FILE", default_value = DEFAULT_BOOKS_FILE)]
    pub books_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl CommonArgs {
    pub fn config(&self) -> FlowConfig {
        FlowConfig {
            base_url: self.base_url.clone(),
            env_file: self.env_file.clone(),
            books_file: self.books_file.clone(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// The same flags, rendered for a child process.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "--base-url".into(),
            self.base_url.clone().into(),
            "--env-file".into(),
            self.env_file.clone().into(),
            "--books-file".into(),
            self.books_file.clone().into(),
            "--log-level".into(),
            self.log_level.clone().into(),
        ]
    }
}

/// Arguments of a single step binary.
#[derive(Debug, Parser)]
#[command(version)]
pub struct StepCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments of the pipeline runner.
#[derive(Debug, Parser)]
#[command(
    name = "bookstore-flow",
    version,
    about = "Run the Book Store API workflow steps in order, halting on the first failure"
)]
pub struct RunnerCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory containing the step executables (default: next to this binary)
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,
}

/// Exit code for a failed parse: 0 for `--help` and `--version`, 1 otherwise.
pub fn parse_failure_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { 1 } else { 0 }
}

fn report_parse_failure(err: &clap::Error) -> ExitCode {
    // Printing only fails when the terminal is gone.
    let _ = err.print();
    ExitCode::from(parse_failure_code(err))
}

/// `main` of every step binary. Failures are printed and mapped to exit 1.
pub fn run_step(step: StepKind) -> ExitCode {
    let cli = match StepCli::command()
        .name(step.binary_name())
        .try_get_matches()
        .and_then(|matches| StepCli::from_arg_matches(&matches))
    {
        Ok(cli) => cli,
        Err(err) => return report_parse_failure(&err),
    };
    logging::init(&cli.common.log_level);

    let config = cli.common.config();
    tracing::debug!(step = %step, base_url = %config.base_url, "starting step");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            println!("Failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let transport = ReqwestTransport::new(config.timeout)?;
        step.execute(&config, &transport).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(step = %step, category = err.category(), "step failed");
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// `main` of the runner binary.
pub fn run_pipeline() -> anyhow::Result<ExitCode> {
    let cli = match RunnerCli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return Ok(report_parse_failure(&err)),
    };
    logging::init(&cli.common.log_level);

    let bin_dir = testing::default_bin_dir(cli.bin_dir.as_deref())
        .context("Failed to resolve the step executable directory")?;
    let launcher = ProcessLauncher::new(bin_dir, cli.common.to_args());
    let mut runner = PipelineRunner::new(launcher, StepKind::ALL);

    let report = runner.run().context("Execution failed")?;
    print!("{}", testing::render_summary(&report));

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_args_default_to_local_files() {
        let cli = StepCli::try_parse_from(["bookstore-create-user"]).unwrap();
        let config = cli.common.config();
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert_eq!(config.books_file, PathBuf::from("test_books.json"));
        assert_eq!(config.timeout, REQUEST_TIMEOUT);
    }

    #[test]
    fn forwarded_args_parse_back_to_the_same_values() {
        let runner = RunnerCli::try_parse_from([
            "bookstore-flow",
            "--base-url",
            "http://localhost:9000",
            "--env-file",
            "/tmp/state.env",
            "--bin-dir",
            "/opt/bookstore",
        ])
        .unwrap();
        assert_eq!(runner.bin_dir, Some(PathBuf::from("/opt/bookstore")));

        let mut child_argv: Vec<OsString> = vec!["bookstore-get-user".into()];
        child_argv.extend(runner.common.to_args());
        let child = StepCli::try_parse_from(child_argv).unwrap();

        assert_eq!(child.common.base_url, "http://localhost:9000");
        assert_eq!(child.common.env_file, PathBuf::from("/tmp/state.env"));
        assert_eq!(child.common.books_file, runner.common.books_file);
        assert_eq!(child.common.log_level, runner.common.log_level);
    }

    #[test]
    fn unknown_flags_exit_with_one() {
        let err = StepCli::try_parse_from(["bookstore-get-user", "--bogus"]).unwrap_err();
        assert_eq!(parse_failure_code(&err), 1);

        let err = RunnerCli::try_parse_from(["bookstore-flow", "--bin-dir"]).unwrap_err();
        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn help_and_version_exit_with_zero() {
        for flag in ["--help", "--version"] {
            let err = StepCli::try_parse_from(["bookstore-get-user", flag]).unwrap_err();
            assert_eq!(parse_failure_code(&err), 0, "{flag}");

            let err = RunnerCli::try_parse_from(["bookstore-flow", flag]).unwrap_err();
            assert_eq!(parse_failure_code(&err), 0, "{flag}");
        }
    }

    #[test]
    fn clap_definitions_are_consistent() {
        StepCli::command().debug_assert();
        RunnerCli::command().debug_assert();
    }
}
