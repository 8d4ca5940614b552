//! # Pipeline Runner
//!
//! Launches every step as its own process, strictly one after another, and
//! stops at the first non-zero exit. The runner only ever sees exit codes and
//! wall-clock durations; step state travels through the local files.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use crate::error::FlowError;
use crate::steps::StepKind;

const SEPARATOR_WIDTH: usize = 72;

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AllSucceeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Index into the step list of the step being executed.
    Running(usize),
    Finished(Verdict),
}

impl RunState {
    pub fn start(total: usize) -> Self {
        if total == 0 {
            RunState::Finished(Verdict::Failed)
        } else {
            RunState::Running(0)
        }
    }

    /// Transition after the current step exits.
    pub fn advance(self, succeeded: bool, total: usize) -> Self {
        match self {
            RunState::Running(_) if !succeeded => RunState::Finished(Verdict::Failed),
            RunState::Running(i) if i + 1 < total => RunState::Running(i + 1),
            RunState::Running(_) => RunState::Finished(Verdict::AllSucceeded),
            other => other,
        }
    }
}

/// What a launcher observed about one step process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the process was terminated without an exit code.
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

/// Starts step processes. Split out so the runner can be driven without
/// real executables.
pub trait StepLauncher {
    /// Fail if the step's executable is not present.
    fn locate(&self, step: StepKind) -> Result<PathBuf, FlowError>;

    /// Run the step to completion.
    fn launch(&mut self, step: StepKind) -> std::io::Result<ExitReport>;
}

/// Launches the step binaries installed next to the runner.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    bin_dir: PathBuf,
    forwarded_args: Vec<OsString>,
}

impl ProcessLauncher {
    pub fn new(bin_dir: impl Into<PathBuf>, forwarded_args: Vec<OsString>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            forwarded_args,
        }
    }

    pub fn executable(&self, step: StepKind) -> PathBuf {
        self.bin_dir.join(format!(
            "{}{}",
            step.binary_name(),
            std::env::consts::EXE_SUFFIX
        ))
    }
}

impl StepLauncher for ProcessLauncher {
    fn locate(&self, step: StepKind) -> Result<PathBuf, FlowError> {
        let path = self.executable(step);
        if path.is_file() {
            Ok(path)
        } else {
            Err(FlowError::MissingFile(path))
        }
    }

    fn launch(&mut self, step: StepKind) -> std::io::Result<ExitReport> {
        let status = Command::new(self.executable(step))
            .args(&self.forwarded_args)
            .status()?;
        Ok(ExitReport {
            code: status.code(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub step: StepKind,
    pub success: bool,
    pub duration: Duration,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
    pub verdict: Verdict,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.verdict == Verdict::AllSucceeded
    }
}

pub struct PipelineRunner<L> {
    launcher: L,
    steps: Vec<StepKind>,
    state: RunState,
}

impl<L: StepLauncher> PipelineRunner<L> {
    pub fn new(launcher: L, steps: impl Into<Vec<StepKind>>) -> Self {
        Self {
            launcher,
            steps: steps.into(),
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every executable must exist before the first step starts.
    pub fn preflight(&self) -> Result<(), FlowError> {
        for step in &self.steps {
            let path = self.launcher.locate(*step)?;
            tracing::debug!(step = %step, path = %path.display(), "step located");
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<RunReport, FlowError> {
        self.preflight()?;

        let total = self.steps.len();
        let mut outcomes = Vec::with_capacity(total);
        self.state = RunState::start(total);

        while let RunState::Running(index) = self.state {
            let step = self.steps[index];
            let outcome = self.execute(step);
            self.state = self.state.advance(outcome.success, total);
            outcomes.push(outcome);
        }

        let verdict = match self.state {
            RunState::Finished(verdict) => verdict,
            _ => Verdict::Failed,
        };
        Ok(RunReport { outcomes, verdict })
    }

    fn execute(&mut self, step: StepKind) -> StepOutcome {
        println!("\n{}", "#".repeat(SEPARATOR_WIDTH));
        println!("\nRunning {} ({step})...", step.binary_name());
        tracing::info!(step = %step, "launching step");

        let started = Instant::now();
        let result = self.launcher.launch(step);
        let duration = started.elapsed();

        let (success, details) = match result {
            Ok(exit) if exit.success() => (true, "Completed successfully".to_string()),
            Ok(ExitReport { code: Some(code) }) => (false, format!("Exited with code {code}")),
            Ok(ExitReport { code: None }) => (false, "Terminated without an exit code".to_string()),
            Err(e) => (false, format!("Failed to launch: {e}")),
        };
        tracing::info!(
            step = %step,
            success,
            duration_ms = duration.as_millis() as u64,
            "step finished"
        );

        StepOutcome {
            step,
            success,
            duration,
            details,
        }
    }
}

/// Directory holding the step executables: `override_dir` when given, else
/// the directory of the running executable.
pub fn default_bin_dir(override_dir: Option<&Path>) -> std::io::Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Table of attempted steps followed by the overall verdict.
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "#".repeat(SEPARATOR_WIDTH));
    let _ = writeln!(out, "Execution summary:");
    let _ = writeln!(
        out,
        "{:<4} {:<24} {:>10}  {:<8} {}",
        "#", "Scenario", "Duration", "Outcome", "Details"
    );
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<24} {:>9.2}s  {:<8} {}",
            i + 1,
            outcome.step.binary_name(),
            outcome.duration.as_secs_f64(),
            if outcome.success { "Success" } else { "Failure" },
            if outcome.success { "" } else { outcome.details.as_str() },
        );
    }
    let verdict = match report.verdict {
        Verdict::AllSucceeded => "All Book Store steps executed successfully.",
        Verdict::Failed => "At least one Book Store step failed.",
    };
    let _ = writeln!(out, "\n{verdict}");
    out
}
