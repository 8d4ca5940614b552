use std::process::ExitCode;

use bookstore_flow::steps::StepKind;

fn main() -> ExitCode {
    bookstore_flow::cli::run_step(StepKind::CreateUser)
}
