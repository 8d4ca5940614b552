use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    bookstore_flow::cli::run_pipeline()
}
