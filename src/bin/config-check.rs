//! Pipeline gate: exits non-zero when required environment variables are missing.

use std::process::ExitCode;

use clap::Parser;

use demo_app::validate::check_env;

/// Check that the variables demo-app needs are present
#[derive(Parser, Debug)]
#[command(name = "config-check", version, about)]
struct Args {}

fn main() -> ExitCode {
    let _args = Args::parse();

    match check_env() {
        Ok(()) => {
            println!("Config health check passed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
