//! formship - dependency-aware deployment ordering for form definitions

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = formship_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
