use std::process::ExitCode;

use organizer_core::cli;

fn main() -> ExitCode {
    organizer_core::init();
    match cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("organizer_core_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
