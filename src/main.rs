use std::process::ExitCode;

use dbvc::ui::output;

fn main() -> ExitCode {
    match dbvc::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
