//! Binary entrypoint for the `llamagate` server.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is normal; the token may come from the real environment.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(err) if err.not_found() => {}
        Err(err) => eprintln!("Warning: failed to load .env: {err}"),
    }
    llamagate::init_logging();

    match llamagate::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
