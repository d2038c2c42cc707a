use httpres_core::logging;

mod cli;

use crate::cli::{error_report, CliCommand};

fn main() {
    // Initialize logging as early as possible; stdout stays reserved for the response.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::debug!("file logging unavailable: {}", e);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("{}", error_report(&err));
        std::process::exit(1);
    }
}
