use std::process::ExitCode;

use pucoti::app;

fn main() -> ExitCode {
    app::init_logging();
    let argv = std::env::args().collect();
    let config = match app::load_config(argv) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = app::run(config) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
