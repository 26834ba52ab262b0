use M2Tune::cli::cli_main::run_cli;
use log::error;

pub fn main() {
    if let Err(e) = run_cli() {
        error!("{}", e);
        std::process::exit(1);
    }
}
