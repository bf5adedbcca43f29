use clap::Parser;
use npmctl::cli::{execute_command, Cli};
use npmctl::utils::init_logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose) {
        eprintln!("npmctl: {}", e);
    }

    if let Err(e) = execute_command(cli) {
        eprintln!("npmctl: {}", e);
        std::process::exit(1);
    }
}
