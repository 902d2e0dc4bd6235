use std::process::exit;

use chrono::Local;
use clap::Parser;
use daynight_cli::logging::init_tracing;
use daynight_cli::{run, Cli};
use daynight_core::render_console;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match cli.resolve().and_then(|config| run(&config, Local::now())) {
        Ok(outcome) => {
            print!("{}", render_console(&outcome.report));
            println!("Output written to {}", outcome.output_root.display());
        }
        Err(error) => {
            eprintln!("error: {error}");
            exit(error.exit_code());
        }
    }
}
