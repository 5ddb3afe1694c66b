mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = commands::run(&cli).await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

/// Warnings by default; `-v` / `-vv` raise the level. `RUST_LOG` still wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}
