#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! linesplit — split large text files into numbered parts.

mod cli;
mod commands;
mod split;
mod types;

use clap::Parser;
use tracing::Level;

use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    init_logging(&cli);

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header, cli.debug);

    match commands::dispatch(&cli.command, &ctx) {
        Ok(()) => {}
        Err(err) => {
            let error_output = ErrorOutput::from_split_error(&err);
            write_error(&error_output, &ctx);
            std::process::exit(err.exit_code());
        }
    }
}

/// Diagnostics (progress, warnings, timings) go to stderr so stdout only carries results.
fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}
