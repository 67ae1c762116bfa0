/// CLI layer: argument parsing, output formatting and the interactive dialogue.
pub mod args;
pub mod output;
pub mod prompt;

pub use args::Cli;
pub use output::{OutputCtx, write_error};
