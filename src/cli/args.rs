/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use crate::split::splitter::DEFAULT_PROGRESS_INTERVAL;

/// linesplit — split large text files into numbered parts.
#[derive(Debug, Parser)]
#[command(
    name = "linesplit",
    about = "Split large text files into parts by part count or lines per file",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers.
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Print plan details and timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only print warnings and errors to stderr (hides progress).
    #[arg(long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Per-part messages and a summary table (human-readable).
    Table,
    /// Part paths only, one per line (for piping to other commands).
    Path,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a file by number of parts or lines per file.
    Split(SplitArgs),
    /// Prompt for the file, split mode and output directory.
    Interactive(InteractiveArgs),
}

/// Arguments for `linesplit split`.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("mode").required(true).args(["parts", "lines"])))]
pub struct SplitArgs {
    /// Text file to split.
    pub input: PathBuf,

    /// Number of parts to produce.
    #[arg(long, short = 'n', value_name = "N")]
    pub parts: Option<usize>,

    /// Maximum number of lines per part.
    #[arg(long, short = 'l', value_name = "N")]
    pub lines: Option<usize>,

    /// Directory for the parts (created if missing). Defaults to the input's directory.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing part files without asking.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Show the planned parts without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Log a progress line every N input lines (0 disables).
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_every: usize,
}

/// Arguments for `linesplit interactive`.
#[derive(Debug, Parser)]
pub struct InteractiveArgs {
    /// Skip the startup banner.
    #[arg(long)]
    pub no_banner: bool,
}
