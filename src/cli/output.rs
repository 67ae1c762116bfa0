/// Output formatting: JSON, table, path modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::split::{PartReport, SplitObserver};
use crate::types::{ErrorOutput, PlanOutput, SummaryOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// When true, log timing spans for each stage.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            debug,
        }
    }

    /// Start a named debug timer. Logs elapsed time on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }

    fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Compact)
    }
}

// --- Live part reporting ---

/// Observer that reports each finalized part on stdout as it is written.
///
/// JSON formats stay silent until the final summary so stdout remains one document.
pub struct PartPrinter<'a> {
    ctx: &'a OutputCtx,
}

impl<'a> PartPrinter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputCtx) -> Self {
        Self { ctx }
    }
}

impl SplitObserver for PartPrinter<'_> {
    fn part_finished(&mut self, part: &PartReport) {
        match self.ctx.format {
            OutputFormat::Path => println!("{}", part.path.display()),
            OutputFormat::Table | OutputFormat::Auto => {
                println!("Created: {} ({} lines)", part.path.display(), part.lines);
            }
            OutputFormat::Json | OutputFormat::Compact => {}
        }
    }
}

// --- Summary ---

/// Write the result of a completed split to stdout.
pub fn write_summary(summary: &SummaryOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Compact => print_compact_json(summary),
        // Paths were already streamed by `PartPrinter`.
        OutputFormat::Path => {}
        OutputFormat::Table | OutputFormat::Auto => write_summary_table(summary, ctx),
    }
}

fn write_summary_table(summary: &SummaryOutput, ctx: &OutputCtx) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["PART", "PATH", "LINES", "BYTES"]);
    }
    for part in &summary.parts {
        table.add_row([
            part.index.to_string(),
            part.path.clone(),
            part.lines.to_string(),
            part.bytes.to_string(),
        ]);
    }
    println!();
    println!("{table}");
    println!(
        "Summary: {} lines processed, {} file(s) created.",
        summary.lines_processed, summary.files_created
    );
}

// --- Plan (dry-run) ---

/// Write a split plan to stdout.
pub fn write_plan(plan: &PlanOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(plan),
        OutputFormat::Compact => print_compact_json(plan),
        OutputFormat::Path => {
            for part in &plan.parts {
                println!("{}", part.path);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => write_plan_table(plan, ctx),
    }
}

fn write_plan_table(plan: &PlanOutput, ctx: &OutputCtx) {
    for warning in &plan.warnings {
        println!("Warning: {warning}");
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["PART", "PATH", "LINES", "EXISTS"]);
    }
    for part in &plan.parts {
        table.add_row([
            part.index.to_string(),
            part.path.clone(),
            part.lines.to_string(),
            (if part.exists { "overwrite" } else { "" }).to_owned(),
        ]);
    }
    println!("{table}");
    println!(
        "Plan: {} lines into {} part(s) of up to {} lines [dry-run]",
        plan.total_lines, plan.part_count, plan.lines_per_file
    );
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, ctx: &OutputCtx) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    if ctx.is_json() {
        let s = serde_json::to_string_pretty(err).unwrap_or_default();
        let _ = writeln!(out, "{s}");
    } else {
        let _ = writeln!(out, "Error: {}", err.error.message);
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds at debug level on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            tracing::debug!("{}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}
