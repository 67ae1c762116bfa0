/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the core `PartReport` / `OutputPlan` types.
use serde::{Deserialize, Serialize};

use crate::split::{OutputPlan, PartReport, SplitError, Summary};

/// A part file written by the split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartOutput {
    /// One-based part index.
    pub index: usize,
    /// Path of the part file.
    pub path: String,
    /// Lines written to the part.
    pub lines: usize,
    /// Bytes written to the part.
    pub bytes: u64,
}

impl From<&PartReport> for PartOutput {
    fn from(part: &PartReport) -> Self {
        Self {
            index: part.index,
            path: part.path.display().to_string(),
            lines: part.lines,
            bytes: part.bytes,
        }
    }
}

/// Result of a completed split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Input file that was split.
    pub input: String,
    /// Directory the parts were written to.
    pub output_dir: String,
    /// Lines per part threshold used by the writing pass.
    pub lines_per_file: usize,
    /// Lines read during the writing pass.
    pub lines_processed: usize,
    /// Number of part files left on disk.
    pub files_created: usize,
    /// Every part, in index order.
    pub parts: Vec<PartOutput>,
    /// Planning warnings, if any.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl From<&Summary> for SummaryOutput {
    fn from(summary: &Summary) -> Self {
        Self {
            input: summary.input.display().to_string(),
            output_dir: summary.output_dir.display().to_string(),
            lines_per_file: summary.lines_per_file,
            lines_processed: summary.lines_processed,
            files_created: summary.files_created(),
            parts: summary.parts.iter().map(PartOutput::from).collect(),
            warnings: summary.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A part the plan expects to write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPartOutput {
    /// One-based part index.
    pub index: usize,
    /// Path the part will be written to.
    pub path: String,
    /// Lines the part will hold.
    pub lines: usize,
    /// Whether a file already exists at `path` and would be overwritten.
    pub exists: bool,
}

/// Result of `split --dry-run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutput {
    /// Input file.
    pub input: String,
    /// Directory the parts would be written to.
    pub output_dir: String,
    /// Lines counted in the input.
    pub total_lines: usize,
    /// Lines per part threshold.
    pub lines_per_file: usize,
    /// Number of parts that would be written.
    pub part_count: usize,
    /// Planned parts, in index order.
    pub parts: Vec<PlannedPartOutput>,
    /// Planning warnings, if any.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl From<&OutputPlan> for PlanOutput {
    fn from(plan: &OutputPlan) -> Self {
        Self {
            input: plan.input.display().to_string(),
            output_dir: plan.naming.dir().display().to_string(),
            total_lines: plan.total_lines,
            lines_per_file: plan.lines_per_file,
            part_count: plan.part_count,
            parts: plan
                .parts()
                .into_iter()
                .map(|p| PlannedPartOutput {
                    index: p.index,
                    path: p.path.display().to_string(),
                    lines: p.lines,
                    exists: p.exists,
                })
                .collect(),
            warnings: plan.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// File the error concerns, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorOutput {
    /// Construct from a `SplitError`.
    #[must_use]
    pub fn from_split_error(err: &SplitError) -> Self {
        let (code, path) = match err {
            SplitError::NotFound { path } => ("not_found", Some(path)),
            SplitError::EmptyInput { path } => ("empty_input", Some(path)),
            SplitError::InvalidMode { .. } => ("invalid_mode", None),
            SplitError::TooManyParts { .. } => ("too_many_parts", None),
            SplitError::InvalidEncoding { path, .. } => ("invalid_encoding", Some(path)),
            SplitError::Io { path, .. } => ("io_error", Some(path)),
            SplitError::Prompt(_) => ("prompt_failed", None),
            SplitError::Aborted { existing } => ("aborted", Some(existing)),
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: err.to_string(),
                path: path.map(|p| p.display().to_string()),
            },
        }
    }
}
