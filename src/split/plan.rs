/// Split planning: request validation, the counting pass, and part naming.
///
/// A plan is resolved before any output file is touched, so every error
/// raised here leaves the filesystem exactly as it was.
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::errors::SplitError;

/// How the input should be partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Produce at most this many parts of roughly equal length.
    PartCount(usize),
    /// Put at most this many lines into each part.
    LinesPerFile(usize),
}

impl SplitMode {
    /// Build a mode from the two mutually exclusive optional parameters.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidMode` when both or neither are given, or
    /// when the given value is zero.
    pub fn from_options(parts: Option<usize>, lines: Option<usize>) -> Result<Self, SplitError> {
        match (parts, lines) {
            (Some(_), Some(_)) => Err(SplitError::invalid_mode(
                "provide either number of files or lines per file, not both",
            )),
            (None, None) => Err(SplitError::invalid_mode(
                "provide either number of files or lines per file",
            )),
            (Some(0), None) => Err(SplitError::invalid_mode(
                "number of parts must be a positive integer",
            )),
            (None, Some(0)) => Err(SplitError::invalid_mode(
                "lines per file must be a positive integer",
            )),
            (Some(n), None) => Ok(Self::PartCount(n)),
            (None, Some(n)) => Ok(Self::LinesPerFile(n)),
        }
    }
}

/// A fully validated split request.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// File to split.
    pub input: PathBuf,
    /// Partitioning policy.
    pub mode: SplitMode,
    /// Directory for the parts. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
}

impl SplitRequest {
    /// Construct a request from raw CLI-style parameters.
    ///
    /// The input file is checked before the split parameters.
    ///
    /// # Errors
    ///
    /// - `SplitError::NotFound` / `SplitError::EmptyInput` for a bad input path
    /// - `SplitError::InvalidMode` if the split parameters are not exactly one
    ///   positive value
    pub fn new(
        input: impl Into<PathBuf>,
        parts: Option<usize>,
        lines: Option<usize>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self, SplitError> {
        let input = input.into();
        validate_input(&input)?;
        Ok(Self {
            mode: SplitMode::from_options(parts, lines)?,
            input,
            output_dir,
        })
    }

    /// The directory parts will be written to.
    #[must_use]
    pub fn resolved_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Non-fatal conditions noticed while planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitWarning {
    /// `lines_per_file` is larger than the whole input; one part will be produced.
    ThresholdExceedsInput {
        lines_per_file: usize,
        total_lines: usize,
    },
}

impl fmt::Display for SplitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdExceedsInput {
                lines_per_file,
                total_lines,
            } => write!(
                f,
                "Number of lines per file ({lines_per_file}) is greater than total lines \
                 ({total_lines}). Only one file will be created."
            ),
        }
    }
}

/// Naming scheme for parts: `{stem}_part{idx}{.ext}` inside `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartNaming {
    dir: PathBuf,
    stem: OsString,
    extension: Option<OsString>,
}

impl PartNaming {
    /// Derive the naming scheme from the input file name.
    #[must_use]
    pub fn new(input: &Path, dir: PathBuf) -> Self {
        let stem = input
            .file_stem()
            .map_or_else(|| OsString::from("output"), OsStr::to_os_string);
        Self {
            dir,
            stem,
            extension: input.extension().map(OsStr::to_os_string),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the part with the given one-based index.
    #[must_use]
    pub fn part_path(&self, index: usize) -> PathBuf {
        let mut name = self.stem.clone();
        name.push(format!("_part{index}"));
        if let Some(ext) = &self.extension {
            name.push(".");
            name.push(ext);
        }
        self.dir.join(name)
    }
}

/// A part the plan expects to produce.
#[derive(Debug, Clone)]
pub struct PlannedPart {
    pub index: usize,
    pub path: PathBuf,
    pub lines: usize,
    /// Whether a file already sits at `path`.
    pub exists: bool,
}

/// The concrete partitioning derived from a request and the input's length.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub input: PathBuf,
    pub naming: PartNaming,
    pub total_lines: usize,
    /// Threshold at which a part is finalized. Always >= 1.
    pub lines_per_file: usize,
    /// Number of parts the writing pass will finalize. Always >= 1.
    pub part_count: usize,
    pub warnings: Vec<SplitWarning>,
}

impl OutputPlan {
    /// Validate the input, run the counting pass and derive the plan.
    ///
    /// # Errors
    ///
    /// - `SplitError::NotFound` / `SplitError::EmptyInput` for a bad input path
    /// - `SplitError::InvalidEncoding` if a line is not UTF-8
    /// - `SplitError::TooManyParts` if more parts than lines were requested
    /// - `SplitError::Io` if the input cannot be read
    pub fn resolve(request: &SplitRequest) -> Result<Self, SplitError> {
        validate_input(&request.input)?;
        let total_lines = count_lines(&request.input)?;
        Self::from_line_count(request, total_lines)
    }

    /// Derive the plan for an input already known to hold `total_lines` lines.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::TooManyParts` if more parts than lines were requested,
    /// and `SplitError::InvalidMode` for a zero-valued mode.
    pub fn from_line_count(request: &SplitRequest, total_lines: usize) -> Result<Self, SplitError> {
        let mut warnings = Vec::new();
        let lines_per_file = match request.mode {
            SplitMode::PartCount(0) | SplitMode::LinesPerFile(0) => {
                return Err(SplitError::invalid_mode("split value must be positive"));
            }
            SplitMode::PartCount(parts) => {
                if total_lines < parts {
                    return Err(SplitError::TooManyParts { parts, total_lines });
                }
                total_lines.div_ceil(parts)
            }
            SplitMode::LinesPerFile(lines) => {
                if lines > total_lines {
                    warnings.push(SplitWarning::ThresholdExceedsInput {
                        lines_per_file: lines,
                        total_lines,
                    });
                }
                lines
            }
        };

        let part_count = total_lines.div_ceil(lines_per_file).max(1);

        Ok(Self {
            input: request.input.clone(),
            naming: PartNaming::new(&request.input, request.resolved_output_dir()),
            total_lines,
            lines_per_file,
            part_count,
            warnings,
        })
    }

    /// Path of the part with the given one-based index.
    #[must_use]
    pub fn part_path(&self, index: usize) -> PathBuf {
        self.naming.part_path(index)
    }

    /// Lines the part with the given one-based index will hold.
    #[must_use]
    pub fn expected_lines(&self, index: usize) -> usize {
        if index == 0 || index > self.part_count {
            return 0;
        }
        if index < self.part_count {
            self.lines_per_file
        } else {
            self.total_lines - self.lines_per_file * (self.part_count - 1)
        }
    }

    /// Every part the writing pass will produce, in index order.
    #[must_use]
    pub fn parts(&self) -> Vec<PlannedPart> {
        (1..=self.part_count)
            .map(|index| {
                let path = self.part_path(index);
                PlannedPart {
                    index,
                    exists: path.exists(),
                    lines: self.expected_lines(index),
                    path,
                }
            })
            .collect()
    }

    /// The first planned part path that already exists, if any.
    #[must_use]
    pub fn first_collision(&self) -> Option<PathBuf> {
        (1..=self.part_count)
            .map(|index| self.part_path(index))
            .find(|path| path.exists())
    }
}

/// Check that `path` names a non-empty regular file.
///
/// # Errors
///
/// Returns `SplitError::NotFound` or `SplitError::EmptyInput`.
pub fn validate_input(path: &Path) -> Result<(), SplitError> {
    let not_found = || SplitError::NotFound {
        path: path.to_path_buf(),
    };
    let meta = std::fs::metadata(path).map_err(|_| not_found())?;
    if !meta.is_file() {
        return Err(not_found());
    }
    if meta.len() == 0 {
        return Err(SplitError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Count the lines of a file, checking that each one is valid UTF-8.
///
/// A trailing line without a terminator counts as a line.
///
/// # Errors
///
/// Returns `SplitError::Io` on read failure and `SplitError::InvalidEncoding`
/// on the first line that does not decode.
pub fn count_lines(path: &Path) -> Result<usize, SplitError> {
    let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| SplitError::io(path, e))?;
        if n == 0 {
            break;
        }
        count += 1;
        if std::str::from_utf8(&buf).is_err() {
            return Err(SplitError::InvalidEncoding {
                path: path.to_path_buf(),
                line: count,
            });
        }
    }
    Ok(count)
}
