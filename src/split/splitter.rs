/// The splitting core: overwrite check and the single streaming write pass.
///
/// Interaction is injected through two traits so the core never prompts or
/// prints on its own:
///
/// - [`ConfirmOverwrite`] answers the one overwrite question raised before writing.
/// - [`SplitObserver`] receives warnings, finalized parts and progress ticks.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::errors::SplitError;
use super::plan::{OutputPlan, SplitRequest, SplitWarning};

/// Lines between two progress notices.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1_000_000;

/// Write buffer size for each part.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Runtime knobs for the writing pass.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Emit a progress notice every this many input lines. 0 disables progress.
    pub progress_interval: usize,
    /// Capacity of the buffered writer for each part.
    pub buffer_capacity: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Answers the overwrite question raised when planned parts already exist.
pub trait ConfirmOverwrite {
    /// Asked once per run with the first colliding part.
    ///
    /// `Ok(true)` authorizes overwriting every colliding part for the rest of the run.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while obtaining the answer.
    fn confirm_overwrite(&mut self, existing: &Path) -> std::io::Result<bool>;
}

/// A confirmation with a predetermined answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmOverwrite for FixedAnswer {
    fn confirm_overwrite(&mut self, existing: &Path) -> std::io::Result<bool> {
        tracing::debug!(path = %existing.display(), approved = self.0, "overwrite answered");
        Ok(self.0)
    }
}

/// Receives events from a running split.
///
/// The default methods route warnings and progress to the diagnostic log.
pub trait SplitObserver {
    fn warning(&mut self, warning: &SplitWarning) {
        tracing::warn!("{warning}");
    }

    fn part_finished(&mut self, _part: &PartReport) {}

    fn progress(&mut self, processed: usize) {
        tracing::info!("Processed {processed} lines...");
    }
}

/// A finalized part on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReport {
    /// One-based part index.
    pub index: usize,
    pub path: PathBuf,
    pub lines: usize,
    pub bytes: u64,
}

/// Outcome of a completed split.
#[derive(Debug, Clone)]
pub struct Summary {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Threshold the writing pass rolled over at.
    pub lines_per_file: usize,
    pub warnings: Vec<SplitWarning>,
    /// Lines read from the input during the writing pass.
    pub lines_processed: usize,
    /// Finalized parts in index order.
    pub parts: Vec<PartReport>,
}

impl Summary {
    /// Number of part files left on disk.
    #[must_use]
    pub fn files_created(&self) -> usize {
        self.parts.len()
    }
}

/// Splits text files into numbered parts.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    /// Create a splitter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter with custom options.
    #[must_use]
    pub fn with_options(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Validate the request and resolve its plan without writing anything.
    ///
    /// # Errors
    ///
    /// Returns any precondition error from [`OutputPlan::resolve`].
    pub fn plan(&self, request: &SplitRequest) -> Result<OutputPlan, SplitError> {
        let plan = OutputPlan::resolve(request)?;
        tracing::debug!(
            total_lines = plan.total_lines,
            lines_per_file = plan.lines_per_file,
            part_count = plan.part_count,
            "plan resolved"
        );
        Ok(plan)
    }

    /// Plan and perform a split.
    ///
    /// # Errors
    ///
    /// - precondition errors, with no side effects
    /// - `SplitError::Aborted` if the overwrite was declined, with no side effects
    /// - `SplitError::Prompt` if the confirmation could not be obtained
    /// - `SplitError::Io` if reading or writing fails; earlier parts stay on disk
    pub fn split(
        &self,
        request: &SplitRequest,
        confirm: &mut dyn ConfirmOverwrite,
        observer: &mut dyn SplitObserver,
    ) -> Result<Summary, SplitError> {
        let plan = self.plan(request)?;
        self.execute(&plan, confirm, observer)
    }

    /// Perform a split for an already resolved plan.
    ///
    /// # Errors
    ///
    /// See [`Splitter::split`].
    pub fn execute(
        &self,
        plan: &OutputPlan,
        confirm: &mut dyn ConfirmOverwrite,
        observer: &mut dyn SplitObserver,
    ) -> Result<Summary, SplitError> {
        for warning in &plan.warnings {
            observer.warning(warning);
        }

        if let Some(existing) = plan.first_collision() {
            let approved = confirm
                .confirm_overwrite(&existing)
                .map_err(SplitError::Prompt)?;
            if !approved {
                return Err(SplitError::Aborted { existing });
            }
        }

        let dir = plan.naming.dir();
        std::fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;

        self.write_parts(plan, observer)
    }

    fn write_parts(
        &self,
        plan: &OutputPlan,
        observer: &mut dyn SplitObserver,
    ) -> Result<Summary, SplitError> {
        let input = File::open(&plan.input).map_err(|e| SplitError::io(&plan.input, e))?;
        let mut reader = BufReader::new(input);
        let mut line = Vec::new();
        let mut current: Option<PartWriter> = None;
        let mut parts = Vec::with_capacity(plan.part_count);
        let mut processed = 0;

        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| SplitError::io(&plan.input, e))?;
            if n == 0 {
                break;
            }

            // Parts are opened on their first line, so exact division never
            // leaves a trailing empty file behind.
            let mut part = match current.take() {
                Some(part) => part,
                None => {
                    let index = parts.len() + 1;
                    PartWriter::create(index, plan.part_path(index), self.options.buffer_capacity)?
                }
            };
            part.write_line(&line)?;
            processed += 1;

            if part.lines >= plan.lines_per_file {
                let report = part.finish()?;
                observer.part_finished(&report);
                parts.push(report);
            } else {
                current = Some(part);
            }

            if self.options.progress_interval > 0 && processed % self.options.progress_interval == 0
            {
                observer.progress(processed);
            }
        }

        if let Some(part) = current {
            let report = part.finish()?;
            observer.part_finished(&report);
            parts.push(report);
        }

        Ok(Summary {
            input: plan.input.clone(),
            output_dir: plan.naming.dir().to_path_buf(),
            lines_per_file: plan.lines_per_file,
            warnings: plan.warnings.clone(),
            lines_processed: processed,
            parts,
        })
    }
}

/// An open part being filled.
struct PartWriter {
    index: usize,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
    bytes: u64,
}

impl PartWriter {
    fn create(index: usize, path: PathBuf, capacity: usize) -> Result<Self, SplitError> {
        let file = File::create(&path).map_err(|e| SplitError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "part opened");
        Ok(Self {
            index,
            writer: BufWriter::with_capacity(capacity, file),
            path,
            lines: 0,
            bytes: 0,
        })
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), SplitError> {
        self.writer
            .write_all(line)
            .map_err(|e| SplitError::io(&self.path, e))?;
        self.lines += 1;
        self.bytes += line.len() as u64;
        Ok(())
    }

    fn finish(mut self) -> Result<PartReport, SplitError> {
        self.writer
            .flush()
            .map_err(|e| SplitError::io(&self.path, e))?;
        Ok(PartReport {
            index: self.index,
            path: self.path,
            lines: self.lines,
            bytes: self.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        warnings: Vec<SplitWarning>,
        parts: Vec<PartReport>,
        progress: Vec<usize>,
    }

    impl SplitObserver for Recorder {
        fn warning(&mut self, warning: &SplitWarning) {
            self.warnings.push(warning.clone());
        }

        fn part_finished(&mut self, part: &PartReport) {
            self.parts.push(part.clone());
        }

        fn progress(&mut self, processed: usize) {
            self.progress.push(processed);
        }
    }

    /// Records how often it was asked.
    struct CountingAnswer {
        answer: bool,
        asked: Vec<PathBuf>,
    }

    impl ConfirmOverwrite for CountingAnswer {
        fn confirm_overwrite(&mut self, existing: &Path) -> std::io::Result<bool> {
            self.asked.push(existing.to_path_buf());
            Ok(self.answer)
        }
    }

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}\n")).collect()
    }

    fn write_input(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(
        input: &Path,
        parts: Option<usize>,
        lines: Option<usize>,
        recorder: &mut Recorder,
    ) -> Result<Summary, SplitError> {
        let request = SplitRequest::new(input, parts, lines, None)?;
        Splitter::new().split(&request, &mut FixedAnswer(false), recorder)
    }

    fn line_count(path: &Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    fn part_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains("_part"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_ten_lines_into_three_parts() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(10).as_bytes());
        let mut rec = Recorder::default();

        let summary = run(&input, Some(3), None, &mut rec).unwrap();

        assert_eq!(summary.lines_processed, 10);
        assert_eq!(summary.files_created(), 3);
        let counts: Vec<usize> = summary.parts.iter().map(|p| p.lines).collect();
        assert_eq!(counts, vec![4, 4, 2]);
        assert_eq!(line_count(&dir.path().join("combo_part1.txt")), 4);
        assert_eq!(line_count(&dir.path().join("combo_part3.txt")), 2);
        assert_eq!(rec.parts, summary.parts);
    }

    #[test]
    fn test_nine_lines_three_per_file_leaves_no_empty_part() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(9).as_bytes());
        let mut rec = Recorder::default();

        let summary = run(&input, None, Some(3), &mut rec).unwrap();

        assert_eq!(summary.files_created(), 3);
        assert!(summary.parts.iter().all(|p| p.lines == 3));
        assert!(!dir.path().join("combo_part4.txt").exists());
        assert_eq!(
            part_files(dir.path()),
            vec!["combo_part1.txt", "combo_part2.txt", "combo_part3.txt"]
        );
    }

    #[test]
    fn test_nine_lines_into_three_parts() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(9).as_bytes());
        let mut rec = Recorder::default();

        let summary = run(&input, Some(3), None, &mut rec).unwrap();

        assert_eq!(summary.files_created(), 3);
        assert!(summary.parts.iter().all(|p| p.lines == 3));
        assert!(!dir.path().join("combo_part4.txt").exists());
    }

    #[test]
    fn test_part_count_bounds_and_line_sum() {
        for (total, parts) in [(9, 6), (10, 4), (7, 7), (100, 3), (1, 1)] {
            let dir = TempDir::new().unwrap();
            let input = write_input(&dir, "in.txt", numbered_lines(total).as_bytes());
            let mut rec = Recorder::default();

            let summary = run(&input, Some(parts), None, &mut rec).unwrap();

            let per_file = total.div_ceil(parts);
            assert!(summary.files_created() <= parts);
            assert!(summary.files_created() >= total.div_ceil(per_file));
            let sum: usize = summary
                .parts
                .iter()
                .map(|p| line_count(&p.path))
                .sum();
            assert_eq!(sum, total, "total={total} parts={parts}");
        }
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let dir = TempDir::new().unwrap();
        let content = b"alpha\r\nbeta\n\n  gamma  \r\ndelta\nno newline at end";
        let input = write_input(&dir, "mixed.log", content);
        let mut rec = Recorder::default();

        let summary = run(&input, None, Some(2), &mut rec).unwrap();

        assert_eq!(summary.files_created(), 3);
        let mut joined = Vec::new();
        for part in &summary.parts {
            joined.extend(fs::read(&part.path).unwrap());
        }
        assert_eq!(joined, content);
        let bytes: u64 = summary.parts.iter().map(|p| p.bytes).sum();
        assert_eq!(bytes, content.len() as u64);
    }

    #[test]
    fn test_threshold_larger_than_input_writes_one_part_and_warns() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "small.txt", numbered_lines(5).as_bytes());
        let mut rec = Recorder::default();

        let summary = run(&input, None, Some(100), &mut rec).unwrap();

        assert_eq!(summary.files_created(), 1);
        assert_eq!(summary.parts[0].lines, 5);
        assert_eq!(rec.warnings.len(), 1);
    }

    #[test]
    fn test_too_many_parts_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "small.txt", numbered_lines(3).as_bytes());
        let mut rec = Recorder::default();

        let err = run(&input, Some(4), None, &mut rec).unwrap_err();

        assert!(matches!(
            err,
            SplitError::TooManyParts {
                parts: 4,
                total_lines: 3
            }
        ));
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "empty.txt", b"");
        let mut rec = Recorder::default();

        let err = run(&input, Some(1), None, &mut rec).unwrap_err();

        assert!(matches!(err, SplitError::EmptyInput { .. }));
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let mut rec = Recorder::default();
        let err = run(&dir.path().join("nope.txt"), Some(1), None, &mut rec).unwrap_err();
        assert!(matches!(err, SplitError::NotFound { .. }));
    }

    #[test]
    fn test_declined_overwrite_leaves_files_untouched() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(6).as_bytes());
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("combo_part2.txt"), "keep me\n").unwrap();
        fs::write(out.join("combo_part3.txt"), "me too\n").unwrap();

        let request = SplitRequest::new(&input, Some(3), None, Some(out.clone())).unwrap();
        let mut confirm = CountingAnswer {
            answer: false,
            asked: Vec::new(),
        };
        let err = Splitter::new()
            .split(&request, &mut confirm, &mut Recorder::default())
            .unwrap_err();

        assert!(matches!(err, SplitError::Aborted { .. }));
        assert_eq!(confirm.asked, vec![out.join("combo_part2.txt")]);
        assert!(!out.join("combo_part1.txt").exists());
        assert_eq!(fs::read_to_string(out.join("combo_part2.txt")).unwrap(), "keep me\n");
        assert_eq!(fs::read_to_string(out.join("combo_part3.txt")).unwrap(), "me too\n");
    }

    #[test]
    fn test_approved_overwrite_asks_once_and_replaces_all() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(6).as_bytes());
        fs::write(dir.path().join("combo_part1.txt"), "stale\n").unwrap();
        fs::write(dir.path().join("combo_part3.txt"), "stale\n").unwrap();

        let request = SplitRequest::new(&input, Some(3), None, None).unwrap();
        let mut confirm = CountingAnswer {
            answer: true,
            asked: Vec::new(),
        };
        let summary = Splitter::new()
            .split(&request, &mut confirm, &mut Recorder::default())
            .unwrap();

        assert_eq!(confirm.asked.len(), 1);
        assert_eq!(summary.files_created(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("combo_part3.txt")).unwrap(),
            "line 5\nline 6\n"
        );
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(2).as_bytes());
        let out = dir.path().join("fresh").join("nested");

        let request = SplitRequest::new(&input, None, Some(1), Some(out.clone())).unwrap();
        let summary = Splitter::new()
            .split(&request, &mut FixedAnswer(false), &mut Recorder::default())
            .unwrap();

        // No collisions, so the answer is never consulted and the directory is created.
        assert_eq!(summary.files_created(), 2);
        assert!(out.join("combo_part2.txt").exists());
    }

    #[test]
    fn test_invalid_utf8_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "bin.txt", b"fine\n\xc3\x28\n");
        let mut rec = Recorder::default();

        let err = run(&input, None, Some(1), &mut rec).unwrap_err();

        assert!(matches!(err, SplitError::InvalidEncoding { line: 2, .. }));
        assert!(part_files(dir.path()).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_finished_parts() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "combo.txt", numbered_lines(6).as_bytes());
        // A directory squatting on the second part's name makes its creation fail.
        fs::create_dir(dir.path().join("combo_part2.txt")).unwrap();

        let request = SplitRequest::new(&input, None, Some(2), None).unwrap();
        let err = Splitter::new()
            .split(&request, &mut FixedAnswer(true), &mut Recorder::default())
            .unwrap_err();

        let SplitError::Io { path, .. } = &err else {
            panic!("expected an I/O error, got {err:?}");
        };
        assert_eq!(*path, dir.path().join("combo_part2.txt"));
        assert_eq!(
            fs::read_to_string(dir.path().join("combo_part1.txt")).unwrap(),
            "line 1\nline 2\n"
        );
        assert!(!dir.path().join("combo_part3.txt").exists());
    }

    #[test]
    fn test_progress_interval() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "in.txt", numbered_lines(25).as_bytes());
        let request = SplitRequest::new(&input, Some(2), None, None).unwrap();
        let splitter = Splitter::with_options(SplitOptions {
            progress_interval: 10,
            ..SplitOptions::default()
        });
        let mut rec = Recorder::default();

        splitter
            .split(&request, &mut FixedAnswer(false), &mut rec)
            .unwrap();

        assert_eq!(rec.progress, vec![10, 20]);
    }
}
