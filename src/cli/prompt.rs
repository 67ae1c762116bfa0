/// Interactive dialogue: prompt loops, the banner, and terminal overwrite confirmation.
///
/// Everything here sits outside the splitting core and talks to it only through
/// `SplitRequest` and the `ConfirmOverwrite` trait.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::split::{ConfirmOverwrite, SplitError, SplitRequest};

const BANNER_TEXT: &str = "linesplit";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Whether an answer to a yes/no question means yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Print the startup banner, colored when `color` is set.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_banner(out: &mut impl Write, color: bool) -> io::Result<()> {
    let separator = "=".repeat(BANNER_TEXT.len() + 4);
    let (start, end) = if color { (GREEN, RESET) } else { ("", "") };
    writeln!(out, "{start}{separator}")?;
    writeln!(out, "  {BANNER_TEXT}  ")?;
    writeln!(out, "{separator}{end}")
}

/// Line-oriented question/answer dialogue over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Mutable access to the prompt output stream.
    #[must_use]
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Write `question` and read one trimmed line of answer.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when the input is exhausted.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(answer.trim().to_owned())
    }

    /// Ask for a path until it names an existing file.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the dialogue.
    pub fn ask_input_path(&mut self) -> io::Result<PathBuf> {
        loop {
            let answer = self.ask("Enter the path to the text file to split: ")?;
            let path = PathBuf::from(&answer);
            if path.is_file() {
                return Ok(path);
            }
            writeln!(self.output, "File '{answer}' not found. Please try again.")?;
        }
    }

    /// Ask for a positive integer until one is given.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the dialogue.
    pub fn ask_positive(&mut self, question: &str) -> io::Result<usize> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<usize>() {
                Ok(n) if n > 0 => return Ok(n),
                Ok(_) => writeln!(self.output, "Please enter a positive integer.")?,
                // Negative numbers fail the unsigned parse but are still integers.
                Err(_) if answer.parse::<i64>().is_ok() => {
                    writeln!(self.output, "Please enter a positive integer.")?;
                }
                Err(_) => writeln!(self.output, "Please enter a valid integer.")?,
            }
        }
    }

    /// Ask for the output directory. A blank answer keeps the input's directory.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the dialogue.
    pub fn ask_output_dir(&mut self) -> io::Result<Option<PathBuf>> {
        let answer = self.ask("Enter output directory (leave blank for same as input file): ")?;
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }

    /// Run the full dialogue and build a request from the answers.
    ///
    /// # Errors
    ///
    /// - `SplitError::InvalidMode` if the split choice is neither `1` nor `2`
    /// - `SplitError::Prompt` if the dialogue fails or input ends early
    pub fn ask_request(&mut self) -> Result<SplitRequest, SplitError> {
        let input = self.ask_input_path().map_err(SplitError::Prompt)?;

        let choice = self
            .ask(
                "How would you like to split the file?\n\
                 1. By number of parts\n\
                 2. By lines per file\n\
                 Enter 1 or 2: ",
            )
            .map_err(SplitError::Prompt)?;

        let (parts, lines) = match choice.as_str() {
            "1" => {
                let n = self
                    .ask_positive("Enter the number of parts: ")
                    .map_err(SplitError::Prompt)?;
                (Some(n), None)
            }
            "2" => {
                let n = self
                    .ask_positive("Enter the number of lines per file: ")
                    .map_err(SplitError::Prompt)?;
                (None, Some(n))
            }
            other => {
                return Err(SplitError::invalid_mode(format!(
                    "invalid choice '{other}', expected 1 or 2"
                )));
            }
        };

        let output_dir = self.ask_output_dir().map_err(SplitError::Prompt)?;
        SplitRequest::new(input, parts, lines, output_dir)
    }
}

impl<R: BufRead, W: Write> ConfirmOverwrite for Prompter<R, W> {
    fn confirm_overwrite(&mut self, existing: &Path) -> io::Result<bool> {
        let name = existing
            .file_name()
            .map_or_else(|| existing.display().to_string(), |n| n.to_string_lossy().into_owned());
        let answer = self.ask(&format!(
            "Output file {name} already exists. Overwrite all? (y/n): "
        ))?;
        Ok(is_affirmative(&answer))
    }
}
