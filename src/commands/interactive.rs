/// `interactive` command: prompt for every parameter, then split.
use std::io::{IsTerminal, Write};

use crate::cli::OutputCtx;
use crate::cli::args::{InteractiveArgs, OutputFormat};
use crate::cli::output::{PartPrinter, write_summary};
use crate::cli::prompt::{Prompter, write_banner};
use crate::split::{SplitError, Splitter};
use crate::types::SummaryOutput;

/// Whether the dialogue must stay off stdout.
///
/// Only the table format shares stdout with the prompts; every other format
/// writes machine-readable results there.
fn dialogue_on_stderr(ctx: &OutputCtx) -> bool {
    ctx.format != OutputFormat::Table
}

/// Run `linesplit interactive`.
///
/// The same dialogue answers the overwrite question if planned parts already exist.
///
/// # Errors
///
/// Returns `SplitError` on an invalid choice, closed input, a declined overwrite,
/// or I/O failure.
pub fn run(args: &InteractiveArgs, ctx: &OutputCtx) -> Result<(), SplitError> {
    let (output, color): (Box<dyn Write>, bool) = if dialogue_on_stderr(ctx) {
        let stderr = std::io::stderr();
        let color = stderr.is_terminal();
        (Box::new(stderr), color)
    } else {
        let stdout = std::io::stdout();
        let color = stdout.is_terminal();
        (Box::new(stdout), color)
    };
    let mut prompter = Prompter::new(std::io::stdin().lock(), output);

    if !args.no_banner {
        write_banner(prompter.output(), color).map_err(SplitError::Prompt)?;
    }

    let request = prompter.ask_request()?;

    let mut printer = PartPrinter::new(ctx);
    let _t_split = ctx.timer("split");
    let summary = Splitter::new().split(&request, &mut prompter, &mut printer)?;
    drop(_t_split);

    write_summary(&SummaryOutput::from(&summary), ctx);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(format: OutputFormat) -> OutputCtx {
        OutputCtx::new(format, false, false, false)
    }

    #[test]
    fn test_dialogue_leaves_stdout_to_results() {
        assert!(dialogue_on_stderr(&ctx(OutputFormat::Json)));
        assert!(dialogue_on_stderr(&ctx(OutputFormat::Compact)));
        assert!(dialogue_on_stderr(&ctx(OutputFormat::Path)));
        assert!(!dialogue_on_stderr(&ctx(OutputFormat::Table)));
    }

    #[test]
    fn test_json_flag_moves_dialogue_off_stdout() {
        let ctx = OutputCtx::new(OutputFormat::Table, true, false, false);
        assert!(dialogue_on_stderr(&ctx));
    }
}
