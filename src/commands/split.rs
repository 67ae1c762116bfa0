/// `split` command: non-interactive split driven entirely by arguments.
use std::io::IsTerminal;

use crate::cli::OutputCtx;
use crate::cli::args::SplitArgs;
use crate::cli::output::{PartPrinter, write_plan, write_summary};
use crate::cli::prompt::Prompter;
use crate::split::{
    ConfirmOverwrite, FixedAnswer, SplitError, SplitOptions, SplitRequest, Splitter,
};
use crate::types::{PlanOutput, SummaryOutput};

/// Run `linesplit split`.
///
/// Existing part files are overwritten with `--yes`. Without it the user is asked
/// on the terminal, and a run without a terminal aborts instead.
///
/// # Errors
///
/// Returns `SplitError` on invalid input, a declined overwrite, or I/O failure.
pub fn run(args: &SplitArgs, ctx: &OutputCtx) -> Result<(), SplitError> {
    let request = SplitRequest::new(
        &args.input,
        args.parts,
        args.lines,
        args.output_dir.clone(),
    )?;
    let splitter = Splitter::with_options(SplitOptions {
        progress_interval: args.progress_every,
        ..SplitOptions::default()
    });

    let _t_plan = ctx.timer("plan");
    let plan = splitter.plan(&request)?;
    drop(_t_plan);

    if args.dry_run {
        write_plan(&PlanOutput::from(&plan), ctx);
        return Ok(());
    }

    let mut confirm = confirmation(args.yes);
    let mut printer = PartPrinter::new(ctx);

    let _t_write = ctx.timer("write_parts");
    let summary = splitter.execute(&plan, confirm.as_mut(), &mut printer)?;
    drop(_t_write);

    write_summary(&SummaryOutput::from(&summary), ctx);
    Ok(())
}

fn confirmation(yes: bool) -> Box<dyn ConfirmOverwrite> {
    if yes {
        return Box::new(FixedAnswer(true));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        // Prompt on stderr so stdout stays clean for results.
        Box::new(Prompter::new(stdin.lock(), std::io::stderr()))
    } else {
        tracing::debug!("stdin is not a terminal; existing parts will not be overwritten");
        Box::new(FixedAnswer(false))
    }
}
