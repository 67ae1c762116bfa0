/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod interactive;
pub mod split;

use crate::cli::OutputCtx;
use crate::cli::args::Command;
use crate::split::SplitError;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `SplitError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx) -> Result<(), SplitError> {
    match command {
        Command::Split(args) => split::run(args, ctx),
        Command::Interactive(args) => interactive::run(args, ctx),
    }
}
