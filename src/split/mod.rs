/// Splitting core: planning, validation and the streaming write pass.
pub mod errors;
pub mod plan;
pub mod splitter;

pub use errors::SplitError;
pub use plan::{OutputPlan, SplitRequest};
pub use splitter::{
    ConfirmOverwrite, FixedAnswer, PartReport, SplitObserver, SplitOptions, Splitter, Summary,
};
