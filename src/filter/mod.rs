mod directive;
mod matcher;

pub use directive::{Directive, Pattern, DEFAULT_LINUX_ALIASES, DEFAULT_MARKER};
pub use matcher::{evaluate, Decision, FilterReport, PatternOutcome};
