//! Command line interface for uvd

pub mod args;
pub mod output;
pub mod prompt;

pub use args::Args;
pub use output::OutputFormatter;
pub use prompt::{Prompter, StdinPrompter};
