//! Command line interface: `clean`, `query`, `options`, `estimate` and
//! `features` over the library.

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Command, InsightsArgs, OutputFormat};
pub use commands::execute_command;
