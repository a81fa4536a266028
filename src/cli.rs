//! Command-line front end: argument parsing and one handler per command.

pub mod commands;
pub mod parser;

pub use parser::{Cli, Commands};
