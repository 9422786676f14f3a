//! Line-oriented shell over the organizer core.

pub mod commands;
pub mod context;
pub mod io;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
