//! CLI module for tabstore
//!
//! Provides command-line interface for:
//! - show / find: read-only views of the loaded table
//! - sort: reorder and save
//! - stats: summaries, frequency tables and cohort comparison
//! - add / update / delete: one edit, then save

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, GlobalArgs};
pub use commands::{execute, run, run_command};
pub use config::{Config, Dataset};
pub use errors::{CliError, CliResult};
pub use io::{record_to_json, records_to_json, write_error, write_response};
