//! CLI module for shelfdb
//!
//! One operation per invocation:
//! - init: create the data directory and empty data files
//! - book / member: add, update, soft-delete, list, show
//! - borrow / return: the loan state machine
//! - loan: inspect loans
//! - report: write the text report
//! - reconcile: repair availability counters from open loans

mod args;
mod commands;
mod errors;
mod io;

pub use args::{BookAction, Cli, Command, Listing, LoanAction, MemberAction, DEFAULT_DATA_DIR};
pub use commands::{execute, init, resolve_config, run, run_cli, Output};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response, write_text};
