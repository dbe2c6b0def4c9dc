//! CLI command implementations
//!
//! Each invocation resolves one [`LibraryConfig`], opens the [`Library`]
//! over it, runs a single operation and prints one JSON response. Errors
//! are printed as a JSON error response and returned so the binary exits
//! non-zero.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::LibraryConfig;
use crate::ledger::{
    BookFilter, BookUpdate, LedgerError, Library, MemberFilter, MemberUpdate, StatusFilter,
};
use crate::observability::{log_event_with_fields, Event};

use super::args::{BookAction, Cli, Command, Listing, LoanAction, MemberAction, DEFAULT_DATA_DIR};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response, write_text};

/// What a command prints on success
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
}

/// Parse arguments and run
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_cli(&cli)
}

/// Run parsed arguments and print the response
pub fn run_cli(cli: &Cli) -> CliResult<()> {
    match execute(cli) {
        Ok(Output::Json(data)) => write_response(data),
        Ok(Output::Text(text)) => write_text(&text),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run parsed arguments and return the response without printing it
pub fn execute(cli: &Cli) -> CliResult<Output> {
    let config = resolve_config(cli.data_dir.as_deref(), cli.config.as_deref())?;

    match &cli.command {
        Command::Init => init(config).map(Output::Json),
        command => {
            let library = open_library(config)?;
            dispatch(&library, command)
        }
    }
}

fn dispatch(library: &Library, command: &Command) -> CliResult<Output> {
    match command {
        Command::Init => Err(CliError::already_initialized()),
        Command::Book { action } => book(library, action).map(Output::Json),
        Command::Member { action } => member(library, action).map(Output::Json),
        Command::Borrow { book, member } => to_json(&library.borrow(*book, *member)?),
        Command::Return { loan } => to_json(&library.return_loan(*loan)?),
        Command::Loan { action } => loan(library, action).map(Output::Json),
        Command::Report { text } => report(library, *text),
        Command::Reconcile { dry_run } => to_json(&library.reconcile(*dry_run)?),
    }
}

/// Builds the configuration from `--config` and `--data-dir`.
///
/// `--data-dir` wins over the file's `data_dir`; with neither flag the
/// default directory and file names are used.
pub fn resolve_config(data_dir: Option<&Path>, config: Option<&Path>) -> CliResult<LibraryConfig> {
    let mut resolved = match config {
        Some(path) => {
            let loaded = LibraryConfig::load(path)?;
            log_event_with_fields(
                Event::ConfigLoaded,
                &[("path", &path.display().to_string())],
            );
            loaded
        }
        None => LibraryConfig::with_data_dir(DEFAULT_DATA_DIR),
    };

    if let Some(dir) = data_dir {
        resolved.data_dir = dir.to_path_buf();
    }
    resolved.validate()?;
    Ok(resolved)
}

/// Creates the data directory and the three empty data files.
pub fn init(config: LibraryConfig) -> CliResult<Value> {
    if is_initialized(&config) {
        return Err(CliError::already_initialized());
    }

    let library = Library::open(config)?;
    let config = library.config();
    Ok(json!({
        "data_dir": config.data_dir.display().to_string(),
        "books": config.books_path().display().to_string(),
        "members": config.members_path().display().to_string(),
        "loans": config.loans_path().display().to_string(),
    }))
}

fn open_library(config: LibraryConfig) -> CliResult<Library> {
    if !is_initialized(&config) {
        return Err(CliError::not_initialized());
    }
    Ok(Library::open(config)?)
}

fn is_initialized(config: &LibraryConfig) -> bool {
    config.books_path().exists() && config.members_path().exists() && config.loans_path().exists()
}

fn book(library: &Library, action: &BookAction) -> CliResult<Value> {
    match action {
        BookAction::Add {
            title,
            author,
            year,
            total,
        } => value(&library.add_book(title, author, *year, *total)?),
        BookAction::Update {
            id,
            title,
            author,
            year,
            total,
        } => {
            let changes = BookUpdate {
                title: title.clone(),
                author: author.clone(),
                year: *year,
                total: *total,
            };
            value(&library.update_book(*id, changes)?)
        }
        BookAction::Delete { id } => value(&library.delete_book(*id)?),
        BookAction::List {
            listing,
            title,
            author,
            year,
        } => {
            let filter = BookFilter {
                title: title.clone(),
                author: author.clone(),
                year: *year,
                status: status_for(listing)?,
            };
            value(&library.search_books(&filter)?)
        }
        BookAction::Show { id } => value(&library.book(*id)?),
    }
}

fn member(library: &Library, action: &MemberAction) -> CliResult<Value> {
    match action {
        MemberAction::Add {
            name,
            phone,
            address,
        } => value(&library.add_member(name, phone, address)?),
        MemberAction::Update {
            id,
            name,
            phone,
            address,
        } => {
            let changes = MemberUpdate {
                name: name.clone(),
                phone: phone.clone(),
                address: address.clone(),
            };
            value(&library.update_member(*id, changes)?)
        }
        MemberAction::Delete { id } => value(&library.delete_member(*id)?),
        MemberAction::List {
            listing,
            name,
            phone,
            address,
        } => {
            let filter = MemberFilter {
                name: name.clone(),
                phone: phone.clone(),
                address: address.clone(),
                status: status_for(listing)?,
            };
            value(&library.search_members(&filter)?)
        }
        MemberAction::Show { id } => value(&library.member(*id)?),
    }
}

fn loan(library: &Library, action: &LoanAction) -> CliResult<Value> {
    match action {
        LoanAction::List { open, member, book } => {
            let mut loans = match (member, book) {
                (Some(m), _) => library.loans_by_member(*m)?,
                (None, Some(b)) => library.loans_by_book(*b)?,
                (None, None) => library.list_loans()?,
            };
            if *open {
                loans.retain(|l| l.is_open());
            }
            value(&loans)
        }
        LoanAction::Show { id } => value(&library.loan(*id)?),
    }
}

fn report(library: &Library, as_text: bool) -> CliResult<Output> {
    let text = library.write_report()?;
    if as_text {
        return Ok(Output::Text(text));
    }

    let report = library.report()?;
    Ok(Output::Json(json!({
        "path": library.config().report_path().display().to_string(),
        "history": report.history,
        "summary": report.summary,
        "stats": report.stats,
    })))
}

/// `--status` wins; otherwise `--all` widens the default active-only view.
fn status_for(listing: &Listing) -> CliResult<StatusFilter> {
    match &listing.status {
        Some(s) => s
            .parse()
            .map_err(|e: LedgerError| CliError::invalid_argument(e.to_string())),
        None if listing.all => Ok(StatusFilter::Any),
        None => Ok(StatusFilter::Active),
    }
}

fn value<T: Serialize>(data: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(data)?)
}

fn to_json<T: Serialize>(data: &T) -> CliResult<Output> {
    value(data).map(Output::Json)
}
