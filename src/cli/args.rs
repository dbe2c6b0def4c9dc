//! CLI argument definitions using clap
//!
//! Commands:
//! - shelfdb init
//! - shelfdb book add|update|delete|list|show
//! - shelfdb member add|update|delete|list|show
//! - shelfdb borrow --book <id> --member <id>
//! - shelfdb return --loan <id>
//! - shelfdb loan list|show
//! - shelfdb report
//! - shelfdb reconcile [--dry-run]
//!
//! `--data-dir` and `--config` are accepted before or after the subcommand.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default data directory when neither flag is given
pub const DEFAULT_DATA_DIR: &str = "./data";

/// shelfdb - single-operator library circulation over fixed-record files
#[derive(Parser, Debug)]
#[command(name = "shelfdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data directory (overrides the config file's data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and empty data files
    Init,

    /// Manage books
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Manage members
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Lend one copy of a book to a member
    Borrow {
        #[arg(long)]
        book: u32,
        #[arg(long)]
        member: u32,
    },

    /// Close an open loan
    Return {
        #[arg(long)]
        loan: u32,
    },

    /// Inspect loans
    Loan {
        #[command(subcommand)]
        action: LoanAction,
    },

    /// Write the text report into the data directory
    Report {
        /// Print the rendered text instead of a JSON response
        #[arg(long)]
        text: bool,
    },

    /// Recompute book availability from open loans
    Reconcile {
        /// Report mismatches without rewriting any book
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookAction {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long)]
        year: u16,
        #[arg(long)]
        total: u16,
    },

    /// Change fields; omitted fields keep their value
    Update {
        id: u32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        total: Option<u16>,
    },

    /// Soft-delete; refused while copies are on loan
    Delete { id: u32 },

    List {
        #[command(flatten)]
        listing: Listing,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<u16>,
    },

    Show { id: u32 },
}

#[derive(Subcommand, Debug)]
pub enum MemberAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },

    /// Change fields; omitted fields keep their value
    Update {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Soft-delete; refused while the member has open loans
    Delete { id: u32 },

    List {
        #[command(flatten)]
        listing: Listing,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    Show { id: u32 },
}

#[derive(Subcommand, Debug)]
pub enum LoanAction {
    List {
        /// Only loans not yet returned
        #[arg(long)]
        open: bool,
        #[arg(long, conflicts_with = "book")]
        member: Option<u32>,
        #[arg(long)]
        book: Option<u32>,
    },

    Show { id: u32 },
}

/// Soft-delete visibility shared by book and member listings
#[derive(Args, Debug)]
pub struct Listing {
    /// Include soft-deleted records
    #[arg(long)]
    pub all: bool,

    /// active, deleted or any (overrides --all)
    #[arg(long)]
    pub status: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
