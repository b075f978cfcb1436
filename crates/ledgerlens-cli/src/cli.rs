//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Owner used by local commands unless `--owner` is given (matches `serve --no-auth`)
pub const DEFAULT_OWNER: &str = "local-dev";

/// LedgerLens - Per-owner income and expense analytics
#[derive(Parser)]
#[command(name = "ledgerlens")]
#[command(about = "Self-hosted spending ledger with window-based analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "ledgerlens.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set LEDGERLENS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Every request is attributed to the owner "local-dev".
        #[arg(long)]
        no_auth: bool,
    },

    /// Manage transactions (list, add, delete)
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Spending reports over a time window
    Report {
        #[command(subcommand)]
        report: ReportType,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Owner whose ledger to read
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Number of transactions to skip
        #[arg(long)]
        offset: Option<i64>,

        /// Only this type: income or expense
        #[arg(long = "type")]
        kind: Option<String>,

        /// Only this category (exact match)
        #[arg(long)]
        category: Option<String>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Record a transaction
    Add {
        /// Owner of the new record
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// income or expense
        #[arg(long = "type")]
        kind: String,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Positive amount
        #[arg(short, long)]
        amount: f64,

        /// Optional free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Permanently delete a transaction
    Delete {
        /// Owner of the record
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Transaction ID
        id: String,
    },
}

/// Time window flags shared by all reports
///
/// Precedence: --from/--to pair, then --days, --weeks, --months, --years,
/// then --period. Nothing means the last 30 days.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Look back this many days
    #[arg(long)]
    pub days: Option<u32>,

    /// Look back this many weeks
    #[arg(long)]
    pub weeks: Option<u32>,

    /// Look back this many calendar months
    #[arg(long)]
    pub months: Option<u32>,

    /// Look back this many calendar years
    #[arg(long)]
    pub years: Option<u32>,

    /// Named period: day, week, month, year
    #[arg(long)]
    pub period: Option<String>,

    /// Explicit start date (YYYY-MM-DD), used together with --to
    #[arg(long)]
    pub from: Option<String>,

    /// Explicit end date (YYYY-MM-DD), used together with --from
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income, expense and net totals
    Summary {
        #[command(flatten)]
        window: WindowArgs,

        /// Owner whose ledger to analyze
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Totals, top categories, daily trend and recent activity
    Spending {
        #[command(flatten)]
        window: WindowArgs,

        /// Owner whose ledger to analyze
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Every expense category, largest first
    Categories {
        #[command(flatten)]
        window: WindowArgs,

        /// Owner whose ledger to analyze
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
