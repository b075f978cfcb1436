//! LedgerLens CLI - Per-owner spending ledger and analytics
//!
//! Usage:
//!   ledgerlens init                           Initialize database
//!   ledgerlens transactions add --type expense --category Food --amount 12.50
//!   ledgerlens report summary --months 1      Totals for the last month
//!   ledgerlens serve --port 3000              Start the REST API

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
        Commands::Transactions { action } => {
            let service = commands::open_service(&cli.db, cli.no_encrypt)?;
            match action {
                TransactionsAction::List {
                    owner,
                    limit,
                    offset,
                    kind,
                    category,
                    from,
                    to,
                } => {
                    let args = commands::ListArgs {
                        limit,
                        offset,
                        kind,
                        category,
                        from,
                        to,
                    };
                    commands::cmd_transactions_list(&service, &owner, &args).map(|_| ())
                }
                TransactionsAction::Add {
                    owner,
                    kind,
                    category,
                    amount,
                    note,
                    date,
                } => {
                    let args = commands::AddArgs {
                        kind,
                        category,
                        amount,
                        note,
                        date,
                    };
                    commands::cmd_transactions_add(&service, &owner, &args).map(|_| ())
                }
                TransactionsAction::Delete { owner, id } => {
                    commands::cmd_transactions_delete(&service, &owner, &id)
                }
            }
        }
        Commands::Report { report } => {
            let service = commands::open_service(&cli.db, cli.no_encrypt)?;
            match report {
                ReportType::Summary {
                    window,
                    owner,
                    json,
                } => commands::cmd_report_summary(&service, &owner, &window, json).map(|_| ()),
                ReportType::Spending {
                    window,
                    owner,
                    json,
                } => commands::cmd_report_spending(&service, &owner, &window, json).map(|_| ()),
                ReportType::Categories {
                    window,
                    owner,
                    category,
                    json,
                } => commands::cmd_report_categories(
                    &service,
                    &owner,
                    &window,
                    category.as_deref(),
                    json,
                )
                .map(|_| ()),
            }
        }
    }
}
