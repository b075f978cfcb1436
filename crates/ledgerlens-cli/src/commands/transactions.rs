//! Transaction command implementations

use anyhow::Result;
use ledgerlens_core::models::{Transaction, TransactionType};
use ledgerlens_core::{Database, LedgerService, ListQuery, TransactionInput};

use super::truncate;

/// Filters for `transactions list`, as typed on the command line
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub limit: i64,
    pub offset: Option<i64>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Fields for `transactions add`
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub date: Option<String>,
}

fn format_amount(tx: &Transaction) -> String {
    // Red for expenses, green for income
    match tx.kind {
        TransactionType::Expense => format!("\x1b[31m-${:.2}\x1b[0m", tx.amount),
        TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount),
    }
}

fn print_row(tx: &Transaction) {
    println!(
        "   {} │ {:>10} │ {:<20} │ {}",
        tx.date,
        format_amount(tx),
        truncate(&tx.category, 20),
        truncate(tx.note.as_deref().unwrap_or(""), 30)
    );
}

pub fn cmd_transactions_list(
    service: &LedgerService<Database>,
    owner: &str,
    args: &ListArgs,
) -> Result<Vec<Transaction>> {
    // Same parsing path as the HTTP query string
    let query = ListQuery {
        kind: args.kind.clone(),
        category: args.category.clone(),
        start_date: args.from.clone(),
        end_date: args.to.clone(),
        limit: Some(args.limit.to_string()),
        offset: args.offset.map(|o| o.to_string()),
    };
    let transactions = service.list(owner, &query.parse()?)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  ledgerlens transactions add --type expense --category Food --amount 12.50");
        return Ok(transactions);
    }

    println!();
    println!("📝 Transactions ({})", owner);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        print_row(tx);
        println!("     id: {}", tx.id);
    }

    Ok(transactions)
}

pub fn cmd_transactions_add(
    service: &LedgerService<Database>,
    owner: &str,
    args: &AddArgs,
) -> Result<Transaction> {
    let input = TransactionInput {
        kind: Some(args.kind.clone()),
        category: Some(args.category.clone()),
        amount: Some(args.amount),
        note: args.note.clone(),
        date: args.date.clone(),
    };
    let tx = service.create(owner, &input)?;

    println!("✅ Recorded transaction {}:", tx.id);
    print_row(&tx);

    Ok(tx)
}

pub fn cmd_transactions_delete(
    service: &LedgerService<Database>,
    owner: &str,
    id: &str,
) -> Result<()> {
    // Show what is about to go; also surfaces NotFound before the delete
    let tx = service.get(owner, id)?;
    service.delete(owner, id)?;

    println!("🗑️  Deleted transaction {}:", id);
    print_row(&tx);

    Ok(())
}
