//! Aggregations over an already window-filtered record set
//!
//! Everything here is pure and accepts an empty slice. Inputs are expected
//! in the order the ledger returns them (date descending).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{CategoryBucket, DailyTrendPoint, Totals, Transaction, TransactionType};

/// Number of categories kept by the full analysis
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// Number of records kept in the recent activity list
pub const RECENT_TRANSACTION_LIMIT: usize = 10;

/// Sum income and expenses
pub fn totals(records: &[Transaction]) -> Totals {
    let mut total_expenses = 0.0;
    let mut total_income = 0.0;

    for tx in records {
        match tx.kind {
            TransactionType::Expense => total_expenses += tx.amount,
            TransactionType::Income => total_income += tx.amount,
        }
    }

    Totals {
        total_expenses,
        total_income,
        net: total_income - total_expenses,
        count: records.len(),
    }
}

/// Group records by exact category string
///
/// Buckets come out in first-seen order. Percentages are relative to the
/// sum of every record passed in, and are all zero when that sum is zero.
pub fn category_breakdown(records: &[Transaction]) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grand_total = 0.0;

    for tx in records {
        grand_total += tx.amount;
        let slot = *index.entry(tx.category.as_str()).or_insert_with(|| {
            buckets.push(CategoryBucket {
                category: tx.category.clone(),
                total: 0.0,
                count: 0,
                percentage: 0.0,
                transactions: Vec::new(),
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.total += tx.amount;
        bucket.count += 1;
        bucket.transactions.push(tx.clone());
    }

    for bucket in &mut buckets {
        bucket.percentage = if grand_total > 0.0 {
            (bucket.total / grand_total) * 100.0
        } else {
            0.0
        };
        // Stable, so equal dates keep ledger order
        bucket.transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }

    buckets
}

/// Order buckets by total, largest first. Ties keep their incoming order.
pub fn rank_by_total(mut buckets: Vec<CategoryBucket>) -> Vec<CategoryBucket> {
    buckets.sort_by(|a, b| b.total.total_cmp(&a.total));
    buckets
}

/// The `n` largest buckets by total
pub fn top_categories(buckets: Vec<CategoryBucket>, n: usize) -> Vec<CategoryBucket> {
    let mut ranked = rank_by_total(buckets);
    ranked.truncate(n);
    ranked
}

/// Per-date expense and income sums, oldest date first
pub fn daily_trend(records: &[Transaction]) -> Vec<DailyTrendPoint> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for tx in records {
        let (expenses, income) = days.entry(tx.date).or_insert((0.0, 0.0));
        match tx.kind {
            TransactionType::Expense => *expenses += tx.amount,
            TransactionType::Income => *income += tx.amount,
        }
    }

    days.into_iter()
        .map(|(date, (expenses, income))| DailyTrendPoint {
            date,
            expenses,
            income,
        })
        .collect()
}

/// First `n` records, in the order given
pub fn recent_transactions(records: &[Transaction], n: usize) -> Vec<Transaction> {
    records.iter().take(n).cloned().collect()
}

/// Only the records of one type, order preserved
pub fn of_type(records: &[Transaction], kind: TransactionType) -> Vec<Transaction> {
    records
        .iter()
        .filter(|tx| tx.kind == kind)
        .cloned()
        .collect()
}
