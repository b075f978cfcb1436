//! Transaction operations
//!
//! Each operation is one SQL statement carrying both the id and the owner
//! predicate, so a concurrent writer can never observe a half-applied change.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::transaction_filter::TransactionFilter;
use super::Database;
use crate::error::{Error, Result};
use crate::ledger::LedgerStore;
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};

const COLUMNS: &str = "id, user_id, type, category, amount, note, date, created_at";

fn conversion_error(
    column: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, err.into())
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(2)?;
    let date_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        kind: kind_str
            .parse::<TransactionType>()
            .map_err(|e| conversion_error(2, e))?,
        category: row.get(3)?,
        amount: row.get(4)?,
        note: row.get(5)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| conversion_error(6, e))?,
        // SQLite CURRENT_TIMESTAMP is UTC
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| conversion_error(7, e))?
            .and_utc(),
    })
}

impl LedgerStore for Database {
    fn insert(&self, owner_id: &str, tx: &NewTransaction) -> Result<Transaction> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();

        let sql = format!(
            "INSERT INTO transactions (id, user_id, type, category, amount, note, date) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let stored = conn.query_row(
            &sql,
            params![
                id,
                owner_id,
                tx.kind.as_str(),
                tx.category,
                tx.amount,
                tx.note,
                tx.date.to_string(),
            ],
            row_to_transaction,
        )?;

        debug!(id = %stored.id, "Inserted transaction");
        Ok(stored)
    }

    fn select_by_owner(&self, filter: &TransactionFilter<'_>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let built = filter.build();
        let sql = built.build_select_query(COLUMNS);

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(built.params_refs().as_slice(), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn select_one(&self, id: &str, owner_id: &str) -> Result<Transaction> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
            COLUMNS
        );

        conn.query_row(&sql, params![id, owner_id], row_to_transaction)
            .optional()?
            .ok_or_else(Error::transaction_not_found)
    }

    fn update(&self, id: &str, owner_id: &str, patch: &TransactionPatch) -> Result<Transaction> {
        if patch.is_empty() {
            return self.select_one(id, owner_id);
        }

        let mut assignments = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(kind) = patch.kind {
            assignments.push("type = ?");
            values.push(Box::new(kind.as_str()));
        }
        if let Some(category) = &patch.category {
            assignments.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(amount) = patch.amount {
            assignments.push("amount = ?");
            values.push(Box::new(amount));
        }
        if let Some(note) = &patch.note {
            assignments.push("note = ?");
            values.push(Box::new(note.clone()));
        }
        if let Some(date) = patch.date {
            assignments.push("date = ?");
            values.push(Box::new(date.to_string()));
        }

        values.push(Box::new(id.to_string()));
        values.push(Box::new(owner_id.to_string()));

        let sql = format!(
            "UPDATE transactions SET {} WHERE id = ? AND user_id = ? RETURNING {}",
            assignments.join(", "),
            COLUMNS
        );
        let refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

        let conn = self.conn()?;
        conn.query_row(&sql, refs.as_slice(), row_to_transaction)
            .optional()?
            .ok_or_else(Error::transaction_not_found)
    }

    fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, owner_id],
        )?;

        if removed == 0 {
            return Err(Error::transaction_not_found());
        }
        debug!(id, "Deleted transaction");
        Ok(())
    }
}
