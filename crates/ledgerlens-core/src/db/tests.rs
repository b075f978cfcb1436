//! Database tests

use super::*;
use crate::ledger::LedgerStore;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_tx(kind: TransactionType, category: &str, amount: f64, day: &str) -> NewTransaction {
        NewTransaction {
            kind,
            category: category.to_string(),
            amount,
            note: None,
            date: date(day),
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let rows = db
            .select_by_owner(&TransactionFilter::for_owner("nobody"))
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_transactions_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'type', 'category', 'amount', 'note', 'date', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 8, "transactions table should have 8 expected columns");
    }

    #[test]
    fn test_schema_rejects_non_positive_amount() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result = conn.execute(
            "INSERT INTO transactions (id, user_id, type, category, amount, date) VALUES ('x', 'alice', 'expense', 'Food', 0, '2024-05-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_assigns_id_and_timestamp() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .insert("alice", &new_tx(TransactionType::Expense, "Food", 30.0, "2024-05-01"))
            .unwrap();

        assert!(!stored.id.is_empty());
        assert_eq!(stored.owner_id, "alice");
        assert_eq!(stored.kind, TransactionType::Expense);
        assert_eq!(stored.amount, 30.0);
        assert_eq!(stored.date, date("2024-05-01"));

        let read = db.select_one(&stored.id, "alice").unwrap();
        assert_eq!(read, stored);
    }

    #[test]
    fn test_select_one_other_owner_is_not_found() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .insert("alice", &new_tx(TransactionType::Income, "Salary", 1000.0, "2024-05-01"))
            .unwrap();

        assert!(matches!(
            db.select_one(&stored.id, "bob"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.select_one("missing-id", "alice"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_select_by_owner_orders_and_filters() {
        let db = Database::in_memory().unwrap();
        db.insert("alice", &new_tx(TransactionType::Expense, "Food", 30.0, "2024-05-01"))
            .unwrap();
        db.insert("alice", &new_tx(TransactionType::Expense, "Rent", 800.0, "2024-05-03"))
            .unwrap();
        db.insert("alice", &new_tx(TransactionType::Income, "Salary", 1000.0, "2024-05-02"))
            .unwrap();
        db.insert("bob", &new_tx(TransactionType::Expense, "Food", 5.0, "2024-05-02"))
            .unwrap();

        let all = db
            .select_by_owner(&TransactionFilter::for_owner("alice"))
            .unwrap();
        let dates: Vec<String> = all.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-05-03", "2024-05-02", "2024-05-01"]);
        assert!(all.iter().all(|t| t.owner_id == "alice"));

        let expenses = db
            .select_by_owner(
                &TransactionFilter::for_owner("alice").kind(Some(TransactionType::Expense)),
            )
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let food = db
            .select_by_owner(&TransactionFilter::for_owner("alice").category(Some("Food")))
            .unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].amount, 30.0);

        let ranged = db
            .select_by_owner(
                &TransactionFilter::for_owner("alice")
                    .start_date(Some("2024-05-02"))
                    .end_date(Some("2024-05-02")),
            )
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].category, "Salary");
    }

    #[test]
    fn test_pagination() {
        let db = Database::in_memory().unwrap();
        for day in 1..=15 {
            db.insert(
                "alice",
                &new_tx(
                    TransactionType::Expense,
                    "Food",
                    day as f64,
                    &format!("2024-05-{:02}", day),
                ),
            )
            .unwrap();
        }

        let first = db
            .select_by_owner(&TransactionFilter::for_owner("alice").limit(Some(4)))
            .unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first[0].date, date("2024-05-15"));

        let page = db
            .select_by_owner(
                &TransactionFilter::for_owner("alice")
                    .limit(Some(4))
                    .offset(Some(4)),
            )
            .unwrap();
        assert_eq!(page.len(), 4);
        assert_eq!(page[0].date, date("2024-05-11"));

        // Offset alone falls back to the default page size
        let default_page = db
            .select_by_owner(&TransactionFilter::for_owner("alice").offset(Some(2)))
            .unwrap();
        assert_eq!(default_page.len(), DEFAULT_PAGE_SIZE as usize);
        assert_eq!(default_page[0].date, date("2024-05-13"));
    }

    #[test]
    fn test_update_writes_only_patched_fields() {
        let db = Database::in_memory().unwrap();
        let mut input = new_tx(TransactionType::Expense, "Food", 30.0, "2024-05-01");
        input.note = Some("lunch".to_string());
        let stored = db.insert("alice", &input).unwrap();

        let patch = TransactionPatch {
            amount: Some(42.0),
            ..Default::default()
        };
        let updated = db.update(&stored.id, "alice", &patch).unwrap();
        assert_eq!(updated.amount, 42.0);
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.note.as_deref(), Some("lunch"));
        assert_eq!(updated.created_at, stored.created_at);

        let clear_note = TransactionPatch {
            note: Some(None),
            ..Default::default()
        };
        let updated = db.update(&stored.id, "alice", &clear_note).unwrap();
        assert_eq!(updated.note, None);
    }

    #[test]
    fn test_update_other_owner_is_not_found() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .insert("alice", &new_tx(TransactionType::Expense, "Food", 30.0, "2024-05-01"))
            .unwrap();

        let patch = TransactionPatch {
            amount: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            db.update(&stored.id, "bob", &patch),
            Err(Error::NotFound(_))
        ));
        // Untouched for the real owner
        assert_eq!(db.select_one(&stored.id, "alice").unwrap().amount, 30.0);
    }

    #[test]
    fn test_delete_then_delete_again() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .insert("alice", &new_tx(TransactionType::Expense, "Food", 30.0, "2024-05-01"))
            .unwrap();

        assert!(matches!(
            db.delete(&stored.id, "bob"),
            Err(Error::NotFound(_))
        ));
        db.delete(&stored.id, "alice").unwrap();
        assert!(matches!(
            db.select_one(&stored.id, "alice"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.delete(&stored.id, "alice"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_fetch_by_owner_and_window() {
        let db = Database::in_memory().unwrap();
        db.insert("alice", &new_tx(TransactionType::Expense, "Food", 30.0, "2024-04-01"))
            .unwrap();
        db.insert("alice", &new_tx(TransactionType::Expense, "Food", 20.0, "2024-05-02"))
            .unwrap();
        db.insert("alice", &new_tx(TransactionType::Income, "Salary", 1000.0, "2024-05-15"))
            .unwrap();

        let window = TimeWindow {
            start_date: "2024-04-15".to_string(),
            end_date: "2024-05-15".to_string(),
        };
        let rows = db
            .fetch_by_owner_and_window("alice", &window, None, None)
            .unwrap();
        assert_eq!(rows.len(), 2);

        let expenses = db
            .fetch_by_owner_and_window("alice", &window, Some(TransactionType::Expense), None)
            .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 20.0);

        let none = db
            .fetch_by_owner_and_window("bob", &window, None, None)
            .unwrap();
        assert!(none.is_empty());
    }
}
