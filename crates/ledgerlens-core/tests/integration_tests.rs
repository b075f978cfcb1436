//! Integration tests for ledgerlens-core
//!
//! These tests drive the public API the way the server and CLI do:
//! raw input → validation → storage → window resolution → analytics.

use std::sync::Arc;

use chrono::NaiveDate;
use ledgerlens_core::{
    Database, Error, FixedClock, LedgerService, ListQuery, TransactionInput,
    TransactionPatchInput, WindowQuery,
};

fn service_at(today: &str) -> LedgerService<Database> {
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap();
    LedgerService::with_clock(
        Database::in_memory().expect("Failed to create test database"),
        Arc::new(FixedClock(today)),
    )
}

fn input(json: &str) -> TransactionInput {
    serde_json::from_str(json).expect("valid input json")
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_create_read_isolated_per_owner() {
    let svc = service_at("2024-05-15");

    let created = svc
        .create(
            "alice",
            &input(r#"{"type":"expense","category":" Food ","amount":30,"note":"  "}"#),
        )
        .unwrap();
    assert_eq!(created.category, "Food");
    assert_eq!(created.note, None);
    assert_eq!(created.date.to_string(), "2024-05-15");

    assert_eq!(svc.get("alice", &created.id).unwrap(), created);
    assert!(matches!(
        svc.get("mallory", &created.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_patch_from_json() {
    let svc = service_at("2024-05-15");
    let created = svc
        .create(
            "alice",
            &input(r#"{"type":"expense","category":"Food","amount":30,"note":"lunch","date":"2024-05-01"}"#),
        )
        .unwrap();

    let patch: TransactionPatchInput =
        serde_json::from_str(r#"{"type":"income","note":null}"#).unwrap();
    let updated = svc.update("alice", &created.id, &patch).unwrap();
    assert_eq!(updated.kind.as_str(), "income");
    assert_eq!(updated.note, None);
    assert_eq!(updated.amount, 30.0);
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner_id, "alice");
}

#[test]
fn test_list_from_query_strings() {
    let svc = service_at("2024-05-15");
    for day in 1..=12 {
        svc.create(
            "alice",
            &input(&format!(
                r#"{{"type":"expense","category":"Food","amount":{},"date":"2024-05-{:02}"}}"#,
                day, day
            )),
        )
        .unwrap();
    }

    let query: ListQuery = serde_json::from_str(r#"{"offset":"0"}"#).unwrap();
    let page = svc.list("alice", &query.parse().unwrap()).unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].date.to_string(), "2024-05-12");

    let query: ListQuery =
        serde_json::from_str(r#"{"startDate":"2024-05-03","endDate":"2024-05-05"}"#).unwrap();
    let ranged = svc.list("alice", &query.parse().unwrap()).unwrap();
    let dates: Vec<String> = ranged.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-05-05", "2024-05-04", "2024-05-03"]);

    let query: ListQuery = serde_json::from_str(r#"{"limit":"-3"}"#).unwrap();
    assert!(matches!(query.parse(), Err(Error::Validation(_))));
}

// =============================================================================
// Analytics
// =============================================================================

#[test]
fn test_food_and_salary_example() {
    let svc = service_at("2024-05-15");
    for body in [
        r#"{"type":"expense","category":"Food","amount":30,"date":"2024-05-01"}"#,
        r#"{"type":"expense","category":"Food","amount":20,"date":"2024-05-02"}"#,
        r#"{"type":"income","category":"Salary","amount":1000,"date":"2024-05-01"}"#,
    ] {
        svc.create("alice", &input(body)).unwrap();
    }

    let spec = WindowQuery::default().parse().unwrap();
    let summary = svc.spending_summary("alice", &spec).unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["period"]["startDate"], "2024-04-15");
    assert_eq!(json["period"]["endDate"], "2024-05-15");
    assert_eq!(json["totalExpenses"], 50.0);
    assert_eq!(json["totalIncome"], 1000.0);
    assert_eq!(json["netAmount"], 950.0);
    assert_eq!(json["transactionCount"], 3);

    let categories = svc.category_analysis("alice", &spec, None).unwrap();
    let json = serde_json::to_value(&categories).unwrap();
    assert_eq!(json["categoryCount"], 1);
    assert_eq!(json["categories"][0]["category"], "Food");
    assert_eq!(json["categories"][0]["total"], 50.0);
    assert_eq!(json["categories"][0]["count"], 2);
    assert_eq!(json["categories"][0]["percentage"], 100.0);
    assert_eq!(json["categories"][0]["averagePerTransaction"], 25.0);

    let analysis = svc.spending_analysis("alice", &spec).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["summary"]["netAmount"], 950.0);
    assert_eq!(json["topCategories"][0]["category"], "Food");
    assert!(json["topCategories"][0].get("transactions").is_none());
    assert_eq!(json["dailyTrend"][0]["date"], "2024-05-01");
    assert_eq!(json["dailyTrend"][0]["expenses"], 30.0);
    assert_eq!(json["dailyTrend"][0]["income"], 1000.0);
    assert_eq!(json["recentTransactions"][0]["date"], "2024-05-02");
}

#[test]
fn test_window_query_precedence() {
    let svc = service_at("2024-05-15");

    let cases = [
        (r#"{"period":"week"}"#, "2024-05-08"),
        (r#"{"days":"10"}"#, "2024-05-05"),
        (r#"{"days":"10","weeks":"1"}"#, "2024-05-05"),
        (r#"{"months":"1"}"#, "2024-04-15"),
        (r#"{"period":"day"}"#, "2024-05-15"),
        (r#"{"period":"fortnight"}"#, "2024-04-15"),
    ];
    for (query, expected_start) in cases {
        let raw: WindowQuery = serde_json::from_str(query).unwrap();
        let summary = svc
            .spending_summary("alice", &raw.parse().unwrap())
            .unwrap();
        assert_eq!(summary.period.start_date, expected_start, "{}", query);
        assert_eq!(summary.period.end_date, "2024-05-15");
    }

    let raw: WindowQuery = serde_json::from_str(r#"{"days":"ten"}"#).unwrap();
    assert!(matches!(raw.parse(), Err(Error::Validation(_))));
}

// =============================================================================
// Encryption
// =============================================================================

#[test]
fn test_encrypted_database_reopens_with_same_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let path = path.to_string_lossy();

    let id = {
        let svc = LedgerService::new(Database::new_with_key(&path, Some("correct horse")).unwrap());
        svc.create(
            "alice",
            &input(r#"{"type":"expense","category":"Food","amount":12.5}"#),
        )
        .unwrap()
        .id
    };

    let reopened =
        LedgerService::new(Database::new_with_key(&path, Some("correct horse")).unwrap());
    assert_eq!(reopened.get("alice", &id).unwrap().amount, 12.5);

    assert!(Database::new_with_key(&path, Some("wrong passphrase")).is_err());
}

#[test]
fn test_is_encrypted_reflects_how_database_was_opened() {
    let dir = tempfile::tempdir().unwrap();
    let keyed = dir.path().join("keyed.db");
    let plain = dir.path().join("plain.db");

    let db = Database::new_with_key(&keyed.to_string_lossy(), Some("pw")).unwrap();
    assert!(db.is_encrypted());

    let db = Database::new_unencrypted(&plain.to_string_lossy()).unwrap();
    assert!(!db.is_encrypted());

    // The plaintext file opens without a key; the keyed one does not
    assert!(Database::new_unencrypted(&plain.to_string_lossy()).is_ok());
    assert!(Database::new_unencrypted(&keyed.to_string_lossy()).is_err());
}
