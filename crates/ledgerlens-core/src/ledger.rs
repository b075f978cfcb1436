//! Persistence contract for one owner's ledger
//!
//! Every method takes the owner id and implementations must apply it as a
//! hard predicate. A record owned by someone else is reported exactly like
//! a missing one.

use crate::db::TransactionFilter;
use crate::error::Result;
use crate::models::{NewTransaction, TimeWindow, Transaction, TransactionPatch, TransactionType};

pub trait LedgerStore: Send + Sync {
    /// Persist a new record and return it with its assigned id and timestamp
    fn insert(&self, owner_id: &str, tx: &NewTransaction) -> Result<Transaction>;

    /// Records matching the filter, date descending
    fn select_by_owner(&self, filter: &TransactionFilter<'_>) -> Result<Vec<Transaction>>;

    /// One record, or `Error::NotFound`
    fn select_one(&self, id: &str, owner_id: &str) -> Result<Transaction>;

    /// Apply a non-empty patch in a single conditional write, or `Error::NotFound`
    fn update(&self, id: &str, owner_id: &str, patch: &TransactionPatch) -> Result<Transaction>;

    /// Permanently remove a record, or `Error::NotFound`
    fn delete(&self, id: &str, owner_id: &str) -> Result<()>;

    /// Records inside an inclusive window, date descending
    fn fetch_by_owner_and_window(
        &self,
        owner_id: &str,
        window: &TimeWindow,
        kind: Option<TransactionType>,
        category: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let filter = TransactionFilter::for_owner(owner_id)
            .kind(kind)
            .category(category)
            .start_date(Some(window.start_date.as_str()))
            .end_date(Some(window.end_date.as_str()));
        self.select_by_owner(&filter)
    }
}
