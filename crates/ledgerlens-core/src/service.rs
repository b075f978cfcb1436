//! Owner-scoped ledger operations and spending analytics
//!
//! `LedgerService` is the one entry point transports and the CLI call. It
//! validates input, resolves windows against its clock, fetches through the
//! [`LedgerStore`] and shapes the aggregation results.

use std::sync::Arc;

use tracing::debug;

use crate::aggregation::{self, RECENT_TRANSACTION_LIMIT, TOP_CATEGORY_LIMIT};
use crate::clock::{Clock, SystemClock};
use crate::db::TransactionFilter;
use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{
    CategoryAnalysis, CategoryDetail, ListFilter, SpendingAnalysis, SpendingSummary, TopCategory,
    Transaction, TransactionType,
};
use crate::validation::{TransactionInput, TransactionPatchInput};
use crate::window::{self, WindowSpec};

pub struct LedgerService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Service on the wall clock
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn create(&self, owner_id: &str, input: &TransactionInput) -> Result<Transaction> {
        let new_tx = input.validate(self.clock.today())?;
        self.store.insert(owner_id, &new_tx)
    }

    pub fn get(&self, owner_id: &str, id: &str) -> Result<Transaction> {
        self.store.select_one(id, owner_id)
    }

    /// Apply the fields present in `patch`; an empty patch returns the record unchanged
    pub fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &TransactionPatchInput,
    ) -> Result<Transaction> {
        let patch = patch.validate()?;
        self.store.update(id, owner_id, &patch)
    }

    pub fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        self.store.delete(id, owner_id)
    }

    pub fn list(&self, owner_id: &str, filter: &ListFilter) -> Result<Vec<Transaction>> {
        self.store
            .select_by_owner(&TransactionFilter::from_list(owner_id, filter))
    }

    /// Income and expense totals over the resolved window
    pub fn spending_summary(&self, owner_id: &str, spec: &WindowSpec) -> Result<SpendingSummary> {
        let period = window::resolve(spec, self.clock.today())?;
        let records = self
            .store
            .fetch_by_owner_and_window(owner_id, &period, None, None)?;
        debug!(owner_id, records = records.len(), "Computing spending summary");

        Ok(SpendingSummary {
            totals: aggregation::totals(&records),
            period,
        })
    }

    /// Totals, top expense categories, daily trend and recent activity
    pub fn spending_analysis(&self, owner_id: &str, spec: &WindowSpec) -> Result<SpendingAnalysis> {
        let period = window::resolve(spec, self.clock.today())?;
        let records = self
            .store
            .fetch_by_owner_and_window(owner_id, &period, None, None)?;
        debug!(owner_id, records = records.len(), "Computing spending analysis");

        let expenses = aggregation::of_type(&records, TransactionType::Expense);
        let top = aggregation::top_categories(
            aggregation::category_breakdown(&expenses),
            TOP_CATEGORY_LIMIT,
        );

        Ok(SpendingAnalysis {
            summary: aggregation::totals(&records),
            top_categories: top.iter().map(TopCategory::from).collect(),
            daily_trend: aggregation::daily_trend(&records),
            recent_transactions: aggregation::recent_transactions(
                &records,
                RECENT_TRANSACTION_LIMIT,
            ),
            period,
        })
    }

    /// Every expense category over the window, optionally restricted to one
    pub fn category_analysis(
        &self,
        owner_id: &str,
        spec: &WindowSpec,
        category: Option<&str>,
    ) -> Result<CategoryAnalysis> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let period = window::resolve(spec, self.clock.today())?;
        let expenses = self.store.fetch_by_owner_and_window(
            owner_id,
            &period,
            Some(TransactionType::Expense),
            category,
        )?;
        debug!(owner_id, records = expenses.len(), "Computing category analysis");

        let ranked = aggregation::rank_by_total(aggregation::category_breakdown(&expenses));

        Ok(CategoryAnalysis {
            total_expenses: aggregation::totals(&expenses).total_expenses,
            category_count: ranked.len(),
            categories: ranked.into_iter().map(CategoryDetail::from).collect(),
            filtered_by: category.map(str::to_string),
            period,
        })
    }
}
