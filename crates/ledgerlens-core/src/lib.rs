//! LedgerLens Core Library
//!
//! Per-owner ledger storage and spending analytics:
//! - Time window resolution (`window`)
//! - Owner-scoped persistence contract and its SQLite implementation (`ledger`, `db`)
//! - Pure aggregations: totals, category breakdowns, daily trends (`aggregation`)
//! - The `LedgerService` facade used by the server and CLI (`service`)

pub mod aggregation;
pub mod clock;
pub mod db;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod service;
pub mod validation;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use identity::{ChainedIdentity, IdentityProvider, SingleOwner};
pub use ledger::LedgerStore;
pub use models::{
    CategoryAnalysis, CategoryBucket, CategoryDetail, DailyTrendPoint, ListFilter, SpendingAnalysis,
    SpendingSummary, TimeWindow, TopCategory, Totals, Transaction, TransactionType,
};
pub use service::LedgerService;
pub use validation::{ListQuery, TransactionInput, TransactionPatchInput};
pub use window::{WindowQuery, WindowSpec};
