//! Domain models for LedgerLens

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of money movement for a ledger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    /// Exact match only: the wire values are lowercase
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Owning principal; never changes after creation
    #[serde(rename = "user_id")]
    pub owner_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub date: NaiveDate,
}

/// A validated partial update. `None` means "leave the column alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    /// `Some(None)` clears the note
    pub note: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.note.is_none()
            && self.date.is_none()
    }
}

/// Validated list filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Inclusive date range an analysis ran over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_date: String,
    pub end_date: String,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Income/expense totals over a record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_expenses: f64,
    pub total_income: f64,
    #[serde(rename = "netAmount")]
    pub net: f64,
    #[serde(rename = "transactionCount")]
    pub count: usize,
}

/// Records sharing one category, with their share of the grand total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
    /// Members, newest date first
    pub transactions: Vec<Transaction>,
}

/// Category entry in the full analysis (no member list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

impl From<&CategoryBucket> for TopCategory {
    fn from(bucket: &CategoryBucket) -> Self {
        Self {
            category: bucket.category.clone(),
            total: bucket.total,
            count: bucket.count,
            percentage: bucket.percentage,
        }
    }
}

/// Per-day income and expense sums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub expenses: f64,
    pub income: f64,
}

/// Totals over a resolved window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub period: TimeWindow,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Totals, ranked categories, trend and recent activity over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnalysis {
    pub period: TimeWindow,
    pub summary: Totals,
    pub top_categories: Vec<TopCategory>,
    pub daily_trend: Vec<DailyTrendPoint>,
    pub recent_transactions: Vec<Transaction>,
}

/// One category in the category analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
    pub average_per_transaction: f64,
    pub transactions: Vec<Transaction>,
}

impl From<CategoryBucket> for CategoryDetail {
    fn from(bucket: CategoryBucket) -> Self {
        let average_per_transaction = if bucket.count > 0 {
            bucket.total / bucket.count as f64
        } else {
            0.0
        };
        Self {
            category: bucket.category,
            total: bucket.total,
            count: bucket.count,
            percentage: bucket.percentage,
            average_per_transaction,
            transactions: bucket.transactions,
        }
    }
}

/// Every expense category over a window, largest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub period: TimeWindow,
    pub total_expenses: f64,
    pub category_count: usize,
    pub categories: Vec<CategoryDetail>,
    pub filtered_by: Option<String>,
}
