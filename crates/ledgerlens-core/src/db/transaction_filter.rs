//! Transaction filter builder for constructing dynamic SQL queries
//!
//! The owner predicate is not optional: a filter can only be created
//! through [`TransactionFilter::for_owner`].

use crate::models::{ListFilter, TransactionType};

/// Page size applied when an offset arrives without a limit
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Builder for constructing owner-scoped transaction query filters
///
/// The lifetime `'query` represents how long the borrowed filter values
/// (owner id, category, date bounds) must remain valid.
#[derive(Debug, Clone)]
pub struct TransactionFilter<'query> {
    owner_id: &'query str,
    pub kind: Option<TransactionType>,
    pub category: Option<&'query str>,
    pub start_date: Option<&'query str>,
    pub end_date: Option<&'query str>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (always has the owner predicate)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// LIMIT/OFFSET clause (empty when unpaginated)
    pub page_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> TransactionFilter<'query> {
    /// Start a filter restricted to one owner's records
    pub fn for_owner(owner_id: &'query str) -> Self {
        Self {
            owner_id,
            kind: None,
            category: None,
            start_date: None,
            end_date: None,
            limit: None,
            offset: None,
        }
    }

    /// Build a filter from validated list parameters
    pub fn from_list(owner_id: &'query str, list: &'query ListFilter) -> Self {
        Self::for_owner(owner_id)
            .kind(list.kind)
            .category(list.category.as_deref())
            .start_date(list.start_date.as_deref())
            .end_date(list.end_date.as_deref())
            .limit(list.limit)
            .offset(list.offset)
    }

    /// Set type filter
    pub fn kind(mut self, kind: Option<TransactionType>) -> Self {
        self.kind = kind;
        self
    }

    /// Set category filter (exact match)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Set inclusive lower date bound
    pub fn start_date(mut self, date: Option<&'query str>) -> Self {
        self.start_date = date;
        self
    }

    /// Set inclusive upper date bound
    pub fn end_date(mut self, date: Option<&'query str>) -> Self {
        self.end_date = date;
        self
    }

    /// Set maximum number of rows
    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    /// Set number of rows to skip
    pub fn offset(mut self, offset: Option<i64>) -> Self {
        self.offset = offset;
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = vec!["t.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.owner_id.to_string())];

        if let Some(kind) = self.kind {
            conditions.push("t.type = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        if let Some(category) = self.category {
            conditions.push("t.category = ?".to_string());
            params.push(Box::new(category.to_string()));
        }

        if let Some(start) = self.start_date {
            conditions.push("t.date >= ?".to_string());
            params.push(Box::new(start.to_string()));
        }

        if let Some(end) = self.end_date {
            conditions.push("t.date <= ?".to_string());
            params.push(Box::new(end.to_string()));
        }

        let page_clause = match (self.limit, self.offset) {
            (Some(limit), offset) => {
                params.push(Box::new(limit));
                params.push(Box::new(offset.unwrap_or(0)));
                "LIMIT ? OFFSET ?".to_string()
            }
            (None, Some(offset)) => {
                params.push(Box::new(DEFAULT_PAGE_SIZE));
                params.push(Box::new(offset));
                "LIMIT ? OFFSET ?".to_string()
            }
            (None, None) => String::new(),
        };

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            // Ties on date: most recently created first
            order_clause: "ORDER BY t.date DESC, t.created_at DESC, t.rowid DESC",
            page_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Build the full SELECT for transaction rows
    pub fn build_select_query(&self, columns: &str) -> String {
        format!(
            "SELECT {} FROM transactions t {} {} {}",
            columns, self.where_clause, self.order_clause, self.page_clause
        )
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
