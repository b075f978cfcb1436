//! Parse-and-validate boundary for caller input
//!
//! Raw request shapes keep every field optional and loosely typed so that a
//! bad value turns into `Error::Validation` with a readable message instead
//! of a generic deserialization failure.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::models::{ListFilter, NewTransaction, TransactionPatch, TransactionType};
use crate::window::parse_date_bound;

/// Body of a create request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub date: Option<String>,
}

/// Body of an update request. `note: null` is distinct from a missing note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatchInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub note: Option<Option<String>>,
    pub date: Option<String>,
}

/// Query string of a list request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_kind(raw: &str) -> Result<TransactionType> {
    raw.parse()
        .map_err(|_| Error::validation("Type must be either \"income\" or \"expense\""))
}

fn parse_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::validation("Amount must be a positive number"))
    }
}

fn parse_category(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Category must be a non-empty string"));
    }
    Ok(trimmed.to_string())
}

fn parse_note(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("Date must be a valid date in YYYY-MM-DD format"))
}

impl TransactionInput {
    /// Validate into an insertable record; a missing date becomes `today`
    pub fn validate(&self, today: NaiveDate) -> Result<NewTransaction> {
        let (Some(kind), Some(category), Some(amount)) =
            (self.kind.as_deref(), self.category.as_deref(), self.amount)
        else {
            return Err(Error::validation(
                "Missing required fields: type, category, and amount are required",
            ));
        };

        let kind = parse_kind(kind)?;
        let amount = parse_amount(amount)?;
        let category = parse_category(category)?;
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };

        Ok(NewTransaction {
            kind,
            category,
            amount,
            note: parse_note(self.note.as_deref()),
            date,
        })
    }
}

impl TransactionPatchInput {
    /// Validate only the fields that are present
    pub fn validate(&self) -> Result<TransactionPatch> {
        Ok(TransactionPatch {
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
            category: self.category.as_deref().map(parse_category).transpose()?,
            amount: self.amount.map(parse_amount).transpose()?,
            note: self
                .note
                .as_ref()
                .map(|note| parse_note(note.as_deref())),
            date: self.date.as_deref().map(parse_date).transpose()?,
        })
    }
}

impl ListQuery {
    pub fn parse(&self) -> Result<ListFilter> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let kind = present(&self.kind)
            .map(|k| {
                k.parse::<TransactionType>().map_err(|_| {
                    Error::validation(
                        "Type query parameter must be either \"income\" or \"expense\"",
                    )
                })
            })
            .transpose()?;

        let limit = present(&self.limit)
            .map(|raw| match raw.parse::<i64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(Error::validation("Limit must be a positive number")),
            })
            .transpose()?;

        let offset = present(&self.offset)
            .map(|raw| match raw.parse::<i64>() {
                Ok(n) if n >= 0 => Ok(n),
                _ => Err(Error::validation("Offset must be a non-negative number")),
            })
            .transpose()?;

        Ok(ListFilter {
            kind,
            category: present(&self.category),
            start_date: parse_date_bound(self.start_date.as_deref(), "startDate")?,
            end_date: parse_date_bound(self.end_date.as_deref(), "endDate")?,
            limit,
            offset,
        })
    }
}
