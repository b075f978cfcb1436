//! Time window resolution
//!
//! Every analysis operation turns its caller-supplied window fields into a
//! concrete inclusive `[start, end]` date pair through [`resolve`].
//!
//! Precedence, first match wins:
//! 1. explicit `startDate` + `endDate` (used verbatim)
//! 2. relative unit: `days` > `weeks` > `months` > `years`
//! 3. named `period`: `day`, `week`, `month`, `year` (anything else: 30 days)
//! 4. nothing: 30 days
//!
//! Month and year subtraction clamp to the last valid day of the target
//! month, so 2024-03-31 minus one month is 2024-02-29.

use chrono::{Days, Months, NaiveDate};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::TimeWindow;

/// Lookback used when nothing (or an unknown period) is supplied
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Parsed window fields. Counts of zero are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSpec {
    pub days: Option<u32>,
    pub weeks: Option<u32>,
    pub months: Option<u32>,
    pub years: Option<u32>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Raw window fields as they arrive in a query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<String>,
    pub weeks: Option<String>,
    pub months: Option<String>,
    pub years: Option<String>,
    pub period: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl WindowQuery {
    /// Parse and validate the raw strings. Empty values count as absent.
    pub fn parse(&self) -> Result<WindowSpec> {
        Ok(WindowSpec {
            days: parse_count(self.days.as_deref(), "days")?,
            weeks: parse_count(self.weeks.as_deref(), "weeks")?,
            months: parse_count(self.months.as_deref(), "months")?,
            years: parse_count(self.years.as_deref(), "years")?,
            period: non_empty(self.period.as_deref()),
            start_date: parse_date_bound(self.start_date.as_deref(), "startDate")?,
            end_date: parse_date_bound(self.end_date.as_deref(), "endDate")?,
        })
    }
}

/// How far back from today a window starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookback {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Lookback {
    fn start_from(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(n) => today.checked_sub_days(Days::new(u64::from(n))),
            Self::Weeks(n) => today.checked_sub_days(Days::new(u64::from(n) * 7)),
            Self::Months(n) => today.checked_sub_months(Months::new(n)),
            Self::Years(n) => n
                .checked_mul(12)
                .and_then(|months| today.checked_sub_months(Months::new(months))),
        }
    }

    /// Fixed table for named periods
    fn for_period(token: &str) -> Self {
        match token {
            "day" => Self::Days(0),
            "week" => Self::Days(7),
            "month" => Self::Months(1),
            "year" => Self::Years(1),
            _ => Self::Days(DEFAULT_LOOKBACK_DAYS),
        }
    }
}

/// Resolve a window specification against `today`
pub fn resolve(spec: &WindowSpec, today: NaiveDate) -> Result<TimeWindow> {
    if let (Some(start), Some(end)) = (&spec.start_date, &spec.end_date) {
        // Ordering and calendar validity are not checked
        return Ok(TimeWindow {
            start_date: start.clone(),
            end_date: end.clone(),
        });
    }

    let present = |n: Option<u32>| n.filter(|n| *n > 0);

    let lookback = if let Some(n) = present(spec.days) {
        Lookback::Days(n)
    } else if let Some(n) = present(spec.weeks) {
        Lookback::Weeks(n)
    } else if let Some(n) = present(spec.months) {
        Lookback::Months(n)
    } else if let Some(n) = present(spec.years) {
        Lookback::Years(n)
    } else if let Some(period) = spec.period.as_deref().filter(|p| !p.is_empty()) {
        Lookback::for_period(period)
    } else {
        Lookback::Days(DEFAULT_LOOKBACK_DAYS)
    };

    let start = lookback.start_from(today).ok_or_else(|| {
        Error::validation("Requested window starts before the supported date range")
    })?;

    Ok(TimeWindow::new(start, today))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_count(value: Option<&str>, field: &str) -> Result<Option<u32>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Error::validation(format!("{} must be a non-negative integer", field))),
    }
}

/// Accept a `YYYY-MM-DD` shaped bound without checking calendar validity
pub(crate) fn parse_date_bound(value: Option<&str>, field: &str) -> Result<Option<String>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) if looks_like_iso_date(&raw) => Ok(Some(raw)),
        Some(_) => Err(Error::validation(format!(
            "{} must be a date in YYYY-MM-DD format",
            field
        ))),
    }
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_default_is_thirty_days() {
        let w = resolve(&WindowSpec::default(), today()).unwrap();
        assert_eq!(w, window("2024-04-15", "2024-05-15"));
    }

    #[test]
    fn test_named_periods() {
        let cases = [
            ("day", "2024-05-15"),
            ("week", "2024-05-08"),
            ("month", "2024-04-15"),
            ("year", "2023-05-15"),
            ("fortnight", "2024-04-15"),
        ];
        for (period, start) in cases {
            let spec = WindowSpec {
                period: Some(period.to_string()),
                ..Default::default()
            };
            assert_eq!(
                resolve(&spec, today()).unwrap(),
                window(start, "2024-05-15"),
                "period={}",
                period
            );
        }
    }

    #[test]
    fn test_days_lookback() {
        let spec = WindowSpec {
            days: Some(10),
            ..Default::default()
        };
        assert_eq!(
            resolve(&spec, today()).unwrap(),
            window("2024-05-05", "2024-05-15")
        );
    }

    #[test]
    fn test_relative_unit_priority() {
        // days wins over everything else that is relative or named
        let spec = WindowSpec {
            days: Some(3),
            weeks: Some(2),
            months: Some(1),
            years: Some(1),
            period: Some("year".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve(&spec, today()).unwrap().start_date, "2024-05-12");

        let spec = WindowSpec {
            weeks: Some(2),
            months: Some(1),
            ..Default::default()
        };
        assert_eq!(resolve(&spec, today()).unwrap().start_date, "2024-05-01");

        let spec = WindowSpec {
            months: Some(2),
            years: Some(1),
            ..Default::default()
        };
        assert_eq!(resolve(&spec, today()).unwrap().start_date, "2024-03-15");

        let spec = WindowSpec {
            years: Some(2),
            period: Some("day".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve(&spec, today()).unwrap().start_date, "2022-05-15");
    }

    #[test]
    fn test_zero_count_falls_through() {
        let spec = WindowSpec {
            days: Some(0),
            period: Some("week".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve(&spec, today()).unwrap().start_date, "2024-05-08");
    }

    #[test]
    fn test_explicit_pair_is_verbatim() {
        let spec = WindowSpec {
            days: Some(5),
            start_date: Some("2024-06-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        // No ordering check: reversed bounds pass through untouched
        assert_eq!(
            resolve(&spec, today()).unwrap(),
            window("2024-06-01", "2024-01-01")
        );
    }

    #[test]
    fn test_lone_bound_is_ignored() {
        let spec = WindowSpec {
            start_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve(&spec, today()).unwrap(),
            window("2024-04-15", "2024-05-15")
        );
    }

    #[test]
    fn test_month_subtraction_clamps() {
        let spec = WindowSpec {
            months: Some(1),
            ..Default::default()
        };
        let march_31 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(resolve(&spec, march_31).unwrap().start_date, "2024-02-29");

        let spec = WindowSpec {
            years: Some(1),
            ..Default::default()
        };
        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(resolve(&spec, leap_day).unwrap().start_date, "2023-02-28");
    }

    #[test]
    fn test_overflowing_lookback_is_rejected() {
        let spec = WindowSpec {
            years: Some(u32::MAX),
            ..Default::default()
        };
        assert!(matches!(resolve(&spec, today()), Err(Error::Validation(_))));
    }

    #[test]
    fn test_query_parse() {
        let query = WindowQuery {
            days: Some(" 7 ".to_string()),
            weeks: Some(String::new()),
            period: Some("month".to_string()),
            ..Default::default()
        };
        let spec = query.parse().unwrap();
        assert_eq!(spec.days, Some(7));
        assert_eq!(spec.weeks, None);
        assert_eq!(spec.period.as_deref(), Some("month"));
    }

    #[test]
    fn test_query_parse_rejects_bad_numbers() {
        for bad in ["abc", "-3", "1.5", "NaN"] {
            let query = WindowQuery {
                months: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(
                matches!(query.parse(), Err(Error::Validation(_))),
                "months={}",
                bad
            );
        }
    }

    #[test]
    fn test_query_parse_date_shape() {
        let query = WindowQuery {
            start_date: Some("2024-02-30".to_string()),
            end_date: Some("2024-03-01".to_string()),
            ..Default::default()
        };
        // Shape is enforced, calendar validity is not
        assert!(query.parse().is_ok());

        let query = WindowQuery {
            start_date: Some("05/01/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.parse(), Err(Error::Validation(_))));
    }
}
