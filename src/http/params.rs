//! Query-string criteria for the listing routes.
//!
//! Parsing is lenient: a value that cannot be understood leaves its
//! dimension unconstrained instead of failing the request.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rocket::form::FromForm;

use crate::mail::Criteria;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Raw `since`, `until`, `to` and `from` query values
#[derive(Debug, Clone, FromForm)]
pub struct CriteriaParams {
    pub since: Option<String>,
    pub until: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
}

impl CriteriaParams {
    /// Convert into criteria, dropping values that do not parse
    pub fn to_criteria(&self) -> Criteria {
        Criteria {
            since: self.since.as_deref().and_then(parse_timestamp),
            until: self.until.as_deref().and_then(parse_timestamp),
            to: self.to.as_deref().and_then(parse_address),
            from: self.from.as_deref().and_then(parse_address),
        }
    }
}

/// Parse a timestamp given as RFC 3339, RFC 2822, a naive date-time (UTC) or
/// a bare date (midnight UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    // An unescaped '+' in a query string arrives as a space
    if value.contains(' ') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&value.replace(' ', "+")) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    None
}

/// Trimmed address, or `None` when blank
pub fn parse_address(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}
