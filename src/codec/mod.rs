//! Filter value encoding rules.
//!
//! A filter's stored value arrives in one of two multi-value
//! representations: a real sequence of strings, or a single string that
//! may carry a comma-delimited set. Both are preserved as-is; this module
//! owns all decomposition and re-encoding so call sites never learn which
//! representation they hold. Date-parseable strings are always one value,
//! even when the formatted date contains a comma.

pub mod labels;

use crate::types::FilterValue;
use chrono::{DateTime, NaiveDate};

/// Delimiter splitting a single-string filter into multiple values.
const VALUE_DELIMITER: char = ',';

/// Date formats a filter string may arrive in.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%b %d, %Y", "%m/%d/%Y"];

/// Whether a raw filter string parses as a date.
pub fn is_date_like(raw: &str) -> bool {
    let raw = raw.trim();
    if DateTime::parse_from_rfc3339(raw).is_ok() {
        return true;
    }
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(raw, format).is_ok())
}

/// Decompose a filter value into its individually removable values.
///
/// Sequence elements pass through untouched; a single string splits on
/// the delimiter unless it is date-like or holds no delimiter at all.
pub fn values(value: &FilterValue) -> Vec<String> {
    match value {
        FilterValue::Many(items) => items.clone(),
        FilterValue::Single(raw) => {
            if is_date_like(raw) || !raw.contains(VALUE_DELIMITER) {
                vec![raw.clone()]
            } else {
                raw.split(VALUE_DELIMITER).map(str::to_string).collect()
            }
        }
    }
}

/// Number of individually removable values a filter holds.
pub fn value_count(value: &FilterValue) -> usize {
    values(value).len()
}

/// Remove every occurrence of `target`, re-encoding in the same
/// representation the value arrived in. Returns `None` when the last
/// value was removed; a target that is not present leaves the value
/// unchanged.
pub fn remove_value(value: &FilterValue, target: &str) -> Option<FilterValue> {
    match value {
        FilterValue::Many(items) => {
            let remaining: Vec<String> = items
                .iter()
                .filter(|item| item.as_str() != target)
                .cloned()
                .collect();
            if remaining.is_empty() {
                None
            } else {
                Some(FilterValue::Many(remaining))
            }
        }
        FilterValue::Single(raw) => {
            if is_date_like(raw) || !raw.contains(VALUE_DELIMITER) {
                if raw == target {
                    None
                } else {
                    Some(FilterValue::Single(raw.clone()))
                }
            } else {
                let remaining: Vec<&str> = raw
                    .split(VALUE_DELIMITER)
                    .filter(|token| *token != target)
                    .collect();
                if remaining.is_empty() {
                    None
                } else {
                    Some(FilterValue::Single(remaining.join(",")))
                }
            }
        }
    }
}
