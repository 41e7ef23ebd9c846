//! Core types for queue views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default 1-based page index when neither cache nor caller supplies one.
pub const DEFAULT_PAGE: u64 = 1;

/// Default rows per page when neither cache nor caller supplies one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A row of queue data as returned by the server.
pub type Row = serde_json::Value;

/// Identifier for one logical queue whose query state persists
/// independently of others (e.g. "counseling", "closeout").
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewKey(pub String);

impl ViewKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewKey({})", self.0)
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ViewKey {
    fn from(s: &str) -> Self {
        ViewKey(s.to_string())
    }
}

impl From<String> for ViewKey {
    fn from(s: String) -> Self {
        ViewKey(s)
    }
}

/// Identifier for one table column.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub String);

impl ColumnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        ColumnId(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        ColumnId(s)
    }
}

/// Sort direction as sent to the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sort entry; only the first entry of a sort list is sent to the
/// server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: ColumnId,
    pub desc: bool,
}

impl SortSpec {
    /// Ascending sort on a column.
    pub fn asc(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    /// Descending sort on a column.
    pub fn desc(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }

    pub fn order(&self) -> SortOrder {
        if self.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// A filter's stored value.
///
/// Two multi-value representations coexist and are never normalized into
/// each other: a `Single` string may carry a comma-delimited set, while
/// `Many` is a real sequence. Decomposition rules live in [`crate::codec`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    pub fn single(value: impl Into<String>) -> Self {
        FilterValue::Single(value.into())
    }

    pub fn many(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, FilterValue::Many(_))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Single(s.to_string())
    }
}

/// One active column filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub id: ColumnId,
    pub value: FilterValue,
}

impl FilterSpec {
    pub fn new(id: impl Into<ColumnId>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// The live in-memory query state of one mounted view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub filters: Vec<FilterSpec>,
    pub sort: Vec<SortSpec>,
    /// 1-based page index.
    pub page: u64,
    pub page_size: u64,
}

/// The persisted counterpart of [`QueryState`], one per [`ViewKey`].
///
/// Null fields mean "never set"; the view falls back to caller defaults
/// for them on mount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub sort_param: Option<Vec<SortSpec>>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
}

/// Normalized parameters for one paginated fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub sort: Option<ColumnId>,
    pub order: Option<SortOrder>,
    pub filters: Vec<FilterSpec>,
    pub current_page: u64,
    pub current_page_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_as_gbloc: Option<String>,
}

/// One page of results as returned by the server.
///
/// `total_count` reflects the unpaginated match count and is authoritative
/// for page-count derivation; `data` holds at most one page of rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPage {
    pub data: Vec<Row>,
    pub total_count: u64,
    pub page: u64,
    pub per_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_key_display() {
        let key = ViewKey::from("counseling");
        assert_eq!(key.to_string(), "counseling");
        assert_eq!(format!("{:?}", key), "ViewKey(counseling)");
    }

    #[test]
    fn test_sort_spec_order() {
        assert_eq!(SortSpec::asc("lastName").order(), SortOrder::Asc);
        assert_eq!(SortSpec::desc("submittedAt").order(), SortOrder::Desc);
    }

    #[test]
    fn test_filter_value_untagged_serde() {
        let single: FilterValue = serde_json::from_str("\"ARMY\"").unwrap();
        assert_eq!(single, FilterValue::single("ARMY"));

        let many: FilterValue = serde_json::from_str("[\"DRAFT\",\"SUBMITTED\"]").unwrap();
        assert_eq!(
            many,
            FilterValue::many(vec!["DRAFT".to_string(), "SUBMITTED".to_string()])
        );

        assert_eq!(serde_json::to_string(&single).unwrap(), "\"ARMY\"");
        assert_eq!(
            serde_json::to_string(&many).unwrap(),
            "[\"DRAFT\",\"SUBMITTED\"]"
        );
    }

    #[test]
    fn test_cache_record_field_names() {
        let record = CacheRecord {
            filters: vec![FilterSpec::new("branch", "ARMY")],
            sort_param: Some(vec![SortSpec::asc("lastName")]),
            page: Some(2),
            page_size: Some(50),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("sortParam").is_some());
        assert!(json.get("pageSize").is_some());
        assert_eq!(json["page"], 2);
        assert_eq!(json["filters"][0]["id"], "branch");
    }

    #[test]
    fn test_cache_record_default_is_empty() {
        let record = CacheRecord::default();
        assert!(record.filters.is_empty());
        assert!(record.sort_param.is_none());
        assert!(record.page.is_none());
        assert!(record.page_size.is_none());
    }

    #[test]
    fn test_fetch_params_wire_shape() {
        let params = FetchParams {
            sort: Some(ColumnId::from("status")),
            order: Some(SortOrder::Desc),
            filters: vec![],
            current_page: 1,
            current_page_size: 20,
            view_as_gbloc: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["order"], "desc");
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["currentPageSize"], 20);
        assert!(json.get("viewAsGbloc").is_none());
    }

    #[test]
    fn test_fetch_page_wire_shape() {
        let page: FetchPage = serde_json::from_value(serde_json::json!({
            "data": [{"id": "abc"}],
            "totalCount": 45,
            "page": 1,
            "perPage": 20,
        }))
        .unwrap();
        assert_eq!(page.total_count, 45);
        assert_eq!(page.per_page, 20);
        assert_eq!(page.data.len(), 1);
    }
}
