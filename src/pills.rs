//! Filter pills derived from the live filter list.
//!
//! Pills are transient view models, one per removable filter value.
//! Labeling follows the value's representation: plain scalars and dates
//! carry the column header, sequence elements carry `"header (value)"`
//! when more than one element exists, and tokens of a comma-delimited
//! string carry their domain label.

use crate::codec::{self, labels};
use crate::columns::ColumnSet;
use crate::types::{ColumnId, FilterSpec, FilterValue};

/// One removable filter-value affordance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPill {
    /// Index of the owning entry in the live filter list.
    pub filter_index: usize,
    pub column: ColumnId,
    /// The value removed when the pill is clicked.
    pub value: String,
    pub label: String,
}

/// The derived pill list plus the aggregate "remove all" affordance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PillSet {
    pub pills: Vec<FilterPill>,
    /// True iff more than one filter value is active in total.
    pub show_clear_all: bool,
}

/// Total individually removable values across all filter entries.
pub fn total_value_count(filters: &[FilterSpec]) -> usize {
    filters
        .iter()
        .map(|filter| codec::value_count(&filter.value))
        .sum()
}

/// Derive the pill list for the live filter list.
pub fn derive_pills(filters: &[FilterSpec], columns: &ColumnSet) -> PillSet {
    let mut pills = Vec::new();

    for (filter_index, filter) in filters.iter().enumerate() {
        let header = columns
            .get(&filter.id)
            .map(|column| column.header.as_str())
            .unwrap_or_else(|| filter.id.as_str());

        match &filter.value {
            FilterValue::Many(items) => {
                for item in items {
                    let label = if items.len() > 1 {
                        format!("{} ({})", header, item)
                    } else {
                        header.to_string()
                    };
                    pills.push(FilterPill {
                        filter_index,
                        column: filter.id.clone(),
                        value: item.clone(),
                        label,
                    });
                }
            }
            FilterValue::Single(_) => {
                let values = codec::values(&filter.value);
                if values.len() == 1 {
                    let value = values.into_iter().next().unwrap_or_default();
                    pills.push(FilterPill {
                        filter_index,
                        column: filter.id.clone(),
                        value,
                        label: header.to_string(),
                    });
                } else {
                    for value in values {
                        pills.push(FilterPill {
                            filter_index,
                            column: filter.id.clone(),
                            label: labels::value_label(&value).to_string(),
                            value,
                        });
                    }
                }
            }
        }
    }

    let show_clear_all = pills.len() > 1;
    PillSet {
        pills,
        show_clear_all,
    }
}
