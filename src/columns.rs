//! Declarative column descriptors.
//!
//! Columns are data: a header, a way to read a cell out of a row (a
//! dotted field path or a pure function), capability flags, and an
//! optional export formatter. The controller never interprets filter
//! widgets; they ride along for the rendering layer.

use crate::error::{QueueError, Result};
use crate::types::{ColumnId, Row};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Pure row-to-text function for computed cells and export values.
pub type CellFn = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// How a column reads its value out of a row.
#[derive(Clone)]
pub enum Accessor {
    /// Dotted field path into the row object (e.g. `"customer.last_name"`).
    Field(String),
    /// Computed from the whole row.
    Computed(CellFn),
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(path) => write!(f, "Accessor::Field({})", path),
            Accessor::Computed(_) => write!(f, "Accessor::Computed(..)"),
        }
    }
}

/// One option of a select or multi-select filter widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declarative filter widget; opaque to the controller.
#[derive(Clone, Debug)]
pub enum FilterWidget {
    Text,
    Date,
    Select(Vec<SelectOption>),
    MultiSelect(Vec<SelectOption>),
}

/// Declarative description of one table column.
///
/// Immutable for the lifetime of a view; supplied by the caller and
/// never mutated by the controller.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub header: String,
    pub accessor: Accessor,
    pub filterable: bool,
    pub filter_widget: Option<FilterWidget>,
    pub sortable: bool,
    pub export_value: Option<CellFn>,
    pub hidden: bool,
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl ColumnDescriptor {
    /// Column reading a dotted field path.
    pub fn field(
        id: impl Into<ColumnId>,
        header: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(id, header, Accessor::Field(path.into()))
    }

    /// Column computed from the whole row.
    pub fn computed(
        id: impl Into<ColumnId>,
        header: impl Into<String>,
        cell: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, header, Accessor::Computed(Arc::new(cell)))
    }

    pub fn new(id: impl Into<ColumnId>, header: impl Into<String>, accessor: Accessor) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor,
            filterable: false,
            filter_widget: None,
            sortable: true,
            export_value: None,
            hidden: false,
        }
    }

    /// Mark the column filterable, with its widget.
    pub fn with_filter(mut self, widget: FilterWidget) -> Self {
        self.filterable = true;
        self.filter_widget = Some(widget);
        self
    }

    /// Override the exported text for this column.
    pub fn with_export_value(
        mut self,
        export: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        self.export_value = Some(Arc::new(export));
        self
    }

    /// Disable sorting on this column.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Exclude the column from display and export.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Display text for `row`.
    pub fn cell(&self, row: &Row) -> String {
        match &self.accessor {
            Accessor::Computed(cell) => cell(row),
            Accessor::Field(path) => field_path(row, path).map(value_to_cell).unwrap_or_default(),
        }
    }

    /// Exported text for `row`: the export override if declared, else a
    /// computed accessor, else the accessor's field path.
    pub fn export_cell(&self, row: &Row) -> String {
        if let Some(export) = &self.export_value {
            return export(row);
        }
        self.cell(row)
    }
}

/// Walk a dotted field path into a row object.
pub fn field_path<'a>(row: &'a Row, path: &str) -> Option<&'a Row> {
    let mut current = row;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Flatten a JSON value to cell text.
pub fn value_to_cell(value: &Row) -> String {
    match value {
        Row::Null => String::new(),
        Row::String(s) => s.clone(),
        Row::Bool(b) => b.to_string(),
        Row::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Ordered, id-unique set of column descriptors.
#[derive(Clone, Debug)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Build a set, rejecting duplicate column ids.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.clone()) {
                return Err(QueueError::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn get(&self, id: &ColumnId) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Columns included in an export, in declaration order.
    pub fn exportable(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| !column.hidden)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
