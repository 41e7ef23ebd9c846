//! Unpaginated CSV export of a view's current logical query.
//!
//! Export reissues the same sort and filters the view is currently
//! using, with the page size set to the entire result count, then
//! formats every row through the column set's export-value chain. One
//! armed click cycle maps to at most one fetch; the exporter re-arms
//! only when the cycle completes or fails.

use crate::columns::ColumnSet;
use crate::error::{QueueError, Result};
use crate::types::{ColumnId, FilterSpec, Row, SortOrder};
use crate::view::QueueView;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Parameters for one unpaginated export fetch. The page size covers the
/// entire result set; there is no page index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub sort: Option<ColumnId>,
    pub order: Option<SortOrder>,
    pub filters: Vec<FilterSpec>,
    pub current_page_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_as_gbloc: Option<String>,
}

/// A formatted export ready for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    /// `{prefix}-{ISO-8601 timestamp}.csv`
    pub filename: String,
    pub content: Vec<u8>,
}

/// Export fetch seam; returns the unwrapped rows of the full result set.
pub trait ExportFetch {
    fn fetch_all(&self, request: &ExportRequest) -> Result<Vec<Row>>;
}

/// CSV exporter for one queue view.
pub struct CsvExporter {
    filename_prefix: String,
    armed: AtomicBool,
}

impl CsvExporter {
    pub fn new(filename_prefix: impl Into<String>) -> Self {
        Self {
            filename_prefix: filename_prefix.into(),
            armed: AtomicBool::new(true),
        }
    }

    /// Whether a new export cycle can begin.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Snapshot the view's current sort and filters into an export
    /// request, disarming until the cycle settles.
    ///
    /// Returns `None` when the view has no results or an export is
    /// already in flight; neither case issues a fetch.
    pub fn begin(&self, view: &QueueView) -> Option<ExportRequest> {
        let total_count = view.total_count();
        if total_count == 0 {
            return None;
        }
        if !self.armed.swap(false, Ordering::SeqCst) {
            return None;
        }

        let query = view.query_state();
        let first = query.sort.first();
        debug!(view = %view.key(), total_count, "export cycle armed");

        Some(ExportRequest {
            sort: first.map(|spec| spec.id.clone()),
            order: first.map(|spec| spec.order()),
            filters: query.filters,
            current_page_size: total_count,
            view_as_gbloc: view.view_as_gbloc().map(str::to_string),
        })
    }

    /// Format the fetched rows for download and re-arm.
    pub fn complete(&self, view: &QueueView, rows: &[Row]) -> Result<ExportFile> {
        let content = write_csv(view.columns(), rows);
        self.armed.store(true, Ordering::SeqCst);
        Ok(ExportFile {
            filename: self.filename(),
            content: content?,
        })
    }

    /// Re-arm after a failed export fetch so the user can retry.
    pub fn fail(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Drive one full export cycle through a fetch seam.
    ///
    /// Returns `Ok(None)` when no cycle could begin. A fetch error
    /// re-arms the exporter and propagates for caller-side reporting.
    pub fn run(&self, view: &QueueView, fetch: &dyn ExportFetch) -> Result<Option<ExportFile>> {
        let Some(request) = self.begin(view) else {
            return Ok(None);
        };
        match fetch.fetch_all(&request) {
            Ok(rows) => self.complete(view, &rows).map(Some),
            Err(e) => {
                self.fail();
                Err(e)
            }
        }
    }

    fn filename(&self) -> String {
        format!(
            "{}-{}.csv",
            self.filename_prefix,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

/// Write rows as CSV: header row from the non-hidden column headers,
/// cells through the export-value chain.
fn write_csv(columns: &ColumnSet, rows: &[Row]) -> Result<Vec<u8>> {
    let exportable: Vec<_> = columns.exportable().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(exportable.iter().map(|column| column.header.as_str()))?;
    for row in rows {
        writer.write_record(exportable.iter().map(|column| column.export_cell(row)))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| QueueError::Serialization(e.to_string()))
}
