//! Integration tests for queue views.

use roster::{
    codec, ColumnDescriptor, ColumnSet, CsvExporter, ExportFetch, ExportRequest, FetchPage,
    FetchParams, FilterSpec, MemorySessionStore, QueryCache, QueueView, Result, Row,
    ServerQueryAdapter, SortOrder, SortSpec, ViewConfig, ViewPhase,
};
use serde_json::json;
use std::sync::Arc;

fn queue_columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDescriptor::field("id", "Internal id", "id").hide(),
        ColumnDescriptor::field("lastName", "Customer name", "customer.last_name"),
        ColumnDescriptor::field("branch", "Branch", "customer.agency"),
        ColumnDescriptor::field("status", "Status", "status")
            .with_export_value(|row| row["status"].as_str().unwrap_or("").to_string()),
    ])
    .unwrap()
}

fn shared_cache() -> Arc<QueryCache> {
    Arc::new(QueryCache::new(Arc::new(MemorySessionStore::new())))
}

fn mount(key: &str, cache: &Arc<QueryCache>) -> QueueView {
    QueueView::mount(
        ViewConfig::new(key, queue_columns()),
        cache.clone(),
        Vec::new(),
    )
    .unwrap()
}

/// Simulated queue backend over a fixed move list: filters on the
/// branch column, sorts on any field column, paginates.
struct MovesBackend {
    moves: Vec<Row>,
}

impl MovesBackend {
    fn seeded() -> Self {
        Self {
            moves: vec![
                json!({"id": "m1", "customer": {"last_name": "Aldrin", "agency": "ARMY"}, "status": "SUBMITTED"}),
                json!({"id": "m2", "customer": {"last_name": "Baker", "agency": "NAVY"}, "status": "APPROVED"}),
                json!({"id": "m3", "customer": {"last_name": "Clark", "agency": "ARMY"}, "status": "SUBMITTED"}),
                json!({"id": "m4", "customer": {"last_name": "Duncan", "agency": "AIR_FORCE"}, "status": "APPROVED"}),
                json!({"id": "m5", "customer": {"last_name": "Ellis", "agency": "ARMY"}, "status": "SUBMITTED"}),
            ],
        }
    }

    fn matches(filters: &[FilterSpec], row: &Row) -> bool {
        filters.iter().all(|filter| {
            let field = match filter.id.as_str() {
                "branch" => "agency",
                other => other,
            };
            let actual = row["customer"][field]
                .as_str()
                .or_else(|| row[field].as_str())
                .unwrap_or("");
            codec::values(&filter.value).iter().any(|v| v == actual)
        })
    }

    fn select(&self, sort: Option<(&str, SortOrder)>, filters: &[FilterSpec]) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .moves
            .iter()
            .filter(|row| Self::matches(filters, row))
            .cloned()
            .collect();
        if let Some((column, order)) = sort {
            let key = |row: &Row| -> String {
                match column {
                    "status" => row["status"].as_str().unwrap_or("").to_string(),
                    _ => row["customer"]["last_name"].as_str().unwrap_or("").to_string(),
                }
            };
            rows.sort_by(|a, b| match order {
                SortOrder::Asc => key(a).cmp(&key(b)),
                SortOrder::Desc => key(b).cmp(&key(a)),
            });
        }
        rows
    }
}

impl ServerQueryAdapter for MovesBackend {
    fn fetch(&self, params: &FetchParams) -> Result<FetchPage> {
        let sort = params
            .sort
            .as_ref()
            .zip(params.order)
            .map(|(id, order)| (id.as_str(), order));
        let rows = self.select(sort, &params.filters);
        let total_count = rows.len() as u64;

        let start = ((params.current_page - 1) * params.current_page_size) as usize;
        let end = (start + params.current_page_size as usize).min(rows.len());
        let data = if start < rows.len() {
            rows[start..end].to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchPage {
            data,
            total_count,
            page: params.current_page,
            per_page: params.current_page_size,
        })
    }
}

impl ExportFetch for MovesBackend {
    fn fetch_all(&self, request: &ExportRequest) -> Result<Vec<Row>> {
        let sort = request
            .sort
            .as_ref()
            .zip(request.order)
            .map(|(id, order)| (id.as_str(), order));
        Ok(self.select(sort, &request.filters))
    }
}

// --- Realistic Workflow Tests ---

#[test]
fn test_counseling_queue_session() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    // First fetch: the whole queue.
    assert!(view.run_fetch(&backend));
    assert_eq!(view.phase(), ViewPhase::Loaded);
    assert_eq!(view.total_count(), 5);
    assert_eq!(view.rows().len(), 5);

    // Filter to Army moves.
    view.set_filters(vec![FilterSpec::new("branch", "ARMY")])
        .unwrap();
    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 3);
    assert_eq!(view.pills().pills.len(), 1);

    // Remove the pill; the full queue comes back.
    view.remove_filter(0).unwrap();
    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 5);
}

#[test]
fn test_sort_and_pagination_flow() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    view.set_sort(vec![SortSpec::desc("lastName")]).unwrap();
    view.set_page_size(2).unwrap();
    assert!(view.run_fetch(&backend));

    assert_eq!(view.total_count(), 5);
    assert_eq!(view.page_count(), 3);
    let first_page = view.rows();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0]["customer"]["last_name"], "Ellis");

    view.set_page(3).unwrap();
    assert!(view.run_fetch(&backend));
    let last_page = view.rows();
    assert_eq!(last_page.len(), 1);
    assert_eq!(last_page[0]["customer"]["last_name"], "Aldrin");
}

#[test]
fn test_multi_value_pill_removal_refetches_narrowed_queue() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    view.set_filters(vec![FilterSpec::new("branch", "ARMY,NAVY")])
        .unwrap();
    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 4);

    let pills = view.pills();
    assert_eq!(pills.pills.len(), 2);
    assert!(pills.show_clear_all);
    assert_eq!(pills.pills[0].label, "Army");

    // Click the Army pill away; the string form survives.
    view.remove_filter_value(0, "ARMY").unwrap();
    assert_eq!(
        view.query_state().filters,
        vec![FilterSpec::new("branch", "NAVY")]
    );
    assert!(!view.pills().show_clear_all);

    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 1);
    assert_eq!(view.rows()[0]["customer"]["last_name"], "Baker");
}

#[test]
fn test_refresh_refetches_with_unchanged_parameters() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    assert!(view.run_fetch(&backend));
    assert!(!view.run_fetch(&backend));

    view.refresh();
    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 5);
}

// --- Export Workflows ---

#[test]
fn test_export_covers_all_pages_of_current_filter() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    view.set_filters(vec![FilterSpec::new("branch", "ARMY")])
        .unwrap();
    view.set_page_size(2).unwrap();
    assert!(view.run_fetch(&backend));

    // The view shows one page of two rows; the export must cover all 3.
    assert_eq!(view.rows().len(), 2);
    assert_eq!(view.total_count(), 3);

    let exporter = CsvExporter::new("Services-Counseling-Queue");
    let file = exporter.run(&view, &backend).unwrap().unwrap();

    let text = String::from_utf8(file.content).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Customer name,Branch,Status");
    assert_eq!(lines.len(), 4);
    assert!(text.contains("Aldrin"));
    assert!(text.contains("Ellis"));
    assert!(!text.contains("Baker"));
}

#[test]
fn test_export_disabled_while_queue_is_empty() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();
    let view = mount("counseling", &cache);

    view.set_filters(vec![FilterSpec::new("branch", "SPACE_FORCE")])
        .unwrap();
    assert!(view.run_fetch(&backend));
    assert_eq!(view.total_count(), 0);
    assert!(!view.export_enabled());

    let exporter = CsvExporter::new("moves");
    assert!(exporter.run(&view, &backend).unwrap().is_none());
}

// --- Cross-View Isolation ---

#[test]
fn test_views_persist_independently_in_one_blob() {
    let cache = shared_cache();
    let backend = MovesBackend::seeded();

    let counseling = mount("counseling", &cache);
    let closeout = mount("closeout", &cache);

    counseling
        .set_filters(vec![FilterSpec::new("branch", "ARMY")])
        .unwrap();
    counseling.set_page_size(10).unwrap();
    closeout.set_page(4).unwrap();

    assert!(counseling.run_fetch(&backend));
    assert!(closeout.run_fetch(&backend));

    // Remount both; each restores only its own state.
    let counseling = mount("counseling", &cache);
    let closeout = mount("closeout", &cache);

    assert_eq!(
        counseling.query_state().filters,
        vec![FilterSpec::new("branch", "ARMY")]
    );
    assert_eq!(counseling.query_state().page_size, 10);
    assert!(closeout.query_state().filters.is_empty());
    assert_eq!(closeout.query_state().page, 4);
}
