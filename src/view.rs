//! The stateful queue view controller.
//!
//! A [`QueueView`] owns the live query state of one mounted queue,
//! reconciles it with the session cache exactly once at mount, derives
//! fetch parameters, and drives the fetch lifecycle. The caller owns the
//! async boundary: it pumps [`QueueView::next_request`], performs the
//! fetch, and reports back through [`QueueView::complete_fetch`] or
//! [`QueueView::fail_fetch`]. Each armed fetch carries a generation;
//! a response whose generation has been superseded is discarded.

use crate::codec;
use crate::columns::ColumnSet;
use crate::error::{QueueError, Result};
use crate::pills::{self, PillSet};
use crate::session::QueryCache;
use crate::types::{
    ColumnId, FetchPage, FetchParams, FilterSpec, FilterValue, QueryState, Row, SortSpec, ViewKey,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Placeholder text rendered for the failed phase.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Placeholder text rendered for an empty result set.
pub const NO_RESULTS: &str = "No results found";

/// Configuration for mounting one queue view.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Identifies the queue's persisted record in the session cache.
    pub key: ViewKey,

    /// Column descriptors, consumed read-only.
    pub columns: ColumnSet,

    /// Sort applied when the cache holds none.
    pub default_sort: Vec<SortSpec>,

    /// 1-based page applied when the cache holds none.
    pub default_page: u64,

    /// Page size applied when the cache holds none.
    pub default_page_size: u64,

    /// Opaque scope forwarded on every fetch and export.
    pub view_as_gbloc: Option<String>,
}

impl ViewConfig {
    pub fn new(key: impl Into<ViewKey>, columns: ColumnSet) -> Self {
        Self {
            key: key.into(),
            columns,
            default_sort: Vec::new(),
            default_page: DEFAULT_PAGE,
            default_page_size: DEFAULT_PAGE_SIZE,
            view_as_gbloc: None,
        }
    }
}

/// Rendering phase of a mounted view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
    /// Mounted; a fetch is wanted but not yet armed.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Rows are current.
    Loaded,
    /// The last fetch failed. The view renders [`SOMETHING_WENT_WRONG`]
    /// and arms no further fetch until [`QueueView::refresh`].
    Failed,
}

/// Parameters for one armed fetch, tagged with its generation.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub generation: u64,
    pub params: FetchParams,
}

/// Server fetch seam.
///
/// `total_count` in the returned page must reflect the unpaginated match
/// count for the given filters.
pub trait ServerQueryAdapter {
    fn fetch(&self, params: &FetchParams) -> Result<FetchPage>;
}

struct ViewState {
    query: QueryState,
    phase: ViewPhase,
    /// Whether the query changed since the last armed fetch.
    dirty: bool,
    /// Generation of the newest armed fetch.
    generation: u64,
    rows: Vec<Row>,
    total_count: u64,
    page_count: u64,
}

/// The live query state of one mounted queue.
///
/// All methods take `&self`; state lives behind a lock so a view can be
/// shared behind `Arc` between the rendering layer and the fetch driver.
pub struct QueueView {
    config: ViewConfig,
    cache: Arc<QueryCache>,
    state: Mutex<ViewState>,
}

impl QueueView {
    /// Mount a view.
    ///
    /// Establishes the cache record (writing the default record on a
    /// first visit), seeds sort/page/page size from it with config
    /// fallbacks, and runs the one-time filter merge: a non-empty
    /// `initial_filters` list wins over the cached filters, an empty one
    /// restores them. The merge runs only here, strictly before any
    /// fetch can be armed; afterwards the live list is the sole source
    /// of truth and every change writes through to the cache.
    pub fn mount(
        config: ViewConfig,
        cache: Arc<QueryCache>,
        initial_filters: Vec<FilterSpec>,
    ) -> Result<Self> {
        if config.default_page_size == 0 {
            return Err(QueueError::InvalidPageSize(0));
        }

        let record = cache.get(&config.key)?;

        let sort = record
            .sort_param
            .clone()
            .unwrap_or_else(|| config.default_sort.clone());
        let page = record.page.unwrap_or(config.default_page);
        let page_size = record.page_size.unwrap_or(config.default_page_size);
        if page_size == 0 {
            return Err(QueueError::InvalidPageSize(0));
        }

        let filters = if initial_filters.is_empty() {
            record.filters
        } else {
            // The caller-initialized live list wins; write it through so
            // the cache reflects the list actually in use.
            if initial_filters != record.filters {
                cache.set_filters(&config.key, initial_filters.clone())?;
            }
            initial_filters
        };

        debug!(
            view = %config.key,
            filters = filters.len(),
            page,
            page_size,
            "mounted queue view"
        );

        Ok(Self {
            config,
            cache,
            state: Mutex::new(ViewState {
                query: QueryState {
                    filters,
                    sort,
                    page,
                    page_size,
                },
                phase: ViewPhase::Idle,
                dirty: true,
                generation: 0,
                rows: Vec::new(),
                total_count: 0,
                page_count: 0,
            }),
        })
    }

    // --- Query Mutations ---

    /// Replace the live filter list and persist it.
    pub fn set_filters(&self, filters: Vec<FilterSpec>) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.query.filters = filters.clone();
            state.dirty = true;
        }
        self.cache.set_filters(&self.config.key, filters)
    }

    /// Replace the sort and persist it.
    pub fn set_sort(&self, sort: Vec<SortSpec>) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.query.sort = sort.clone();
            state.dirty = true;
        }
        self.cache.set_sort_param(&self.config.key, sort)
    }

    /// Move to a 1-based page and persist it.
    pub fn set_page(&self, page: u64) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.query.page = page;
            state.dirty = true;
        }
        self.cache.set_page(&self.config.key, page)
    }

    /// Change the page size and persist it.
    pub fn set_page_size(&self, page_size: u64) -> Result<()> {
        if page_size == 0 {
            return Err(QueueError::InvalidPageSize(0));
        }
        {
            let mut state = self.state.lock();
            state.query.page_size = page_size;
            state.dirty = true;
        }
        self.cache.set_page_size(&self.config.key, page_size)
    }

    // --- Pill Operations ---

    /// Delete the filter entry at `index`.
    pub fn remove_filter(&self, index: usize) -> Result<()> {
        let filters = {
            let state = self.state.lock();
            if index >= state.query.filters.len() {
                return Err(QueueError::FilterIndex(index));
            }
            let mut filters = state.query.filters.clone();
            filters.remove(index);
            filters
        };
        self.set_filters(filters)
    }

    /// Remove one value from the filter entry at `index`, preserving its
    /// representation. Removing the sole value deletes the whole entry.
    pub fn remove_filter_value(&self, index: usize, value: &str) -> Result<()> {
        let filters = {
            let state = self.state.lock();
            let entry = state
                .query
                .filters
                .get(index)
                .ok_or(QueueError::FilterIndex(index))?;

            let mut filters = state.query.filters.clone();
            match codec::remove_value(&entry.value, value) {
                Some(remaining) => filters[index].value = remaining,
                None => {
                    filters.remove(index);
                }
            }
            filters
        };
        self.set_filters(filters)
    }

    /// Clear the live filter list. Only acts while the aggregate pill is
    /// visible (more than one value active in total); returns whether it
    /// cleared.
    pub fn remove_all_filters(&self) -> Result<bool> {
        let visible = {
            let state = self.state.lock();
            pills::total_value_count(&state.query.filters) > 1
        };
        if !visible {
            return Ok(false);
        }
        self.set_filters(Vec::new())?;
        Ok(true)
    }

    // --- Fetch Lifecycle ---

    /// Arm the next fetch, if one is due.
    ///
    /// Returns `None` while a fetch is in flight, after a failure (until
    /// [`refresh`](Self::refresh)), or when nothing changed since the
    /// last armed fetch.
    pub fn next_request(&self) -> Option<FetchRequest> {
        let mut state = self.state.lock();
        if !state.dirty || state.phase == ViewPhase::Loading || state.phase == ViewPhase::Failed {
            return None;
        }

        state.dirty = false;
        state.phase = ViewPhase::Loading;
        state.generation += 1;

        let first = state.query.sort.first();
        Some(FetchRequest {
            generation: state.generation,
            params: FetchParams {
                sort: first.map(|spec| spec.id.clone()),
                order: first.map(|spec| spec.order()),
                filters: state.query.filters.clone(),
                current_page: state.query.page,
                current_page_size: state.query.page_size,
                view_as_gbloc: self.config.view_as_gbloc.clone(),
            },
        })
    }

    /// Apply a fetched page.
    ///
    /// A response whose generation is no longer current is discarded
    /// without touching state.
    pub fn complete_fetch(&self, generation: u64, page: FetchPage) {
        let mut state = self.state.lock();
        if generation != state.generation {
            debug!(
                view = %self.config.key,
                generation,
                current = state.generation,
                "discarding stale fetch response"
            );
            return;
        }

        state.total_count = page.total_count;
        state.page_count = (page.total_count + state.query.page_size - 1) / state.query.page_size;
        state.rows = page.data;
        state.phase = ViewPhase::Loaded;
    }

    /// Record a fetch failure. A stale failure is discarded like a stale
    /// response.
    pub fn fail_fetch(&self, generation: u64) {
        let mut state = self.state.lock();
        if generation != state.generation {
            debug!(
                view = %self.config.key,
                generation,
                current = state.generation,
                "discarding stale fetch failure"
            );
            return;
        }
        state.phase = ViewPhase::Failed;
    }

    /// Drive one full fetch cycle through an adapter.
    ///
    /// Returns whether a fetch was issued. An adapter error is consumed
    /// into the failed phase, never propagated.
    pub fn run_fetch(&self, adapter: &dyn ServerQueryAdapter) -> bool {
        let Some(request) = self.next_request() else {
            return false;
        };
        match adapter.fetch(&request.params) {
            Ok(page) => self.complete_fetch(request.generation, page),
            Err(e) => {
                warn!(view = %self.config.key, error = %e, "queue fetch failed");
                self.fail_fetch(request.generation);
            }
        }
        true
    }

    /// User-driven re-arm: clears a failed phase and marks the view
    /// dirty so the next [`next_request`](Self::next_request) refetches
    /// with unchanged parameters. Any fetch still in flight becomes
    /// stale.
    pub fn refresh(&self) {
        let mut state = self.state.lock();
        state.phase = ViewPhase::Idle;
        state.dirty = true;
    }

    // --- Derived State ---

    pub fn key(&self) -> &ViewKey {
        &self.config.key
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.config.columns
    }

    pub fn view_as_gbloc(&self) -> Option<&str> {
        self.config.view_as_gbloc.as_deref()
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.lock().phase
    }

    /// Snapshot of the live query state.
    pub fn query_state(&self) -> QueryState {
        self.state.lock().query.clone()
    }

    /// Rows of the current page.
    pub fn rows(&self) -> Vec<Row> {
        self.state.lock().rows.clone()
    }

    /// Unpaginated match count from the last applied fetch.
    pub fn total_count(&self) -> u64 {
        self.state.lock().total_count
    }

    pub fn page_count(&self) -> u64 {
        self.state.lock().page_count
    }

    /// The live filter value for one column, for filter controls.
    pub fn filter_value(&self, id: &ColumnId) -> Option<FilterValue> {
        let state = self.state.lock();
        state
            .query
            .filters
            .iter()
            .find(|filter| &filter.id == id)
            .map(|filter| filter.value.clone())
    }

    /// Derive the filter pills for the current live filter list.
    pub fn pills(&self) -> PillSet {
        let state = self.state.lock();
        pills::derive_pills(&state.query.filters, &self.config.columns)
    }

    /// Whether export is available (disabled on an empty result set).
    pub fn export_enabled(&self) -> bool {
        self.state.lock().total_count > 0
    }

    /// Coarse status text for the rendering layer, when one applies.
    pub fn status_text(&self) -> Option<&'static str> {
        let state = self.state.lock();
        match state.phase {
            ViewPhase::Failed => Some(SOMETHING_WENT_WRONG),
            ViewPhase::Loaded if state.total_count == 0 => Some(NO_RESULTS),
            _ => None,
        }
    }
}
