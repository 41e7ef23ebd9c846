//! # Queue View Controller
//!
//! Session-persistent sort/filter/pagination state for office
//! move-management queues.
//!
//! ## Core Concepts
//!
//! - **QueueView**: the live query state of one mounted queue, seeded
//!   from the session cache and written back on every change
//! - **QueryCache**: one durable record per view key, packed into a
//!   single blob over an injected session store
//! - **Columns**: declarative descriptors with capability flags and
//!   pure cell/export functions
//! - **Pills**: removable filter-value affordances derived from the
//!   live filter list
//! - **Export**: the same logical query reissued unpaginated and
//!   formatted as CSV
//!
//! ## Example
//!
//! ```ignore
//! use roster::{
//!     ColumnDescriptor, ColumnSet, MemorySessionStore, QueryCache, QueueView, ViewConfig,
//! };
//! use std::sync::Arc;
//!
//! let columns = ColumnSet::new(vec![
//!     ColumnDescriptor::field("lastName", "Customer name", "customer.last_name"),
//!     ColumnDescriptor::field("status", "Status", "status"),
//! ])?;
//!
//! let cache = Arc::new(QueryCache::new(Arc::new(MemorySessionStore::new())));
//! let view = QueueView::mount(ViewConfig::new("counseling", columns), cache, Vec::new())?;
//!
//! // Arm a fetch, perform it, apply the page.
//! if let Some(request) = view.next_request() {
//!     let page = my_adapter.fetch(&request.params)?;
//!     view.complete_fetch(request.generation, page);
//! }
//! ```

pub mod codec;
pub mod columns;
pub mod error;
pub mod export;
pub mod pills;
pub mod session;
pub mod types;
pub mod view;

// Re-exports
pub use columns::{Accessor, CellFn, ColumnDescriptor, ColumnSet, FilterWidget, SelectOption};
pub use error::{QueueError, Result};
pub use export::{CsvExporter, ExportFetch, ExportFile, ExportRequest};
pub use pills::{FilterPill, PillSet};
pub use session::{FileSessionStore, MemorySessionStore, QueryCache, SessionStore, STORAGE_KEY};
pub use types::*;
pub use view::{
    FetchRequest, QueueView, ServerQueryAdapter, ViewConfig, ViewPhase, NO_RESULTS,
    SOMETHING_WENT_WRONG,
};
