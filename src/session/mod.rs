//! Session-scoped persistence of per-queue query state.
//!
//! One [`CacheRecord`](crate::types::CacheRecord) persists per view key,
//! all packed into a single blob under one well-known storage key. The
//! storage surface itself is the injected [`SessionStore`] trait so tests
//! and embedders choose their own backing.

mod cache;
mod store;

pub use cache::{QueryCache, STORAGE_KEY};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
