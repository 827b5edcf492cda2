//! # Dashboard Store
//!
//! Persists the per-repository category assignment and the dashboard theme
//! preference behind an injected key-value interface.

pub mod category_store;
pub mod error;
pub mod keys;
pub mod kv;
pub mod theme;

// Re-exports
pub use category_store::CategoryStore;
pub use error::{Result, StoreError};
pub use keys::StorageKey;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use theme::{ThemeMode, ThemeStore};
