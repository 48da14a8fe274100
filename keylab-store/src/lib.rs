//! Persistent device store for Keylab.
//!
//! A SQLite-backed key/value store holding the four cache records: the
//! definition index, the cached definitions table, host settings, and the
//! common-menus map. The store owns the on-disk representation; callers
//! only ever hold copies.
//!
//! Capacity is bounded by a configured byte budget. Writes that would
//! exceed it fail with [`StoreError::CapacityExceeded`]; the cache layer
//! recovers by wiping the store and retrying once. Format changes are
//! detected on open and discard records written by an incompatible layout.

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{DeviceStore, StoreConfig};
