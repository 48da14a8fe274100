//! Definition index sync and cache for Keylab.
//!
//! Keeps a local store of keyboard definitions in step with the remote
//! catalog, fetching as little as possible:
//! - the index refresh is gated on a remote fingerprint, so an unchanged
//!   catalog costs one small request
//! - per-device definition payloads are fetched lazily on first use and
//!   cached until the next index refresh invalidates them
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Client**: Typed HTTP access to the definition endpoints
//! - **Index**: Folds the remote per-version id lists into the support map
//! - **Cache**: Orchestrates sync, lazy fetch, and store access
//!
//! ## Refresh Process
//!
//! 1. **Fingerprint**: Fetch the remote hash and compare with the cache
//! 2. **Catalog**: On a change, fetch the full index and common menus
//! 3. **Invalidate**: Persist the new index and clear cached definitions
//! 4. **Serve**: Accessors read the store; misses trigger a lazy fetch
//!
//! Sync failures are absorbed: the last-known-good index keeps serving
//! until a later refresh succeeds. Per-device fetch failures are not
//! absorbed; they surface to the caller.
//!
//! # Example
//!
//! ```
//! use keylab_definitions::{DefinitionCache, DefinitionsClient, DefinitionsConfig};
//! use keylab_store::{DeviceStore, StoreConfig};
//! use std::sync::Arc;
//!
//! let store = Arc::new(DeviceStore::open_in_memory(StoreConfig::default()).unwrap());
//! let client = DefinitionsClient::new(DefinitionsConfig::default());
//! let cache = DefinitionCache::new(store, client);
//! ```

mod cache;
mod client;
mod error;
mod index;

pub use cache::{DefinitionCache, StoreResetHandler};
pub use client::{DefinitionsClient, DefinitionsConfig};
pub use error::{DefinitionsError, DefinitionsResult};
pub use index::merge_supported_ids;
