//! Definition cache orchestration.
//!
//! `DefinitionCache` ties the remote endpoints to the persistent store:
//! index sync behind the fingerprint gate, lazy per-device fetch, and the
//! read accessors the host layer consumes.

use crate::client::DefinitionsClient;
use crate::error::DefinitionsResult;
use crate::index::merge_supported_ids;
use keylab_store::{DeviceStore, StoreError, StoreResult};
use keylab_types::{
    CommonMenusMap, DefinitionIndex, DefinitionVersion, DefinitionsMap, Device,
    KeyboardDefinition, Settings, SupportedIdsMap,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Callback invoked when quota recovery wipes the store.
///
/// The wipe itself is silent at the API level (the triggering operation
/// still succeeds); registering a handler lets the host tell the user that
/// previously cached definitions are gone.
pub trait StoreResetHandler: Send + Sync {
    /// Called after the store has been wiped and reseeded with defaults.
    fn on_store_reset(&self);
}

/// Orchestrates index sync and per-device definition fetch over the store.
pub struct DefinitionCache {
    store: Arc<DeviceStore>,
    client: DefinitionsClient,
    /// Serializes whole-index refreshes; a waiting caller re-checks the
    /// fingerprint once the running refresh finishes.
    sync_gate: Mutex<()>,
    /// Serializes read-merge-write updates of the definitions record.
    /// Never held across an await.
    write_gate: std::sync::Mutex<()>,
    reset_handler: Option<Arc<dyn StoreResetHandler>>,
}

impl DefinitionCache {
    /// Creates a cache over the given store and client.
    #[must_use]
    pub fn new(store: Arc<DeviceStore>, client: DefinitionsClient) -> Self {
        Self {
            store,
            client,
            sync_gate: Mutex::new(()),
            write_gate: std::sync::Mutex::new(()),
            reset_handler: None,
        }
    }

    /// Registers a handler notified when quota recovery wipes the store.
    pub fn set_reset_handler(&mut self, handler: Arc<dyn StoreResetHandler>) {
        self.reset_handler = Some(handler);
    }

    // ── Index sync ───────────────────────────────────────────────

    /// Refreshes the definition index if the remote catalog changed.
    ///
    /// Fetches the remote fingerprint and compares it with the cached
    /// index. On a match the cached index is returned without touching the
    /// full catalog. On a change the index document and common menus are
    /// fetched, the rebuilt index is persisted, and the cached definitions
    /// table is cleared wholesale.
    ///
    /// Failures are absorbed: the last-known-good index is returned and
    /// the error is logged. Callers re-invoke `sync()` later (e.g. on the
    /// next app focus).
    pub async fn sync(&self) -> DefinitionsResult<DefinitionIndex> {
        let _flight = self.sync_gate.lock().await;

        let current = self.store.load_definition_index()?;

        match self.refresh(&current).await {
            Ok(index) => Ok(index),
            Err(e) => {
                warn!("Definition index sync failed, serving cached index: {}", e);
                Ok(current)
            }
        }
    }

    async fn refresh(&self, current: &DefinitionIndex) -> DefinitionsResult<DefinitionIndex> {
        let hash = self.client.fetch_hash().await?;
        if hash == current.hash {
            debug!("Definition index unchanged (hash {})", hash);
            return Ok(current.clone());
        }

        let mut document = self.client.fetch_index().await?;
        let menus = self.client.fetch_common_menus().await?;
        self.save_with_recovery(|store| store.save_common_menus(&menus))?;

        // The rebuilt index overlays `hash` and the merged support map onto
        // the document; a remote document carrying either key under its
        // passthrough fields would otherwise serialize the key twice and
        // make the persisted row unreadable.
        document.extra.remove("hash");
        document.extra.remove("supportedVendorProductIdMap");

        let index = DefinitionIndex {
            generated_at: document.generated_at,
            hash,
            version: document.version,
            theme: document.theme,
            supported_vendor_product_id_map: merge_supported_ids(&document.vendor_product_ids),
            extra: document.extra,
        };

        self.save_with_recovery(|store| store.save_definition_index(&index))?;
        self.save_with_recovery(|store| store.save_definitions(&DefinitionsMap::new()))?;

        info!(
            "Definition index refreshed: {} devices (hash {})",
            index.supported_vendor_product_id_map.len(),
            index.hash
        );
        Ok(index)
    }

    // ── Per-device fetch ─────────────────────────────────────────

    /// Fetches and caches the definition for one device and generation.
    ///
    /// The fetched payload is merged into the device's cached record,
    /// preserving an already-cached sibling generation. Network failures
    /// propagate to the caller. A write that exhausts the store's capacity
    /// wipes the store and retries the merge once against the reseeded
    /// defaults.
    pub async fn get_missing_definition(
        &self,
        device: &Device,
        version: DefinitionVersion,
    ) -> DefinitionsResult<(KeyboardDefinition, DefinitionVersion)> {
        let id = device.vendor_product_id();
        let definition = self.client.fetch_definition(version, id).await?;
        debug!("Caching {} definition for {} ({})", version, definition.name, id);

        let _write = self.write_gate.lock().unwrap();
        let mut definitions = self.store.load_definitions()?;
        definitions
            .entry(id)
            .or_default()
            .insert(version, definition.clone());

        match self.store.save_definitions(&definitions) {
            Err(StoreError::CapacityExceeded { .. }) => {
                self.recover_store()?;
                let mut definitions = self.store.load_definitions()?;
                definitions
                    .entry(id)
                    .or_default()
                    .insert(version, definition.clone());
                self.store.save_definitions(&definitions)?;
            }
            result => result?,
        }

        Ok((definition, version))
    }

    // ── Accessors ────────────────────────────────────────────────

    /// Returns the cached common-menus map.
    pub fn get_common_menus(&self) -> DefinitionsResult<CommonMenusMap> {
        Ok(self.store.load_common_menus()?)
    }

    /// Returns the version-support map of the cached index.
    pub fn get_supported_ids(&self) -> DefinitionsResult<SupportedIdsMap> {
        Ok(self
            .store
            .load_definition_index()?
            .supported_vendor_product_id_map)
    }

    /// Returns the cached definitions table.
    pub fn get_definitions(&self) -> DefinitionsResult<DefinitionsMap> {
        Ok(self.store.load_definitions()?)
    }

    /// Returns the theme payload of the cached index.
    pub fn get_theme(&self) -> DefinitionsResult<serde_json::Value> {
        Ok(self.store.load_definition_index()?.theme)
    }

    /// Returns the persisted host settings.
    pub fn get_settings(&self) -> DefinitionsResult<Settings> {
        Ok(self.store.load_settings()?)
    }

    /// Replaces the persisted host settings.
    ///
    /// A direct persist: no merge and no quota recovery. Storage errors
    /// propagate to the caller.
    pub fn set_settings(&self, settings: &Settings) -> DefinitionsResult<()> {
        Ok(self.store.save_settings(settings)?)
    }

    // ── Quota recovery ───────────────────────────────────────────

    /// Runs a store write, recovering once from capacity exhaustion by
    /// wiping the store and retrying the same write.
    fn save_with_recovery<F>(&self, op: F) -> DefinitionsResult<()>
    where
        F: Fn(&DeviceStore) -> StoreResult<()>,
    {
        match op(&self.store) {
            Err(StoreError::CapacityExceeded { .. }) => {
                self.recover_store()?;
                Ok(op(&self.store)?)
            }
            result => Ok(result?),
        }
    }

    fn recover_store(&self) -> DefinitionsResult<()> {
        warn!("Store capacity exhausted, wiping cached records and reseeding defaults");
        self.store.reset()?;
        if let Some(handler) = &self.reset_handler {
            handler.on_store_reset();
        }
        Ok(())
    }
}
