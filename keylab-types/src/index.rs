//! The definition index: the cached universe of supported devices.

use crate::VendorProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which definition schema generations are published for a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedVersions {
    #[serde(default)]
    pub v2: bool,
    #[serde(default)]
    pub v3: bool,
}

/// Map from vendor/product id to the schema generations it supports.
pub type SupportedIdsMap = HashMap<VendorProductId, SupportedVersions>;

/// Descriptor of the current known universe of supported devices.
///
/// Replaced wholesale whenever the remote catalog fingerprint changes;
/// otherwise served unchanged from the store. The default value is the
/// uninitialized sentinel (`generated_at = -1`, empty hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionIndex {
    /// Monotonic generation marker from the remote catalog, -1 until the
    /// first successful refresh.
    pub generated_at: i64,
    /// Fingerprint of the remote catalog, empty until the first refresh.
    pub hash: String,
    /// Schema version of the index document itself.
    pub version: String,
    /// Opaque display theme payload, passed through to the host.
    pub theme: serde_json::Value,
    /// Per-device version support, merged from the remote id lists.
    pub supported_vendor_product_id_map: SupportedIdsMap,
    /// Remote index fields this layer does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for DefinitionIndex {
    fn default() -> Self {
        Self {
            generated_at: -1,
            hash: String::new(),
            version: "2.0.0".to_string(),
            theme: serde_json::Value::Object(serde_json::Map::new()),
            supported_vendor_product_id_map: SupportedIdsMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl DefinitionIndex {
    /// Returns true if the index has never been refreshed from the remote.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        self.hash.is_empty()
    }
}

/// The id lists of the remote index document, one per schema generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorProductIdLists {
    #[serde(default)]
    pub v2: Vec<VendorProductId>,
    #[serde(default)]
    pub v3: Vec<VendorProductId>,
}

/// The remote index document as served by `supported_kbs.json`.
///
/// Carries the raw per-version id lists; the cache layer folds them into a
/// [`SupportedIdsMap`] and stores the result as a [`DefinitionIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionIndexDocument {
    pub generated_at: i64,
    pub version: String,
    #[serde(default)]
    pub theme: serde_json::Value,
    pub vendor_product_ids: VendorProductIdLists,
    /// Index fields this layer passes through without interpreting.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
