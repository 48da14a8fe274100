//! Cached definition payloads and menu metadata.

use crate::{DefinitionVersion, VendorProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single definition payload (layout geometry, key matrix, metadata).
///
/// The cache stores and serves definitions without interpreting their
/// interior; only the name is lifted out for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    pub name: String,
    /// Payload body, owned by the definition schema, opaque to this layer.
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

/// Definition payloads cached for one device, keyed by schema generation.
///
/// At most one payload per generation; fetching a generation again replaces
/// its payload and leaves the sibling untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionedDefinitions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v2: Option<KeyboardDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v3: Option<KeyboardDefinition>,
}

impl VersionedDefinitions {
    /// Returns the cached payload for a generation, if any.
    #[must_use]
    pub fn get(&self, version: DefinitionVersion) -> Option<&KeyboardDefinition> {
        match version {
            DefinitionVersion::V2 => self.v2.as_ref(),
            DefinitionVersion::V3 => self.v3.as_ref(),
        }
    }

    /// Replaces the payload for a generation, preserving the sibling.
    pub fn insert(&mut self, version: DefinitionVersion, definition: KeyboardDefinition) {
        match version {
            DefinitionVersion::V2 => self.v2 = Some(definition),
            DefinitionVersion::V3 => self.v3 = Some(definition),
        }
    }

    /// Returns true if no generation is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.v2.is_none() && self.v3.is_none()
    }
}

/// The cached definitions table: every device with at least one payload.
pub type DefinitionsMap = HashMap<VendorProductId, VersionedDefinitions>;

/// Shared menu/feature metadata independent of any device, refreshed
/// alongside the definition index.
pub type CommonMenusMap = HashMap<String, serde_json::Value>;
