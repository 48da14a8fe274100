//! Core type definitions for Keylab.
//!
//! This crate defines the fundamental, GUI-agnostic types shared by the
//! store and cache layers:
//! - Vendor/product identifiers (16-bit USB ids packed into one key)
//! - Definition schema versions (v2/v3) and cached definition records
//! - The definition index and its version-support map
//! - Host settings and the connected-device capability surface
//!
//! Presentation types (rendered layouts, key geometry, widget state) belong
//! to the host application, not here.

mod definitions;
mod device;
mod ids;
mod index;
mod settings;
mod version;

pub use definitions::{CommonMenusMap, DefinitionsMap, KeyboardDefinition, VersionedDefinitions};
pub use device::{Device, DeviceApi};
pub use ids::VendorProductId;
pub use index::{
    DefinitionIndex, DefinitionIndexDocument, SupportedIdsMap, SupportedVersions,
    VendorProductIdLists,
};
pub use settings::Settings;
pub use version::DefinitionVersion;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid definition version: {0}")]
    InvalidVersion(String),

    #[error("device error: {0}")]
    Device(String),
}
