//! Connected-device descriptor and capability surface.

use crate::{Result, VendorProductId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A connected keyboard as reported by the host's HID layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Platform path of the HID interface.
    pub path: String,
}

impl Device {
    /// Returns the canonical packed identifier for this device's model.
    #[must_use]
    pub const fn vendor_product_id(&self) -> VendorProductId {
        VendorProductId::from_parts(self.vendor_id, self.product_id)
    }
}

/// Capability surface of a connected device.
///
/// The firmware protocol behind these calls lives in the host layer; this
/// crate only defines the seam so the cache subsystem can hand devices
/// around without knowing how to talk to them.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Sends a value query to the device and awaits the raw response.
    async fn query(&self, value: u8, length: usize) -> Result<Vec<u8>>;

    /// Clears the device's persisted firmware state.
    async fn reset_eeprom(&self) -> Result<()>;

    /// Reboots the device into its bootloader.
    async fn jump_to_bootloader(&self) -> Result<()>;

    /// Clears all macros stored on the device.
    async fn reset_macros(&self) -> Result<()>;
}
