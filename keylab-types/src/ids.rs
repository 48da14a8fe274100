//! Identifier types for keyboard devices.
//!
//! A keyboard model is identified by its USB vendor and product ids packed
//! into a single 32-bit key. The packed key is what the remote index, the
//! definition URLs, and the persisted store all agree on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Composite identifier for a keyboard model (not a specific unit).
///
/// Packs the 16-bit vendor id into the high half and the 16-bit product id
/// into the low half. Rendered in decimal wherever it appears in URLs and
/// store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorProductId(u32);

impl VendorProductId {
    /// Derives the canonical key from a device's vendor and product ids.
    #[must_use]
    pub const fn from_parts(vendor_id: u16, product_id: u16) -> Self {
        Self(((vendor_id as u32) << 16) | product_id as u32)
    }

    /// Creates an identifier from an already-packed key.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the packed key.
    #[must_use]
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the vendor id half.
    #[must_use]
    pub const fn vendor_id(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Returns the product id half.
    #[must_use]
    pub const fn product_id(&self) -> u16 {
        self.0 as u16
    }

    /// Parses an identifier from its decimal rendering.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Display for VendorProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VendorProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<u32> for VendorProductId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
