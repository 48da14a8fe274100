//! Support-map construction from the remote id lists.

use keylab_types::{SupportedIdsMap, VendorProductIdLists};

/// Folds the remote per-version id lists into the support map.
///
/// Every id published for v2 is marked v2 and v3, since a v3 consumer can
/// read any v2 definition. Ids published only for v3 are marked v3 alone.
#[must_use]
pub fn merge_supported_ids(lists: &VendorProductIdLists) -> SupportedIdsMap {
    let mut map = SupportedIdsMap::new();

    for id in &lists.v2 {
        let entry = map.entry(*id).or_default();
        entry.v2 = true;
        entry.v3 = true;
    }

    for id in &lists.v3 {
        map.entry(*id).or_default().v3 = true;
    }

    map
}
