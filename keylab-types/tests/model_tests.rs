use keylab_types::{
    DefinitionIndex, DefinitionIndexDocument, DefinitionVersion, Device, DeviceApi,
    KeyboardDefinition, Settings, SupportedVersions, VendorProductId, VersionedDefinitions,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn definition(name: &str) -> KeyboardDefinition {
    serde_json::from_value(json!({
        "name": name,
        "matrix": { "rows": 5, "cols": 15 },
    }))
    .unwrap()
}

// ── DefinitionIndex ───────────────────────────────────────────────

#[test]
fn default_index_is_uninitialized() {
    let index = DefinitionIndex::default();
    assert_eq!(index.generated_at, -1);
    assert_eq!(index.hash, "");
    assert_eq!(index.version, "2.0.0");
    assert!(index.supported_vendor_product_id_map.is_empty());
    assert!(index.is_uninitialized());
}

#[test]
fn refreshed_index_is_initialized() {
    let index = DefinitionIndex {
        hash: "abc123".to_string(),
        ..Default::default()
    };
    assert!(!index.is_uninitialized());
}

#[test]
fn index_serializes_camel_case() {
    let index = DefinitionIndex::default();
    let value = serde_json::to_value(&index).unwrap();
    assert_eq!(value["generatedAt"], json!(-1));
    assert_eq!(value["supportedVendorProductIdMap"], json!({}));
    assert!(value.get("generated_at").is_none());
}

#[test]
fn index_preserves_unknown_fields() {
    let raw = json!({
        "generatedAt": 1700000000000i64,
        "hash": "deadbeef",
        "version": "2.0.0",
        "theme": { "accent": "#ff0000" },
        "supportedVendorProductIdMap": { "65538": { "v2": true, "v3": true } },
        "favorites": [65538],
    });
    let index: DefinitionIndex = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(index.extra["favorites"], json!([65538]));

    let back = serde_json::to_value(&index).unwrap();
    assert_eq!(back, raw);
}

#[test]
fn index_map_roundtrips_through_json() {
    let mut index = DefinitionIndex::default();
    index.supported_vendor_product_id_map.insert(
        VendorProductId::from_parts(0x1209, 0x0001),
        SupportedVersions { v2: true, v3: true },
    );
    let json = serde_json::to_string(&index).unwrap();
    let back: DefinitionIndex = serde_json::from_str(&json).unwrap();
    assert_eq!(back, index);
}

#[test]
fn index_document_parses_remote_shape() {
    let raw = json!({
        "generatedAt": 1700000000000i64,
        "version": "2.0.0",
        "theme": { "accent": "#00ff00" },
        "vendorProductIds": {
            "v2": [65538, 65539],
            "v3": [65539],
        },
    });
    let doc: DefinitionIndexDocument = serde_json::from_value(raw).unwrap();
    assert_eq!(doc.generated_at, 1_700_000_000_000);
    assert_eq!(doc.vendor_product_ids.v2.len(), 2);
    assert_eq!(doc.vendor_product_ids.v3.len(), 1);
    assert!(doc.extra.is_empty());
}

#[test]
fn index_document_tolerates_missing_theme_and_list() {
    let raw = json!({
        "generatedAt": 0,
        "version": "2.0.0",
        "vendorProductIds": { "v2": [65538] },
    });
    let doc: DefinitionIndexDocument = serde_json::from_value(raw).unwrap();
    assert_eq!(doc.theme, serde_json::Value::Null);
    assert!(doc.vendor_product_ids.v3.is_empty());
}

// ── VersionedDefinitions ──────────────────────────────────────────

#[test]
fn versioned_definitions_starts_empty() {
    let defs = VersionedDefinitions::default();
    assert!(defs.is_empty());
    assert!(defs.get(DefinitionVersion::V2).is_none());
    assert!(defs.get(DefinitionVersion::V3).is_none());
}

#[test]
fn insert_fills_only_the_requested_generation() {
    let mut defs = VersionedDefinitions::default();
    defs.insert(DefinitionVersion::V3, definition("Iris"));

    assert!(!defs.is_empty());
    assert!(defs.get(DefinitionVersion::V2).is_none());
    assert_eq!(defs.get(DefinitionVersion::V3).unwrap().name, "Iris");
}

#[test]
fn insert_preserves_the_sibling_generation() {
    let mut defs = VersionedDefinitions::default();
    defs.insert(DefinitionVersion::V2, definition("Iris v2"));
    defs.insert(DefinitionVersion::V3, definition("Iris v3"));

    assert_eq!(defs.get(DefinitionVersion::V2).unwrap().name, "Iris v2");
    assert_eq!(defs.get(DefinitionVersion::V3).unwrap().name, "Iris v3");
}

#[test]
fn insert_replaces_the_same_generation() {
    let mut defs = VersionedDefinitions::default();
    defs.insert(DefinitionVersion::V2, definition("old"));
    defs.insert(DefinitionVersion::V2, definition("new"));
    assert_eq!(defs.get(DefinitionVersion::V2).unwrap().name, "new");
}

#[test]
fn absent_generations_are_omitted_from_json() {
    let mut defs = VersionedDefinitions::default();
    defs.insert(DefinitionVersion::V3, definition("Iris"));

    let value = serde_json::to_value(&defs).unwrap();
    assert!(value.get("v2").is_none());
    assert_eq!(value["v3"]["name"], json!("Iris"));
}

#[test]
fn definition_body_roundtrips_unchanged() {
    let def = definition("Iris");
    let json = serde_json::to_string(&def).unwrap();
    let back: KeyboardDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, def);
    assert_eq!(back.body["matrix"]["rows"], json!(5));
}

// ── Settings ──────────────────────────────────────────────────────

#[test]
fn settings_default_all_flags_off() {
    let settings = Settings::default();
    assert!(!settings.allow_keyboard_key_remapping);
    assert!(!settings.show_design_tab);
    assert!(!settings.disable_fast_remap);
    assert!(!settings.disable_hardware_acceleration);
}

#[test]
fn settings_wire_shape_is_camel_case() {
    let settings = Settings {
        show_design_tab: true,
        ..Default::default()
    };
    let value = serde_json::to_value(settings).unwrap();
    assert_eq!(value["showDesignTab"], json!(true));
    assert_eq!(value["allowKeyboardKeyRemapping"], json!(false));
}

#[test]
fn settings_tolerates_partial_documents() {
    let settings: Settings = serde_json::from_str(r#"{"disableFastRemap":true}"#).unwrap();
    assert!(settings.disable_fast_remap);
    assert!(!settings.show_design_tab);
}

// ── Device ────────────────────────────────────────────────────────

#[test]
fn device_packs_its_vendor_product_id() {
    let device = Device {
        vendor_id: 0x1209,
        product_id: 0x0001,
        path: "/dev/hidraw3".to_string(),
    };
    assert_eq!(
        device.vendor_product_id(),
        VendorProductId::from_parts(0x1209, 0x0001)
    );
}

#[test]
fn device_serializes_camel_case() {
    let device = Device {
        vendor_id: 1,
        product_id: 2,
        path: "path".to_string(),
    };
    let value = serde_json::to_value(&device).unwrap();
    assert_eq!(value["vendorId"], json!(1));
    assert_eq!(value["productId"], json!(2));
}

// ── DeviceApi ─────────────────────────────────────────────────────

struct EchoDevice;

#[async_trait::async_trait]
impl DeviceApi for EchoDevice {
    async fn query(&self, value: u8, length: usize) -> keylab_types::Result<Vec<u8>> {
        Ok(vec![value; length])
    }

    async fn reset_eeprom(&self) -> keylab_types::Result<()> {
        Ok(())
    }

    async fn jump_to_bootloader(&self) -> keylab_types::Result<()> {
        Ok(())
    }

    async fn reset_macros(&self) -> keylab_types::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn device_api_is_object_safe() {
    let device: Box<dyn DeviceApi> = Box::new(EchoDevice);
    let response = device.query(0x0f, 4).await.unwrap();
    assert_eq!(response, vec![0x0f; 4]);
    device.reset_eeprom().await.unwrap();
}
