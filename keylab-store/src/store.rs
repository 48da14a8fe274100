//! SQLite-backed store for the definition cache records.

use crate::error::{StoreError, StoreResult};
use keylab_types::{CommonMenusMap, DefinitionIndex, DefinitionsMap, Settings};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Store format stamp, kept in `PRAGMA user_version`. Bumped when the
/// persisted layout changes; a store stamped with a different version is
/// wiped and reseeded on open instead of being read.
const STORE_FORMAT_VERSION: i32 = 1;

/// Default capacity budget for persisted records, in bytes.
const DEFAULT_CAPACITY_BYTES: u64 = 5 * 1024 * 1024;

const KEY_DEFINITION_INDEX: &str = "definitionIndex";
const KEY_DEFINITIONS: &str = "definitions";
const KEY_SETTINGS: &str = "settings";
const KEY_COMMON_MENUS: &str = "commonMenus";

/// Configuration for the device store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Byte budget for all persisted records together. Writes that would
    /// push the total past this bound fail with
    /// [`StoreError::CapacityExceeded`]. Seeding the default records is
    /// exempt so a store can always be (re)initialized.
    pub capacity_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

/// Persistent key/value store holding the definition cache records.
///
/// Every record lives under a fixed key and is replaced wholesale on write;
/// merging happens in the caller before the write. Reads of missing or
/// unreadable records return the record's default shape.
pub struct DeviceStore {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

impl DeviceStore {
    /// Opens (or creates) a store at the given path.
    pub fn new(path: &str, config: StoreConfig) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory(config: StoreConfig) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS device_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stamp: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if stamp != STORE_FORMAT_VERSION {
            if stamp != 0 {
                warn!(
                    "store format changed ({} -> {}), discarding cached records",
                    stamp, STORE_FORMAT_VERSION
                );
            }
            conn.execute("DELETE FROM device_store", [])?;
            conn.pragma_update(None, "user_version", STORE_FORMAT_VERSION)?;
        }

        Self::seed_defaults(&conn)
    }

    /// Inserts any default record that is not already present.
    fn seed_defaults(conn: &Connection) -> StoreResult<()> {
        for (key, value) in Self::default_records()? {
            conn.execute(
                "INSERT OR IGNORE INTO device_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(())
    }

    fn default_records() -> StoreResult<[(&'static str, String); 4]> {
        Ok([
            (
                KEY_DEFINITION_INDEX,
                serde_json::to_string(&DefinitionIndex::default())?,
            ),
            (
                KEY_DEFINITIONS,
                serde_json::to_string(&DefinitionsMap::default())?,
            ),
            (KEY_SETTINGS, serde_json::to_string(&Settings::default())?),
            (
                KEY_COMMON_MENUS,
                serde_json::to_string(&CommonMenusMap::default())?,
            ),
        ])
    }

    fn load_record<T: DeserializeOwned + Default>(&self, key: &str) -> StoreResult<T> {
        let conn = self.conn.lock().unwrap();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM device_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(record),
                Err(e) => {
                    warn!("discarding unreadable {} record: {}", key, e);
                    Ok(T::default())
                }
            },
            None => Ok(T::default()),
        }
    }

    fn save_record<T: Serialize>(&self, key: &str, record: &T) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        let conn = self.conn.lock().unwrap();
        self.check_capacity(&conn, key, json.len() as u64)?;
        conn.execute(
            "INSERT OR REPLACE INTO device_store (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Rejects a write whose value would push the stored total past the
    /// configured budget. The record being replaced does not count against
    /// the incoming write.
    fn check_capacity(&self, conn: &Connection, key: &str, incoming: u64) -> StoreResult<()> {
        let existing: i64 = conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0)
             FROM device_store WHERE key <> ?1",
            params![key],
            |row| row.get(0),
        )?;
        let available = self.config.capacity_bytes.saturating_sub(existing as u64);
        if incoming > available {
            return Err(StoreError::CapacityExceeded {
                needed: incoming,
                available,
            });
        }
        Ok(())
    }

    // ── Definition index ─────────────────────────────────────────

    /// Loads the cached definition index, or the uninitialized default.
    pub fn load_definition_index(&self) -> StoreResult<DefinitionIndex> {
        self.load_record(KEY_DEFINITION_INDEX)
    }

    /// Replaces the cached definition index.
    pub fn save_definition_index(&self, index: &DefinitionIndex) -> StoreResult<()> {
        self.save_record(KEY_DEFINITION_INDEX, index)
    }

    // ── Definitions ──────────────────────────────────────────────

    /// Loads the cached definitions table.
    pub fn load_definitions(&self) -> StoreResult<DefinitionsMap> {
        self.load_record(KEY_DEFINITIONS)
    }

    /// Replaces the cached definitions table.
    pub fn save_definitions(&self, definitions: &DefinitionsMap) -> StoreResult<()> {
        self.save_record(KEY_DEFINITIONS, definitions)
    }

    // ── Settings ─────────────────────────────────────────────────

    /// Loads the persisted host settings.
    pub fn load_settings(&self) -> StoreResult<Settings> {
        self.load_record(KEY_SETTINGS)
    }

    /// Replaces the persisted host settings.
    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        self.save_record(KEY_SETTINGS, settings)
    }

    // ── Common menus ─────────────────────────────────────────────

    /// Loads the cached common-menus map.
    pub fn load_common_menus(&self) -> StoreResult<CommonMenusMap> {
        self.load_record(KEY_COMMON_MENUS)
    }

    /// Replaces the cached common-menus map.
    pub fn save_common_menus(&self, menus: &CommonMenusMap) -> StoreResult<()> {
        self.save_record(KEY_COMMON_MENUS, menus)
    }

    // ── Reset ────────────────────────────────────────────────────

    /// Wipes every record and reseeds the defaults.
    ///
    /// This is the quota-recovery primitive: callers that hit
    /// [`StoreError::CapacityExceeded`] reset the store and retry their
    /// write once against the reseeded defaults.
    pub fn reset(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM device_store", [])?;
        Self::seed_defaults(&conn)
    }
}
