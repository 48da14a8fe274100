//! HTTP client for the remote definition endpoints.
//!
//! All endpoints are read-only JSON under a single base URL:
//! the index fingerprint, the index document, the common-menus map, and
//! the per-device definition payloads.

use crate::error::{DefinitionsError, DefinitionsResult};
use keylab_types::{
    CommonMenusMap, DefinitionIndexDocument, DefinitionVersion, KeyboardDefinition,
    VendorProductId,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the definitions client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    /// Base URL for the definition endpoints (e.g. `https://usevia.app`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://usevia.app".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Client for the remote definition endpoints.
#[derive(Debug, Clone)]
pub struct DefinitionsClient {
    config: DefinitionsConfig,
    client: Client,
}

impl DefinitionsClient {
    /// Creates a new client for the configured endpoints.
    #[must_use]
    pub fn new(config: DefinitionsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    /// Fetches the current catalog fingerprint.
    pub async fn fetch_hash(&self) -> DefinitionsResult<String> {
        let url = format!("{}/definitions/hash.json", self.config.base_url);
        debug!("Fetching definition hash: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DefinitionsError::Network(format!("hash fetch failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(DefinitionsError::Network(format!(
                "hash fetch failed: {error}"
            )));
        }

        response
            .json::<String>()
            .await
            .map_err(|e| DefinitionsError::Network(format!("failed to parse hash: {e}")))
    }

    /// Fetches the full index document.
    ///
    /// Sends no-cache headers so intermediaries cannot serve a catalog
    /// older than the fingerprint that triggered the fetch.
    pub async fn fetch_index(&self) -> DefinitionsResult<DefinitionIndexDocument> {
        let url = format!("{}/definitions/supported_kbs.json", self.config.base_url);
        debug!("Fetching definition index: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(|e| DefinitionsError::Network(format!("index fetch failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(DefinitionsError::Network(format!(
                "index fetch failed: {error}"
            )));
        }

        response
            .json::<DefinitionIndexDocument>()
            .await
            .map_err(|e| DefinitionsError::Network(format!("failed to parse index: {e}")))
    }

    /// Fetches the common-menus map shared by all devices.
    pub async fn fetch_common_menus(&self) -> DefinitionsResult<CommonMenusMap> {
        let url = format!("{}/definitions/common-menus.json", self.config.base_url);
        debug!("Fetching common menus: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DefinitionsError::Network(format!("common-menus fetch failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(DefinitionsError::Network(format!(
                "common-menus fetch failed: {error}"
            )));
        }

        response
            .json::<CommonMenusMap>()
            .await
            .map_err(|e| DefinitionsError::Network(format!("failed to parse common menus: {e}")))
    }

    /// Fetches one device's definition payload for a schema generation.
    pub async fn fetch_definition(
        &self,
        version: DefinitionVersion,
        id: VendorProductId,
    ) -> DefinitionsResult<KeyboardDefinition> {
        let url = format!(
            "{}/definitions/{}/{}.json",
            self.config.base_url, version, id
        );
        debug!("Fetching definition: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DefinitionsError::Network(format!("definition fetch failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(DefinitionsError::Network(format!(
                "definition fetch failed for {id} {version}: {error}"
            )));
        }

        response
            .json::<KeyboardDefinition>()
            .await
            .map_err(|e| DefinitionsError::Network(format!("failed to parse definition: {e}")))
    }
}
