// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::profile_store::{InMemoryProfileStore, ProfileStore, RestProfileStore};
use crate::services::upstream::UpstreamClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: RelayConfig,
    pub upstream: UpstreamClient,
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn new(config: RelayConfig, profiles: Arc<dyn ProfileStore>) -> Self {
        Self::with_http(reqwest::Client::new(), config, profiles)
    }

    /// `http` is shared by the upstream client and any store built from it.
    pub fn with_http(http: reqwest::Client, config: RelayConfig, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            upstream: UpstreamClient::new(http, &config),
            config,
            profiles,
        }
    }

    /// Picks the managed data store when it is configured, otherwise every
    /// caller is treated as unauthenticated.
    pub fn from_config(config: RelayConfig) -> Self {
        let http = reqwest::Client::new();
        let profiles: Arc<dyn ProfileStore> =
            match (&config.data_store_url, &config.data_store_key) {
                (Some(url), Some(key)) => {
                    Arc::new(RestProfileStore::new(http.clone(), url, key))
                }
                _ => {
                    tracing::warn!("no data store configured, profile shortcuts are disabled");
                    Arc::new(InMemoryProfileStore::default())
                }
            };
        Self::with_http(http, config, profiles)
    }
}
