//! Server state management

use anyhow::Context;
use dox_core::{InMemoryStore, ManualService, PolicyStore, Settings};
use std::sync::Arc;

/// Everything a request handler needs: the resolved settings and the
/// manual service wired to the policy store.
pub struct ServerState {
    settings: Settings,
    service: ManualService,
}

impl ServerState {
    /// Build state over an existing store.
    #[must_use = "creates server state"]
    pub fn with_store(store: Arc<dyn PolicyStore>, settings: Settings) -> Self {
        let service = ManualService::new(store)
            .with_branding(settings.branding.clone())
            .with_page_size(settings.page_size);
        Self { settings, service }
    }

    /// Build state from settings, loading the seed file when one is configured.
    ///
    /// # Errors
    ///
    /// Fails when the seed file cannot be read or parsed.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store = match &settings.seed_path {
            Some(path) => InMemoryStore::from_seed_file(path)
                .with_context(|| format!("Failed to load seed file {}", path.display()))?,
            None => {
                log::warn!("No seed file configured, starting with an empty policy store");
                InMemoryStore::new()
            }
        };
        Ok(Self::with_store(Arc::new(store), settings))
    }

    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub const fn service(&self) -> &ManualService {
        &self.service
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn PolicyStore {
        self.service.store()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ServerState;
    use dox_core::{DoxConfig, InMemoryStore};
    use std::sync::Arc;

    pub const SEED: &str = include_str!("../../../data/seed.json");

    /// State over the bundled sample repository.
    pub fn seeded_state() -> ServerState {
        let store = InMemoryStore::from_seed_json(SEED).unwrap();
        ServerState::with_store(Arc::new(store), DoxConfig::default().resolve().unwrap())
    }
}
