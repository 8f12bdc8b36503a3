//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, user config
//! (`~/.dox.toml`), project config (`./.dox.toml`), an explicitly named
//! config file, then `DOX_*` environment variables.
//!
//! Example `.dox.toml`:
//!
//! ```toml
//! [server]
//! name = "DoX Policy Management"
//!
//! [store]
//! seed_path = "data/seed.json"
//!
//! [manual]
//! organization = "Big 12 Conference"
//! manual_kind = "Administrative Manual"
//! page_size = "letter"
//! ```

use crate::error::{DoxError, Result};
use crate::render::{Branding, PageSize};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory.
pub const CONFIG_FILE_NAME: &str = ".dox.toml";

pub const DEFAULT_SERVER_NAME: &str = "DoX Policy Management";

pub const ENV_SERVER_NAME: &str = "DOX_SERVER_NAME";
pub const ENV_SERVER_VERSION: &str = "DOX_SERVER_VERSION";
pub const ENV_SEED_PATH: &str = "DOX_SEED_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoxConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<ManualConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in the initialize handshake
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version reported in the initialize handshake
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON seed with sports, policies and manuals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// First cover subtitle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Second cover subtitle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_name: String,
    pub server_version: String,
    pub seed_path: Option<PathBuf>,
    pub branding: Branding,
    pub page_size: PageSize,
}

fn overlay<T>(base: Option<T>, top: Option<T>) -> Option<T> {
    top.or(base)
}

impl DoxConfig {
    /// # Errors
    ///
    /// Returns [`DoxError::Toml`](crate::DoxError::Toml) on invalid TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns [`DoxError::Io`](crate::DoxError::Io) if the file cannot be
    /// read and [`DoxError::Toml`](crate::DoxError::Toml) if it does not parse.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a discovered config file, logging and skipping it when broken.
    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring config {}: {e}", path.display());
                None
            }
        }
    }

    /// Merge user, project and explicit config files.
    ///
    /// # Errors
    ///
    /// Fails only when the explicitly named file cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let user = dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .and_then(|path| Self::load_optional(&path));
        let project = Self::load_optional(Path::new(CONFIG_FILE_NAME));

        let mut merged = Self::default();
        for layer in [user, project].into_iter().flatten() {
            merged = merged.merge(layer);
        }
        if let Some(path) = explicit {
            merged = merged.merge(Self::load_from_file(path)?);
        }
        Ok(merged)
    }

    /// Field-wise merge; values set in `top` win.
    #[must_use]
    pub fn merge(self, top: Self) -> Self {
        let server = match (self.server, top.server) {
            (Some(base), Some(top)) => Some(ServerConfig {
                name: overlay(base.name, top.name),
                version: overlay(base.version, top.version),
            }),
            (base, top) => top.or(base),
        };
        let store = match (self.store, top.store) {
            (Some(base), Some(top)) => Some(StoreConfig {
                seed_path: overlay(base.seed_path, top.seed_path),
            }),
            (base, top) => top.or(base),
        };
        let manual = match (self.manual, top.manual) {
            (Some(base), Some(top)) => Some(ManualConfig {
                organization: overlay(base.organization, top.organization),
                manual_kind: overlay(base.manual_kind, top.manual_kind),
                page_size: overlay(base.page_size, top.page_size),
            }),
            (base, top) => top.or(base),
        };
        Self {
            server,
            store,
            manual,
        }
    }

    /// Apply `DOX_*` overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `DOX_*` overrides from `lookup`.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = lookup(ENV_SERVER_NAME) {
            self.server.get_or_insert_with(ServerConfig::default).name = Some(name);
        }
        if let Some(version) = lookup(ENV_SERVER_VERSION) {
            self.server.get_or_insert_with(ServerConfig::default).version = Some(version);
        }
        if let Some(seed) = lookup(ENV_SEED_PATH) {
            self.store.get_or_insert_with(StoreConfig::default).seed_path =
                Some(PathBuf::from(seed));
        }
        self
    }

    /// Fill every unset value with its default.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::Config`] when a merged value is blank.
    pub fn resolve(&self) -> Result<Settings> {
        let server = self.server.clone().unwrap_or_default();
        let store = self.store.clone().unwrap_or_default();
        let manual = self.manual.clone().unwrap_or_default();
        let defaults = Branding::default();

        let settings = Settings {
            server_name: server
                .name
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            server_version: server
                .version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            seed_path: store.seed_path,
            branding: Branding {
                organization: manual.organization.unwrap_or(defaults.organization),
                manual_kind: manual.manual_kind.unwrap_or(defaults.manual_kind),
            },
            page_size: manual.page_size.unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("server.name", &self.server_name),
            ("server.version", &self.server_version),
            ("manual.organization", &self.branding.organization),
            ("manual.manual_kind", &self.branding.manual_kind),
        ] {
            if value.trim().is_empty() {
                return Err(DoxError::Config(format!("{key} must not be blank")));
            }
        }
        if self
            .seed_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(DoxError::Config("store.seed_path must not be empty".to_string()));
        }
        Ok(())
    }
}
