use crate::admin::MAX_IMAGES;
use crate::connectors::{ConnectorConfig, RemoteStoreConfig};
use serde;

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub connectors: ConnectorConfig,
    #[serde(default)]
    pub storefront: StorefrontSettings,
    /// Serve the seeded in-memory catalog instead of the hosted backend.
    #[serde(default)]
    pub offline_demo: bool,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct StorefrontSettings {
    #[serde(default = "StorefrontSettings::default_max_images")]
    pub max_images: usize,
}

impl StorefrontSettings {
    const fn default_max_images() -> usize {
        MAX_IMAGES
    }
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            max_images: Self::default_max_images(),
        }
    }
}

impl Settings {
    pub fn remote_store(&self) -> &RemoteStoreConfig {
        &self.connectors.remote_store
    }
}

impl RemoteStoreConfig {
    /// Fill url and anon key from the plain `SUPABASE_*` variables when the
    /// configuration left them empty.
    pub fn apply_env_fallback(&mut self) {
        if self.url.is_empty() {
            if let Ok(url) = std::env::var("SUPABASE_URL") {
                self.url = url;
            }
        }
        if self.anon_key.is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
                self.anon_key = key;
            }
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // `configuration.yaml` is optional; MOODOO__CONNECTORS__REMOTE_STORE__URL style
    // variables override it.
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("MOODOO")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;
    config.connectors.remote_store.apply_env_fallback();

    Ok(config)
}
