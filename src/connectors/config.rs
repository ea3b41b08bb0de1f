use serde::{Deserialize, Serialize};

/// Configuration for external service connectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub remote_store: RemoteStoreConfig,
}

/// Hosted backend (tables + auth + object storage) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStoreConfig {
    /// Project URL, e.g. https://xyzcompany.supabase.co (from env: SUPABASE_URL)
    #[serde(default)]
    pub url: String,
    /// Public anonymous key sent as `apikey` on every request (from env: SUPABASE_ANON_KEY)
    #[serde(default)]
    pub anon_key: String,
    /// Table holding the catalog rows
    #[serde(default = "RemoteStoreConfig::default_table")]
    pub table: String,
    /// Storage bucket for product images
    #[serde(default = "RemoteStoreConfig::default_bucket")]
    pub bucket: String,
    /// HTTP request timeout in seconds
    #[serde(default = "RemoteStoreConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// `cache-control` max-age sent with uploaded objects
    #[serde(default = "RemoteStoreConfig::default_cache_control")]
    pub cache_control_secs: u64,
    /// Session access token used as bearer instead of the anon key
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl RemoteStoreConfig {
    fn default_table() -> String {
        "products".to_string()
    }

    fn default_bucket() -> String {
        "product-images".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        15
    }

    const fn default_cache_control() -> u64 {
        3600
    }

    /// Same configuration, authenticated with a session token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: Self::default_table(),
            bucket: Self::default_bucket(),
            timeout_secs: Self::default_timeout_secs(),
            cache_control_secs: Self::default_cache_control(),
            access_token: None,
        }
    }
}
