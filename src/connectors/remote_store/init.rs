use super::{MockRemoteStore, RemoteStore, SupabaseClient};
use crate::connectors::config::RemoteStoreConfig;
use crate::connectors::errors::ConnectorError;

/// Initialize the remote store connector from settings.
///
/// With `offline_demo` the services run against a seeded in-memory store that
/// lives for the current process only.
///
/// # Example
/// ```ignore
/// let remote = connectors::remote_store::init(&settings.connectors.remote_store, false)?;
/// let repository = ProductRepository::new(remote.products.clone());
/// ```
pub fn init(config: &RemoteStoreConfig, offline_demo: bool) -> Result<RemoteStore, ConnectorError> {
    if offline_demo {
        tracing::warn!("Remote store disabled - using in-memory demo catalog");
        return Ok(RemoteStore::from_client(MockRemoteStore::demo()));
    }

    if config.url.is_empty() || config.anon_key.is_empty() {
        return Err(ConnectorError::Internal(
            "remote store url and anon key must be configured (SUPABASE_URL / SUPABASE_ANON_KEY)"
                .to_string(),
        ));
    }

    tracing::info!(
        url = %config.url,
        bucket = %config.bucket,
        authenticated = config.access_token.is_some(),
        "Initializing remote store connector"
    );
    Ok(RemoteStore::from_client(SupabaseClient::new(config.clone())?))
}
