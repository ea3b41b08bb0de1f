use crate::admin::AdminPanel;
use crate::cli::error::CliError;
use crate::configuration::{get_configuration, Settings};
use crate::connectors::{init_remote_store, RemoteStore};
use crate::services::{AdminAuth, AdminSession, ImageStore, ProductRepository};

/// Current-thread runtime each command blocks on.
pub fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::ConfigValidation(format!("Failed to create async runtime: {}", e)))
}

/// Settings plus the remote store handles a command works with.
pub struct AppContext {
    pub settings: Settings,
    pub remote: RemoteStore,
}

impl AppContext {
    /// Anonymous access: catalog reads and sign-in.
    pub fn anonymous() -> Result<Self, CliError> {
        Self::from_settings(get_configuration()?, None)
    }

    /// Requests carry the admin session token as bearer.
    pub fn authenticated(session: &AdminSession) -> Result<Self, CliError> {
        Self::from_settings(get_configuration()?, Some(session))
    }

    pub fn from_settings(
        settings: Settings,
        session: Option<&AdminSession>,
    ) -> Result<Self, CliError> {
        let mut config = settings.remote_store().clone();
        if let Some(session) = session {
            config = config.with_access_token(&session.access_token);
        }
        let remote = init_remote_store(&config, settings.offline_demo)?;
        Ok(Self { settings, remote })
    }

    pub fn repository(&self) -> ProductRepository {
        ProductRepository::new(self.remote.products.clone())
    }

    pub fn images(&self) -> ImageStore {
        ImageStore::new(self.remote.storage.clone())
    }

    pub fn auth(&self) -> AdminAuth {
        AdminAuth::new(self.remote.auth.clone())
    }

    pub fn admin_panel(&self) -> AdminPanel {
        AdminPanel::new(self.repository(), self.images())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_demo_needs_no_credentials() {
        let settings = Settings {
            offline_demo: true,
            ..Default::default()
        };
        let ctx = AppContext::from_settings(settings, None).unwrap();
        let rt = build_runtime().unwrap();
        let products = rt.block_on(ctx.repository().list_all()).unwrap();
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_online_requires_anon_key() {
        let mut settings = Settings::default();
        settings.connectors.remote_store.anon_key = String::new();
        let result = AppContext::from_settings(settings, None);
        assert!(matches!(result, Err(CliError::Connector(_))));
    }
}
