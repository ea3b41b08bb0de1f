use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::services::AdminSession;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SessionStore trait: where the admin session lives between commands
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Pluggable storage back-end. Production writes to disk; tests use
/// `MemorySessionStore`.
pub trait SessionStore: Send + Sync {
    fn save(&self, session: &AdminSession) -> Result<(), CliError>;
    fn load(&self) -> Result<Option<AdminSession>, CliError>;
    fn delete(&self) -> Result<(), CliError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FileSessionStore: XDG-style file storage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stores the session in `<config_dir>/moodoo/session.json`.
///
/// `MOODOO_SESSION_FILE` overrides the location.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("MOODOO_SESSION_FILE") {
            return PathBuf::from(path);
        }
        let base = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|_| PathBuf::from("."));

        base.join("moodoo").join("session.json")
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, session: &AdminSession) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| CliError::SessionCorrupt(format!("failed to serialize session: {e}")))?;

        std::fs::write(&self.path, &json)?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    fn load(&self) -> Result<Option<AdminSession>, CliError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| CliError::SessionCorrupt(e.to_string()))?;

        Ok(Some(session))
    }

    fn delete(&self) -> Result<(), CliError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process store, used by tests and the offline demo.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: std::sync::Arc<std::sync::Mutex<Option<AdminSession>>>,
}

impl MemorySessionStore {
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<AdminSession>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &AdminSession) -> Result<(), CliError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<AdminSession>, CliError> {
        Ok(self.slot().clone())
    }

    fn delete(&self) -> Result<(), CliError> {
        *self.slot() = None;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SessionManager: high-level operations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionManager<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&self, session: &AdminSession) -> Result<(), CliError> {
        self.store.save(session)
    }

    pub fn load(&self) -> Result<Option<AdminSession>, CliError> {
        self.store.load()
    }

    pub fn logout(&self) -> Result<(), CliError> {
        self.store.delete()
    }

    /// Load the session and ensure it is present and not expired.
    pub fn require_valid_session(&self, feature: &str) -> Result<AdminSession, CliError> {
        let session = self.store.load()?.ok_or_else(|| CliError::LoginRequired {
            feature: feature.to_string(),
        })?;

        if session.is_expired() {
            return Err(CliError::SessionExpired);
        }

        Ok(session)
    }
}

impl SessionManager<FileSessionStore> {
    pub fn with_default_store() -> Self {
        Self::new(FileSessionStore::with_default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(expires_in_minutes: i64) -> AdminSession {
        AdminSession {
            access_token: "token-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            token_type: "bearer".to_string(),
            expires_at: Utc::now() + Duration::minutes(expires_in_minutes),
            user_id: "user-1".to_string(),
            email: Some("admin@moodoo.com".to_string()),
        }
    }

    #[test]
    fn test_require_valid_session_without_login() {
        let manager = SessionManager::new(MemorySessionStore::default());
        let err = manager.require_valid_session("admin list").unwrap_err();
        assert!(matches!(err, CliError::LoginRequired { .. }));
    }

    #[test]
    fn test_require_valid_session_expired() {
        let manager = SessionManager::new(MemorySessionStore::default());
        manager.save(&session(-5)).unwrap();
        let err = manager.require_valid_session("admin list").unwrap_err();
        assert!(matches!(err, CliError::SessionExpired));
    }

    #[test]
    fn test_require_valid_session_ok() {
        let manager = SessionManager::new(MemorySessionStore::default());
        manager.save(&session(30)).unwrap();
        let loaded = manager.require_valid_session("admin list").unwrap();
        assert_eq!(loaded.access_token, "token-1");
    }

    #[test]
    fn test_file_store_round_trip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(path.clone());

        assert!(store.load().unwrap().is_none());
        store.save(&session(30)).unwrap();
        assert!(path.exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.email.as_deref(), Some("admin@moodoo.com"));

        store.delete().unwrap();
        assert!(!path.exists());
        store.delete().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&session(30)).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileSessionStore::new(path).load().unwrap_err();
        assert!(matches!(err, CliError::SessionCorrupt(_)));
    }
}
