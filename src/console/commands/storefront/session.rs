use crate::cli::context::{build_runtime, AppContext};
use crate::cli::credentials::SessionManager;
use crate::cli::error::CliError;
use crate::cli::progress;
use crate::console::commands::CallableTrait;
use dialoguer::{Input, Password};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// login
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo login [--email <email>]`
///
/// Signs in with email and password and stores the session in
/// `~/.config/moodoo/session.json`. The password is read from
/// `MOODOO_ADMIN_PASSWORD` when set, otherwise prompted for.
pub struct LoginCommand {
    pub email: Option<String>,
}

impl LoginCommand {
    pub fn new(email: Option<String>) -> Self {
        Self { email }
    }
}

impl CallableTrait for LoginCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let email = match &self.email {
            Some(email) => email.clone(),
            None => Input::<String>::new()
                .with_prompt("Email")
                .interact_text()
                .map_err(CliError::from)?,
        };
        let password = match std::env::var("MOODOO_ADMIN_PASSWORD") {
            Ok(password) => password,
            Err(_) => Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(CliError::from)?,
        };

        let ctx = AppContext::anonymous()?;
        let rt = build_runtime()?;
        let session = rt.block_on(ctx.auth().sign_in(&email, &password))?;

        SessionManager::with_default_store().save(&session)?;
        eprintln!("✓ {}", session);
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// logout
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo logout`
///
/// Revokes the session remotely when possible; the local session file is
/// removed either way.
pub struct LogoutCommand;

impl LogoutCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogoutCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CallableTrait for LogoutCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let manager = SessionManager::with_default_store();
        let Some(session) = manager.load()? else {
            eprintln!("Not logged in.");
            return Ok(());
        };

        match AppContext::authenticated(&session) {
            Ok(ctx) => {
                let rt = build_runtime()?;
                if let Err(err) = rt.block_on(ctx.auth().sign_out(&session)) {
                    tracing::warn!("Remote sign-out failed: {}", err);
                }
            }
            Err(err) => tracing::warn!("Skipping remote sign-out: {}", err),
        }

        manager.logout()?;
        eprintln!("✓ Logged out");
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// whoami
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo whoami`
pub struct WhoamiCommand;

impl WhoamiCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WhoamiCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CallableTrait for WhoamiCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let session = SessionManager::with_default_store().require_valid_session("whoami")?;
        let ctx = AppContext::authenticated(&session)?;
        let rt = build_runtime()?;

        let pb = progress::spinner("Checking session...");
        match rt.block_on(ctx.auth().current_user(&session)) {
            Ok(user) => {
                progress::finish_success(&pb, &session.to_string());
                println!("User ID: {}", user.id);
                println!("Email:   {}", user.email.as_deref().unwrap_or("<unknown>"));
                println!("Expires: {}", session.expires_at.to_rfc3339());
                Ok(())
            }
            Err(err) => {
                progress::finish_error(&pb, "Session rejected by the backend");
                Err(CliError::from(err).into())
            }
        }
    }
}
