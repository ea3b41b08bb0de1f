//! Configuration loading from plain environment variables.
//!
//! Runs as its own test binary: it changes the working directory and the
//! process environment.

use moodoo::configuration::get_configuration;
use tempfile::TempDir;

/// Test that `SUPABASE_URL` / `SUPABASE_ANON_KEY` are enough when there is no
/// configuration file and no `MOODOO__*` override.
#[test]
fn test_supabase_env_vars_configure_remote_store() {
    let dir = TempDir::new().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    for (key, _) in std::env::vars() {
        if key.starts_with("MOODOO") {
            std::env::remove_var(key);
        }
    }
    std::env::set_var("SUPABASE_URL", "https://abc.supabase.co");
    std::env::set_var("SUPABASE_ANON_KEY", "anon");

    let settings = get_configuration().unwrap();

    assert_eq!(settings.remote_store().url, "https://abc.supabase.co");
    assert_eq!(settings.remote_store().anon_key, "anon");
    assert!(!settings.offline_demo);
}
