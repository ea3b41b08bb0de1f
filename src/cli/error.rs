use std::fmt;

use crate::connectors::ConnectorError;
use crate::errors::CatalogError;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CliError: errors surfaced by console commands
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug)]
pub enum CliError {
    // Config errors
    Config(config::ConfigError),
    ConfigValidation(String),

    // Session errors
    LoginRequired { feature: String },
    SessionExpired,
    SessionCorrupt(String),

    // Backend errors
    Connector(ConnectorError),
    Catalog(CatalogError),

    // Input errors
    ProductNotFound { id: i64 },
    InvalidInput(String),
    Prompt(String),

    // IO errors
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Failed to read configuration: {err}"),
            Self::ConfigValidation(msg) => write!(f, "Configuration validation error: {msg}"),
            Self::LoginRequired { feature } => {
                write!(f, "Login required for {feature}. Run: moodoo login")
            }
            Self::SessionExpired => write!(f, "Admin session expired. Run: moodoo login"),
            Self::SessionCorrupt(msg) => write!(f, "Corrupt session file: {msg}"),
            Self::Connector(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::ProductNotFound { id } => write!(f, "No product with id {id}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Prompt(msg) => write!(f, "Prompt failed: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ConnectorError> for CliError {
    fn from(err: ConnectorError) -> Self {
        Self::Connector(err)
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}
