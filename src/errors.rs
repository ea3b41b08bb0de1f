use crate::connectors::ConnectorError;

/// Failures surfaced to the storefront and admin flows.
///
/// `Remote` covers table queries and mutations (auth, row validation,
/// connectivity), `Storage` covers object uploads and removals, `Validation`
/// covers local preconditions checked before any remote call.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("remote store error: {0}")]
    Remote(ConnectorError),
    #[error("image storage error: {0}")]
    Storage(ConnectorError),
    #[error("validation error: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True when the remote store answered 401/403.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Remote(ConnectorError::Unauthorized(_))
                | Self::Storage(ConnectorError::Unauthorized(_))
        )
    }
}

impl From<serde_valid::validation::Errors> for CatalogError {
    fn from(err: serde_valid::validation::Errors) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_layer() {
        let remote = CatalogError::Remote(ConnectorError::NotFound("product 3".to_string()));
        assert!(remote.to_string().starts_with("remote store error"));

        let storage = CatalogError::Storage(ConnectorError::Rejected("duplicate".to_string()));
        assert!(storage.to_string().contains("duplicate"));

        let validation = CatalogError::validation("at least one image is required");
        assert_eq!(
            validation.to_string(),
            "validation error: at least one image is required"
        );
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(CatalogError::Remote(ConnectorError::Unauthorized("jwt".into())).is_unauthorized());
        assert!(!CatalogError::validation("x").is_unauthorized());
    }
}
