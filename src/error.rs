//! Configuration error types for the Shopify token gateway.
//!
//! Every configuration constructor returns `Result<T, ConfigError>` so that a
//! broken deployment fails fast, before any request reaches Shopify. A
//! `ConfigError` is never retried.
//!
//! # Example
//!
//! ```rust
//! use shopify_gateway::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or consulting gateway configuration.
///
/// Each variant carries an actionable message. Missing credentials and a
/// missing shop domain are reported here rather than as upstream failures,
/// since no request can succeed until the deployment is fixed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty. Please provide the app's Shopify client ID.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the app's Shopify client secret.")]
    EmptyClientSecret,

    /// A credential required for the client credentials grant is not configured.
    #[error("Missing Shopify credential '{field}'. Configure it before requesting access tokens.")]
    MissingCredential {
        /// The name of the missing credential.
        field: &'static str,
    },

    /// No shop domain was passed and no default shop domain is configured.
    #[error("No shop domain provided and no default shop domain configured.")]
    MissingShopDomain,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-01') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A configuration value could not be parsed.
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        /// The configuration key.
        field: &'static str,
        /// The raw value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_client_id_error_message() {
        let message = ConfigError::EmptyClientId.to_string();
        assert!(message.contains("Client ID cannot be empty"));
    }

    #[test]
    fn test_missing_credential_names_the_field() {
        let error = ConfigError::MissingCredential {
            field: "client_secret",
        };
        assert!(error.to_string().contains("client_secret"));
    }

    #[test]
    fn test_missing_shop_domain_message() {
        let message = ConfigError::MissingShopDomain.to_string();
        assert!(message.contains("default shop domain"));
    }

    #[test]
    fn test_invalid_value_includes_field_and_reason() {
        let error = ConfigError::InvalidValue {
            field: "SHOPIFY_TIMEOUT_SECS",
            value: "soon".to_string(),
            reason: "expected a whole number of seconds".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("SHOPIFY_TIMEOUT_SECS"));
        assert!(message.contains("soon"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::MissingShopDomain;
        let _: &dyn std::error::Error = &error;
    }
}
