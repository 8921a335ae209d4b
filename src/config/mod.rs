//! Configuration types for the Shopify token gateway.
//!
//! # Overview
//!
//! - [`GatewayConfig`]: credentials, API version, default shop and transport settings
//! - [`GatewayConfigBuilder`]: fluent construction of a [`GatewayConfig`]
//! - [`ClientId`] / [`ClientSecret`]: validated app credentials (the secret masks itself in `Debug`)
//! - [`ShopDomain`]: a validated, normalized shop domain
//! - [`HostUrl`]: an optional origin override for proxies and mock servers
//! - [`ApiVersion`]: the Admin API version segment
//!
//! Credentials are optional at build time. A gateway without them can still be
//! constructed, and reports [`ConfigError::MissingCredential`] the first time
//! it needs a token.
//!
//! # Example
//!
//! ```rust
//! use shopify_gateway::{ClientId, ClientSecret, GatewayConfig, ShopDomain};
//!
//! let config = GatewayConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .default_shop_domain(ShopDomain::new("my-store").unwrap())
//!     .build();
//!
//! assert_eq!(config.default_shop_domain().unwrap().as_ref(), "my-store.myshopify.com");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ClientId, ClientSecret, HostUrl, ShopDomain};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Default outbound timeout for both the token and the GraphQL request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names read by [`GatewayConfig::from_env`].
pub mod env {
    /// App client ID.
    pub const CLIENT_ID: &str = "SHOPIFY_CLIENT_ID";
    /// App client secret.
    pub const CLIENT_SECRET: &str = "SHOPIFY_CLIENT_SECRET";
    /// Comma separated access scopes requested with the token.
    pub const SCOPES: &str = "SHOPIFY_SCOPES";
    /// Admin API version, e.g. `2025-10`.
    pub const API_VERSION: &str = "SHOPIFY_API_VERSION";
    /// Shop used when a caller does not name one.
    pub const SHOP_DOMAIN: &str = "SHOPIFY_SHOP_DOMAIN";
    /// Origin override for all outbound requests.
    pub const API_HOST: &str = "SHOPIFY_API_HOST";
    /// Outbound timeout in whole seconds.
    pub const TIMEOUT_SECS: &str = "SHOPIFY_TIMEOUT_SECS";
}

/// Configuration for the token gateway.
///
/// Read-only once built; share it by cloning or through the gateway.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    scopes: Option<String>,
    api_version: ApiVersion,
    default_shop_domain: Option<ShopDomain>,
    api_host: Option<HostUrl>,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// See [`env`] for the variable names. Blank variables are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(id) = get(env::CLIENT_ID) {
            builder = builder.client_id(ClientId::new(id)?);
        }
        if let Some(secret) = get(env::CLIENT_SECRET) {
            builder = builder.client_secret(ClientSecret::new(secret)?);
        }
        if let Some(scopes) = get(env::SCOPES) {
            builder = builder.scopes(scopes);
        }
        if let Some(version) = get(env::API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(shop) = get(env::SHOP_DOMAIN) {
            builder = builder.default_shop_domain(ShopDomain::new(shop)?);
        }
        if let Some(host) = get(env::API_HOST) {
            builder = builder.api_host(HostUrl::new(host)?);
        }
        if let Some(raw) = get(env::TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    field: env::TIMEOUT_SECS,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }

    /// Returns the client ID, if configured.
    #[must_use]
    pub const fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// Returns the client secret, if configured.
    #[must_use]
    pub const fn client_secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref()
    }

    /// Returns the scopes requested with each token, if configured.
    #[must_use]
    pub fn scopes(&self) -> Option<&str> {
        self.scopes.as_deref()
    }

    /// Returns the Admin API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the default shop domain, if configured.
    #[must_use]
    pub const fn default_shop_domain(&self) -> Option<&ShopDomain> {
        self.default_shop_domain.as_ref()
    }

    /// Returns the origin override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the outbound request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the origin requests for `shop` are sent to.
    ///
    /// This is `https://{shop}` unless an [`api_host`](Self::api_host) is set.
    #[must_use]
    pub fn origin_for(&self, shop: &ShopDomain) -> String {
        self.api_host.as_ref().map_or_else(
            || format!("https://{}", shop.as_ref()),
            |host| host.origin().to_string(),
        )
    }
}

/// Builder for constructing [`GatewayConfig`] instances.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::latest`]
/// - `timeout`: 30 seconds
/// - everything else: unset
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    scopes: Option<String>,
    api_version: Option<ApiVersion>,
    default_shop_domain: Option<ShopDomain>,
    api_host: Option<HostUrl>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the app client ID.
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the app client secret.
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the scopes sent with the client credentials grant.
    ///
    /// Whitespace around each comma separated scope is removed; an empty list
    /// leaves scopes unset.
    #[must_use]
    pub fn scopes(mut self, scopes: impl AsRef<str>) -> Self {
        let normalized = scopes
            .as_ref()
            .split(',')
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.scopes = if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        };
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the shop used when a caller does not name one.
    #[must_use]
    pub fn default_shop_domain(mut self, shop: ShopDomain) -> Self {
        self.default_shop_domain = Some(shop);
        self
    }

    /// Sends every request to `host` instead of the shop's own domain.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the outbound timeout for token and GraphQL requests.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for outbound requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GatewayConfig {
        GatewayConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            scopes: self.scopes,
            api_version: self.api_version.unwrap_or_default(),
            default_shop_domain: self.default_shop_domain,
            api_host: self.api_host,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = GatewayConfig::builder().build();

        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.client_id().is_none());
        assert!(config.client_secret().is_none());
        assert!(config.scopes().is_none());
        assert!(config.default_shop_domain().is_none());
        assert!(config.api_host().is_none());
    }

    #[test]
    fn test_scopes_are_normalized() {
        let config = GatewayConfig::builder()
            .scopes(" read_products , write_products,, ")
            .build();
        assert_eq!(config.scopes(), Some("read_products,write_products"));

        let config = GatewayConfig::builder().scopes(" , ").build();
        assert!(config.scopes().is_none());
    }

    #[test]
    fn test_origin_defaults_to_shop_domain() {
        let config = GatewayConfig::builder().build();
        let shop = ShopDomain::new("my-store").unwrap();
        assert_eq!(config.origin_for(&shop), "https://my-store.myshopify.com");
    }

    #[test]
    fn test_origin_uses_api_host_override() {
        let config = GatewayConfig::builder()
            .api_host(HostUrl::new("http://127.0.0.1:9000/").unwrap())
            .build();
        let shop = ShopDomain::new("my-store").unwrap();
        assert_eq!(config.origin_for(&shop), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_from_lookup_reads_every_key() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (env::CLIENT_ID, "id-123"),
            (env::CLIENT_SECRET, "secret-456"),
            (env::SCOPES, "read_products"),
            (env::API_VERSION, "2025-07"),
            (env::SHOP_DOMAIN, "my-store"),
            (env::API_HOST, "http://localhost:4000"),
            (env::TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.client_id().unwrap().as_ref(), "id-123");
        assert_eq!(config.client_secret().unwrap().as_ref(), "secret-456");
        assert_eq!(config.scopes(), Some("read_products"));
        assert_eq!(config.api_version().to_string(), "2025-07");
        assert_eq!(
            config.default_shop_domain().unwrap().as_ref(),
            "my-store.myshopify.com"
        );
        assert_eq!(config.api_host().unwrap().origin(), "http://localhost:4000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_treats_blank_values_as_unset() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (env::CLIENT_ID, "  "),
            (env::SHOP_DOMAIN, ""),
        ]))
        .unwrap();

        assert!(config.client_id().is_none());
        assert!(config.default_shop_domain().is_none());
    }

    #[test]
    fn test_from_lookup_rejects_invalid_values() {
        let result = GatewayConfig::from_lookup(lookup_from(&[(env::TIMEOUT_SECS, "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: env::TIMEOUT_SECS,
                ..
            })
        ));

        let result = GatewayConfig::from_lookup(lookup_from(&[(env::API_VERSION, "v2")]));
        assert!(matches!(result, Err(ConfigError::InvalidApiVersion { .. })));

        let result = GatewayConfig::from_lookup(lookup_from(&[(env::SHOP_DOMAIN, "a.b.c")]));
        assert!(matches!(result, Err(ConfigError::InvalidShopDomain { .. })));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayConfig>();
    }
}
