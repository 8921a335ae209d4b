//! OAuth 2.0 client credentials grant against a shop's admin endpoint.
//!
//! The provider performs exactly one `POST {origin}/admin/oauth/access_token`
//! per call. It does not cache: deciding when a token can be reused is the
//! gateway's job.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_gateway::auth::ClientCredentialsProvider;
//! use shopify_gateway::{ClientId, ClientSecret, GatewayConfig, ShopDomain};
//!
//! let config = GatewayConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-secret").unwrap())
//!     .build();
//!
//! let provider = ClientCredentialsProvider::new(config);
//! let token = provider.acquire(&ShopDomain::new("my-store").unwrap()).await?;
//! println!("token valid for {}s", token.expires_in);
//! ```

use serde::{Deserialize, Serialize};

use crate::auth::TokenError;
use crate::clients::HttpClient;
use crate::config::{GatewayConfig, ShopDomain};
use crate::error::ConfigError;

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// TTL assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Form body for the token request.
#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
}

/// Token endpoint response. Every field is optional so a missing
/// `access_token` is reported with the body rather than as a parse error.
#[derive(Debug, Deserialize)]
struct ClientCredentialsResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
}

/// A freshly issued access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The token value.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
    /// The scopes Shopify granted, if reported.
    pub scope: Option<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Exchanges the configured client credentials for shop access tokens.
#[derive(Clone, Debug)]
pub struct ClientCredentialsProvider {
    config: GatewayConfig,
    http: HttpClient,
}

// Verify ClientCredentialsProvider is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientCredentialsProvider>();
};

impl ClientCredentialsProvider {
    /// Creates a provider with its own HTTP client.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let http = HttpClient::new(&config);
        Self::with_http_client(config, http)
    }

    /// Creates a provider that shares an existing HTTP client.
    #[must_use]
    pub const fn with_http_client(config: GatewayConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    /// Returns the token endpoint for `shop`.
    #[must_use]
    pub fn token_url(&self, shop: &ShopDomain) -> String {
        format!("{}/admin/oauth/access_token", self.config.origin_for(shop))
    }

    /// Requests a new access token for `shop`.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Config`] if the client ID or client secret is not configured
    /// - [`TokenError::ClientCredentialsFailed`] if the request fails, Shopify
    ///   rejects the credentials, or the response carries no `access_token`
    pub async fn acquire(&self, shop: &ShopDomain) -> Result<AccessToken, TokenError> {
        let client_id = self
            .config
            .client_id()
            .ok_or(ConfigError::MissingCredential { field: "client_id" })?;
        let client_secret = self
            .config
            .client_secret()
            .ok_or(ConfigError::MissingCredential {
                field: "client_secret",
            })?;

        let request_body = ClientCredentialsRequest {
            grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
            client_id: client_id.as_ref(),
            client_secret: client_secret.as_ref(),
            scope: self.config.scopes(),
        };

        let token_url = self.token_url(shop);
        tracing::debug!(shop = %shop, "Requesting client credentials access token");

        let response = self
            .http
            .post_form(&token_url, shop, &request_body)
            .await
            .map_err(|e| TokenError::ClientCredentialsFailed {
                status: 0,
                message: format!("Network error: {e}"),
            })?;

        if !response.is_ok() {
            tracing::warn!(
                shop = %shop,
                status = response.code,
                request_id = response.request_id().unwrap_or_default(),
                "Client credentials exchange rejected"
            );
            return Err(TokenError::ClientCredentialsFailed {
                status: response.code,
                message: response.describe(),
            });
        }

        let parsed: ClientCredentialsResponse =
            response
                .json()
                .map_err(|e| TokenError::ClientCredentialsFailed {
                    status: response.code,
                    message: format!(
                        "Failed to parse token response: {e}. Body: {}",
                        response.describe()
                    ),
                })?;

        let token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| TokenError::ClientCredentialsFailed {
                status: response.code,
                message: format!("Token response has no access_token. Body: {}", response.describe()),
            })?;

        let expires_in = parsed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        tracing::debug!(shop = %shop, expires_in, "Acquired access token");

        Ok(AccessToken {
            token,
            expires_in,
            scope: parsed.scope,
        })
    }
}
