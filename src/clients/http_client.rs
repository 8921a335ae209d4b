//! HTTP transport shared by the token provider and the GraphQL gateway.
//!
//! One [`HttpClient`] owns one `reqwest::Client`, so both outbound calls share
//! a connection pool, the configured timeout and the user agent.
//!
//! With an `api_host` configured every request goes to that origin and names
//! its shop in the `Host` header, so a proxy can route per shop.

use std::collections::HashMap;

use serde::Serialize;

use crate::clients::http_response::HttpResponse;
use crate::config::{GatewayConfig, ShopDomain};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Thin wrapper around `reqwest::Client` for the two requests the gateway makes.
///
/// The client never retries and never interprets status codes; callers decide
/// what a non-2xx response means. A transport failure (timeout, DNS, reset)
/// is returned as the underlying `reqwest::Error`.
///
/// Dropping a returned future aborts the in-flight request.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    user_agent: String,
    proxied: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client honoring the configured timeout and user agent prefix.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Shopify Token Gateway v{SDK_VERSION} | Rust {rust_version}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        if let Some(host) = config.api_host() {
            tracing::debug!(
                "Routing Shopify requests through {}",
                host.host_name().unwrap_or_else(|| host.origin())
            );
            if host.scheme() != "https" {
                tracing::warn!(
                    "api_host {} is not https; client secrets and access tokens are sent in plain text",
                    host.origin()
                );
            }
        }

        Self {
            client,
            user_agent,
            proxied: config.api_host().is_some(),
        }
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a form-encoded POST on behalf of `shop`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error when no response was received.
    pub async fn post_form<T>(
        &self,
        url: &str,
        shop: &ShopDomain,
        form: &T,
    ) -> Result<HttpResponse, reqwest::Error>
    where
        T: Serialize + ?Sized,
    {
        let request = self.post(url, shop).form(form);

        Self::send(request, url).await
    }

    /// Sends a JSON POST for `shop`, authenticated with an Admin API access token.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error when no response was received.
    pub async fn post_json<T>(
        &self,
        url: &str,
        shop: &ShopDomain,
        access_token: &str,
        body: &T,
    ) -> Result<HttpResponse, reqwest::Error>
    where
        T: Serialize + ?Sized,
    {
        let request = self
            .post(url, shop)
            .header(ACCESS_TOKEN_HEADER, access_token)
            .json(body);

        Self::send(request, url).await
    }

    fn post(&self, url: &str, shop: &ShopDomain) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json");

        // Add Host header when using api_host (proxy scenario)
        if self.proxied {
            request.header(reqwest::header::HOST, shop.as_ref())
        } else {
            request
        }
    }

    async fn send(
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<HttpResponse, reqwest::Error> {
        let res = request.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        let response = HttpResponse::new(code, headers, body);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                url,
                reason
            );
        }

        Ok(response)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
