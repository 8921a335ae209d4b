//! GraphQL passthrough with cached client credentials tokens.
//!
//! [`GraphqlGateway::execute`] runs one call as a small state machine:
//!
//! 1. **Resolve** the shop (explicit or configured default).
//! 2. **Acquire** a token: a fresh cache entry, or a new client credentials
//!    exchange that is then cached.
//! 3. **Send** the query to `/admin/api/{version}/graphql.json`.
//! 4. **Inspect** the response: data is returned, an `ACCESS_DENIED` error
//!    (or HTTP 401) enters recovery, anything else is terminal.
//! 5. **Recover** once: drop the cached token, acquire a new one bypassing the
//!    cache, and send again. The second response is final whatever it holds.
//!
//! Only the two network calls suspend. Both honor the configured timeout, and
//! dropping the returned future aborts whichever request is in flight. The
//! cache is only ever written with whole entries, so a cancelled call cannot
//! leave it half updated.
//!
//! Concurrent calls for the same shop share one token request through a
//! per-shop guard; callers that waited on the guard re-check the cache before
//! asking Shopify again. A guard lives only while some call holds or awaits
//! it, so the guard map never outgrows the set of shops with a token request
//! in flight.

mod errors;

pub use errors::{ErrorKind, GatewayError, GatewayResult};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;

use crate::auth::ClientCredentialsProvider;
use crate::cache::TokenCache;
use crate::clients::graphql::{GraphqlErrorEntry, GraphqlRequest, GraphqlResponse};
use crate::clients::{HttpClient, HttpResponse};
use crate::config::{GatewayConfig, ShopDomain};
use crate::shop::ShopDomainResolver;

/// Which send of a call is in progress. There is no state after `Recovery`,
/// so a call can never send a third time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    Initial,
    Recovery,
}

/// Data returned by a call, with the shop and status it came from.
struct Delivered {
    shop: ShopDomain,
    status: u16,
    data: Value,
}

/// A claim on a shop's single-flight guard.
///
/// Dropping the last lease for a shop removes its guard from the map. This
/// also runs when a call is cancelled while waiting on or holding the guard.
struct FlightLease<'a> {
    flights: &'a Mutex<HashMap<ShopDomain, Arc<AsyncMutex<()>>>>,
    shop: &'a ShopDomain,
    guard: Arc<AsyncMutex<()>>,
}

impl Drop for FlightLease<'_> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        // Leases are only created under the map lock, so a count of 2 means
        // the map and this lease are the last holders
        let last = flights
            .get(self.shop)
            .is_some_and(|guard| Arc::ptr_eq(guard, &self.guard))
            && Arc::strong_count(&self.guard) == 2;
        if last {
            flights.remove(self.shop);
        }
    }
}

/// How a GraphQL response should be handled.
#[derive(Debug)]
enum Outcome {
    Data(Value),
    AccessDenied {
        status: u16,
        errors: Vec<GraphqlErrorEntry>,
    },
    Failed {
        status: u16,
        errors: Vec<GraphqlErrorEntry>,
    },
}

/// Executes Admin GraphQL calls with cached client credentials tokens.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_gateway::{ClientId, ClientSecret, GatewayConfig, GraphqlGateway, ShopDomain};
/// use serde_json::json;
///
/// let config = GatewayConfig::builder()
///     .client_id(ClientId::new("client-id").unwrap())
///     .client_secret(ClientSecret::new("client-secret").unwrap())
///     .default_shop_domain(ShopDomain::new("my-store").unwrap())
///     .build();
///
/// let gateway = GraphqlGateway::new(config);
///
/// let data = gateway
///     .execute(None, "query { shop { name } }", None)
///     .await?;
/// println!("{}", data["shop"]["name"]);
///
/// let data = gateway
///     .execute(
///         Some("other-store"),
///         "query Product($id: ID!) { product(id: $id) { title } }",
///         Some(json!({ "id": "gid://shopify/Product/1" })),
///     )
///     .await?;
/// ```
#[derive(Debug)]
pub struct GraphqlGateway {
    config: GatewayConfig,
    resolver: ShopDomainResolver,
    cache: Arc<TokenCache>,
    provider: ClientCredentialsProvider,
    http: HttpClient,
    flights: Mutex<HashMap<ShopDomain, Arc<AsyncMutex<()>>>>,
}

// Verify GraphqlGateway is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlGateway>();
};

impl GraphqlGateway {
    /// Creates a gateway with its own empty token cache.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_cache(config, Arc::new(TokenCache::new()))
    }

    /// Creates a gateway around an existing token cache.
    ///
    /// Useful for sharing one cache between gateways or for driving expiry
    /// with a [`ManualClock`](crate::cache::ManualClock).
    #[must_use]
    pub fn with_cache(config: GatewayConfig, cache: Arc<TokenCache>) -> Self {
        if config.api_version().is_deprecated() {
            tracing::warn!(
                "Admin API version {} is outside Shopify's support window",
                config.api_version()
            );
        } else {
            tracing::debug!("GraphQL gateway using Admin API version {}", config.api_version());
        }

        let http = HttpClient::new(&config);
        let provider = ClientCredentialsProvider::with_http_client(config.clone(), http.clone());
        let resolver = ShopDomainResolver::new(config.default_shop_domain().cloned());

        Self {
            config,
            resolver,
            cache,
            provider,
            http,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the token cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Returns the GraphQL endpoint for `shop`.
    #[must_use]
    pub fn graphql_url(&self, shop: &ShopDomain) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.config.origin_for(shop),
            self.config.api_version()
        )
    }

    /// Executes a GraphQL document and returns its `data`.
    ///
    /// `shop` may be omitted when a default shop is configured.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Config`]: no usable shop domain or credentials
    /// - [`GatewayError::UpstreamAuth`]: the token could not be acquired
    /// - [`GatewayError::UpstreamGraphql`]: Shopify returned errors, including
    ///   `ACCESS_DENIED` on the retried request
    /// - [`GatewayError::Network`]: the GraphQL request got no response
    pub async fn execute(
        &self,
        shop: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> GatewayResult<Value> {
        self.deliver(shop, query, variables)
            .await
            .map(|delivered| delivered.data)
    }

    /// Executes a GraphQL document and decodes its `data` into `T`.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute); additionally an
    /// [`GatewayError::UpstreamGraphql`] when `data` does not match `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        shop: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> GatewayResult<T> {
        let Delivered { shop, status, data } = self.deliver(shop, query, variables).await?;
        serde_json::from_value(data).map_err(|e| {
            GatewayError::graphql_message(&shop, status, format!("Unexpected response shape: {e}"))
        })
    }

    async fn deliver(
        &self,
        shop: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> GatewayResult<Delivered> {
        let shop = self.resolver.resolve(shop)?;
        let request = GraphqlRequest {
            query,
            variables: variables.as_ref(),
        };

        let mut token = self.token(&shop).await?;
        let mut attempt = Attempt::Initial;

        loop {
            let response = self.send(&shop, &token, &request).await?;

            match (Self::classify(&response), attempt) {
                (Outcome::Data(data), _) => {
                    return Ok(Delivered {
                        shop,
                        status: response.code,
                        data,
                    });
                }
                (Outcome::AccessDenied { status, .. }, Attempt::Initial) => {
                    tracing::warn!(
                        shop = %shop,
                        status,
                        request_id = response.request_id().unwrap_or_default(),
                        "Access token rejected, refreshing and retrying once"
                    );
                    attempt = Attempt::Recovery;
                    token = self.refresh_token(&shop).await?;
                }
                (
                    Outcome::AccessDenied { status, errors } | Outcome::Failed { status, errors },
                    _,
                ) => {
                    return Err(GatewayError::UpstreamGraphql {
                        shop: shop.to_string(),
                        status,
                        errors,
                    });
                }
            }
        }
    }

    /// Returns a fresh cached token, or acquires and caches a new one.
    async fn token(&self, shop: &ShopDomain) -> GatewayResult<String> {
        if let Some(token) = self.cache.get_fresh(shop) {
            tracing::debug!(shop = %shop, "Using cached access token");
            return Ok(token);
        }

        let lease = self.flight(shop);
        let _flight = lease.guard.lock().await;

        // Another caller may have refreshed while this one waited
        if let Some(token) = self.cache.get_fresh(shop) {
            tracing::debug!(shop = %shop, "Using access token refreshed by a concurrent call");
            return Ok(token);
        }

        tracing::debug!(shop = %shop, "No fresh access token cached");
        self.acquire_and_store(shop).await
    }

    /// Drops the cached token and acquires a new one, ignoring the cache.
    async fn refresh_token(&self, shop: &ShopDomain) -> GatewayResult<String> {
        self.cache.clear(Some(shop));

        let lease = self.flight(shop);
        let _flight = lease.guard.lock().await;

        self.acquire_and_store(shop).await
    }

    async fn acquire_and_store(&self, shop: &ShopDomain) -> GatewayResult<String> {
        let issued = self
            .provider
            .acquire(shop)
            .await
            .map_err(|e| GatewayError::from_token_error(shop, e))?;

        self.cache.set(shop, issued.token.clone(), issued.expires_in);
        Ok(issued.token)
    }

    fn flight<'a>(&'a self, shop: &'a ShopDomain) -> FlightLease<'a> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = Arc::clone(flights.entry(shop.clone()).or_default());
        FlightLease {
            flights: &self.flights,
            shop,
            guard,
        }
    }

    async fn send(
        &self,
        shop: &ShopDomain,
        token: &str,
        request: &GraphqlRequest<'_>,
    ) -> GatewayResult<HttpResponse> {
        let url = self.graphql_url(shop);
        self.http
            .post_json(&url, shop, token, request)
            .await
            .map_err(|source| GatewayError::Network {
                shop: shop.to_string(),
                source,
            })
    }

    fn classify(response: &HttpResponse) -> Outcome {
        let status = response.code;
        let parsed = response.json::<GraphqlResponse>();

        if !response.is_ok() {
            let errors = match parsed {
                Ok(body) if body.has_errors() => body.errors,
                _ => vec![GraphqlErrorEntry::from_message(response.describe())],
            };
            // An invalid or revoked token is reported as HTTP 401
            return if status == 401 {
                Outcome::AccessDenied { status, errors }
            } else {
                Outcome::Failed { status, errors }
            };
        }

        match parsed {
            Err(e) => Outcome::Failed {
                status,
                errors: vec![GraphqlErrorEntry::from_message(format!(
                    "Unparsable GraphQL response: {e}. Body: {}",
                    response.describe()
                ))],
            },
            Ok(body) if body.has_access_denied() => Outcome::AccessDenied {
                status,
                errors: body.errors,
            },
            Ok(body) if body.has_errors() => Outcome::Failed {
                status,
                errors: body.errors,
            },
            Ok(GraphqlResponse {
                data: Some(data), ..
            }) => Outcome::Data(data),
            Ok(_) => Outcome::Failed {
                status,
                errors: vec![GraphqlErrorEntry::from_message(
                    "GraphQL response contained neither data nor errors",
                )],
            },
        }
    }
}
