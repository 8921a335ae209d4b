//! # Shopify Token Gateway
//!
//! Server-side access to the Shopify Admin GraphQL API for apps that
//! authenticate with the OAuth 2.0 client credentials grant.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GatewayConfig`] and [`GatewayConfigBuilder`],
//!   from code or from `SHOPIFY_*` environment variables
//! - Validated newtypes for credentials, shop domains and API versions
//! - A per-shop [`TokenCache`] with an expiry safety buffer
//! - [`GraphqlGateway`], which acquires and caches tokens, executes GraphQL
//!   documents, and recovers once from `ACCESS_DENIED`
//! - [`ProductService`] for product listing, search, and mutations
//! - A closed error taxonomy: [`GatewayError`] / [`ErrorKind`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_gateway::{ClientId, ClientSecret, GatewayConfig, GraphqlGateway, ShopDomain};
//!
//! let config = GatewayConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .scopes("read_products,write_products")
//!     .default_shop_domain(ShopDomain::new("my-store").unwrap())
//!     .build();
//!
//! let gateway = GraphqlGateway::new(config);
//! assert!(gateway.cache().is_empty());
//! ```
//!
//! ## Executing Queries
//!
//! ```rust,ignore
//! use serde_json::json;
//! use shopify_gateway::{ErrorKind, GatewayConfig, GraphqlGateway};
//!
//! let gateway = GraphqlGateway::new(GatewayConfig::from_env()?);
//!
//! match gateway.execute(None, "query { shop { name } }", None).await {
//!     Ok(data) => println!("{}", data["shop"]["name"]),
//!     Err(e) if e.kind() == ErrorKind::Config => eprintln!("misconfigured: {e}"),
//!     Err(e) => eprintln!("Shopify call failed: {e}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the cache and configuration are owned by the gateway
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Bounded retries**: a call sends at most two GraphQL requests

pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod gateway;
pub mod products;
mod shop;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, ClientCredentialsProvider, TokenError};
pub use cache::{Clock, ManualClock, SystemClock, TokenCache};
pub use config::{
    ApiVersion, ClientId, ClientSecret, GatewayConfig, GatewayConfigBuilder, HostUrl, ShopDomain,
};
pub use error::ConfigError;
pub use gateway::{ErrorKind, GatewayError, GatewayResult, GraphqlGateway};
pub use products::{ProductInput, ProductService};
pub use shop::ShopDomainResolver;

// Re-export HTTP client types
pub use clients::{GraphqlErrorEntry, HttpClient, HttpResponse};
