//! Access token acquisition.
//!
//! - [`ClientCredentialsProvider`]: performs the OAuth 2.0 client credentials
//!   grant against `https://{shop}/admin/oauth/access_token`
//! - [`AccessToken`]: the issued token and its TTL
//! - [`TokenError`]: configuration and upstream failures
//!
//! Only the client credentials grant is supported. Tokens are not cached here;
//! see [`TokenCache`](crate::cache::TokenCache).

mod client_credentials;
mod error;

pub use client_credentials::{AccessToken, ClientCredentialsProvider, DEFAULT_EXPIRES_IN};
pub use error::TokenError;
