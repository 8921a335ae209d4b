//! Error taxonomy at the gateway boundary.
//!
//! Every failure of [`GraphqlGateway::execute`](super::GraphqlGateway::execute)
//! is one of four kinds:
//!
//! | Kind | Cause | Retried by the gateway |
//! |------|-------|------------------------|
//! | [`ErrorKind::Config`] | missing/invalid shop domain or credentials | never |
//! | [`ErrorKind::UpstreamAuth`] | token endpoint rejected the request or returned no token | only inside the single `ACCESS_DENIED` recovery |
//! | [`ErrorKind::UpstreamGraphql`] | GraphQL `errors`, including a second `ACCESS_DENIED` | never |
//! | [`ErrorKind::Network`] | no response from the GraphQL endpoint | never |

use std::fmt;

use thiserror::Error;

use crate::auth::TokenError;
use crate::clients::graphql::{format_errors, GraphqlErrorEntry};
use crate::config::ShopDomain;
use crate::error::ConfigError;

/// Result type returned by the gateway and the read operations built on it.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Coarse classification of a [`GatewayError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Deployment misconfiguration.
    Config,
    /// The OAuth token endpoint failed.
    UpstreamAuth,
    /// Shopify answered with GraphQL errors.
    UpstreamGraphql,
    /// Transport failure on the GraphQL call.
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "ConfigError",
            Self::UpstreamAuth => "UpstreamAuthError",
            Self::UpstreamGraphql => "UpstreamGraphQLError",
            Self::Network => "NetworkError",
        })
    }
}

/// A failed gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The shop domain or the app credentials are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The token endpoint rejected the request, was unreachable, or returned
    /// no usable token.
    #[error("Access token request for {shop} failed with status {status}: {message}")]
    UpstreamAuth {
        /// The shop the token was requested for.
        shop: String,
        /// HTTP status, or 0 when no response was received.
        status: u16,
        /// Upstream body or failure reason.
        message: String,
    },

    /// Shopify returned GraphQL errors that the gateway does not recover from.
    #[error("GraphQL request to {shop} failed (HTTP {status}): {}", format_errors(.errors))]
    UpstreamGraphql {
        /// The shop the query was sent to.
        shop: String,
        /// HTTP status of the final response.
        status: u16,
        /// The raw error list.
        errors: Vec<GraphqlErrorEntry>,
    },

    /// No response was received from the GraphQL endpoint.
    #[error("Network error calling {shop}: {source}")]
    Network {
        /// The shop the query was sent to.
        shop: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },
}

// Verify GatewayError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayError>();
};

impl GatewayError {
    /// Returns the error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::UpstreamAuth { .. } => ErrorKind::UpstreamAuth,
            Self::UpstreamGraphql { .. } => ErrorKind::UpstreamGraphql,
            Self::Network { .. } => ErrorKind::Network,
        }
    }

    /// Returns the GraphQL error list for [`ErrorKind::UpstreamGraphql`].
    #[must_use]
    pub fn graphql_errors(&self) -> &[GraphqlErrorEntry] {
        match self {
            Self::UpstreamGraphql { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Attaches the shop to a token acquisition failure.
    #[must_use]
    pub fn from_token_error(shop: &ShopDomain, error: TokenError) -> Self {
        match error {
            TokenError::Config(e) => Self::Config(e),
            TokenError::ClientCredentialsFailed { status, message } => Self::UpstreamAuth {
                shop: shop.to_string(),
                status,
                message,
            },
        }
    }

    /// Builds an [`ErrorKind::UpstreamGraphql`] error from a single message.
    #[must_use]
    pub fn graphql_message(shop: &ShopDomain, status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamGraphql {
            shop: shop.to_string(),
            status,
            errors: vec![GraphqlErrorEntry::from_message(message)],
        }
    }
}
