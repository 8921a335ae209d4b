//! Token acquisition errors.

use thiserror::Error;

use crate::error::ConfigError;

/// Errors returned by [`ClientCredentialsProvider::acquire`](super::ClientCredentialsProvider::acquire).
///
/// # Example
///
/// ```rust
/// use shopify_gateway::auth::TokenError;
///
/// let error = TokenError::ClientCredentialsFailed {
///     status: 401,
///     message: r#"{"error":"invalid_client"}"#.to_string(),
/// };
/// assert!(error.to_string().contains("invalid_client"));
/// ```
#[derive(Debug, Error)]
pub enum TokenError {
    /// The app credentials are not configured. Never retried.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The token endpoint rejected the request, was unreachable, or returned
    /// a payload without a usable token.
    ///
    /// `status` is `0` when no response was received.
    #[error("Client credentials exchange failed with status {status}: {message}")]
    ClientCredentialsFailed {
        /// The HTTP status code, or 0 for transport failures.
        status: u16,
        /// The upstream body or failure reason.
        message: String,
    },
}

// Verify TokenError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenError>();
};
