//! HTTP transport and GraphQL wire types.
//!
//! # Overview
//!
//! - [`HttpClient`]: the shared `reqwest` client used for the token request and
//!   the GraphQL request
//! - [`HttpResponse`]: a raw response with Shopify header helpers
//! - [`graphql`]: request body and response envelope types for the Admin
//!   GraphQL endpoint
//!
//! The transport never retries. The only retry in this crate is the single
//! `ACCESS_DENIED` recovery performed by
//! [`GraphqlGateway`](crate::gateway::GraphqlGateway).

pub mod graphql;
mod http_client;
mod http_response;

pub use http_client::{HttpClient, ACCESS_TOKEN_HEADER, SDK_VERSION};
pub use http_response::HttpResponse;

pub use graphql::{GraphqlErrorEntry, GraphqlRequest, GraphqlResponse};
