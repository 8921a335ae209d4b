//! Wire types for the Admin GraphQL endpoint.
//!
//! A request is `{query, variables}`; a response is an envelope with optional
//! `data`, optional `errors` and optional `extensions`. Errors arrive with
//! HTTP 200, so classifying them is up to the caller: see
//! [`GraphqlResponse::has_access_denied`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The extension code Shopify attaches when the presented token is no
/// longer authorized.
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";

/// Body of a GraphQL POST.
#[derive(Clone, Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    /// The query or mutation document.
    pub query: &'a str,
    /// Variables for the document, sent as `null` when absent.
    pub variables: Option<&'a Value>,
}

/// The `extensions` object of a GraphQL error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorExtensions {
    /// Machine-readable error code, e.g. `ACCESS_DENIED` or `THROTTLED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Any other extension fields, kept verbatim.
    #[serde(flatten)]
    pub other: serde_json::Map<String, Value>,
}

/// One entry of a GraphQL `errors` array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorEntry {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Source locations in the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Value>,
    /// Response path the error applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Value>,
    /// Error extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<GraphqlErrorExtensions>,
}

impl GraphqlErrorEntry {
    /// Creates an entry carrying only a message.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Returns the `extensions.code` value, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }

    /// Returns `true` if this error reports `ACCESS_DENIED`.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        self.code() == Some(ACCESS_DENIED)
    }
}

/// A GraphQL response envelope.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    /// The result data; `None` when absent or `null`.
    #[serde(default)]
    pub data: Option<Value>,
    /// Errors reported alongside (or instead of) data.
    #[serde(default, deserialize_with = "deserialize_errors")]
    pub errors: Vec<GraphqlErrorEntry>,
    /// Query cost and other extensions.
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphqlResponse {
    /// Returns `true` if any error carries the `ACCESS_DENIED` code.
    #[must_use]
    pub fn has_access_denied(&self) -> bool {
        self.errors.iter().any(GraphqlErrorEntry::is_access_denied)
    }

    /// Returns `true` if the response reported errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Joins the messages of `errors` with `"; "`.
#[must_use]
pub fn format_errors(errors: &[GraphqlErrorEntry]) -> String {
    errors
        .iter()
        .map(|e| match e.code() {
            Some(code) => format!("{} ({code})", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Shopify sometimes sends `errors` as a bare string (`"[API] Invalid API key
/// or access token"`) instead of a list.
fn deserialize_errors<'de, D>(deserializer: D) -> Result<Vec<GraphqlErrorEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Errors {
        List(Vec<GraphqlErrorEntry>),
        Message(String),
    }

    Ok(match Option::<Errors>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Errors::List(list)) => list,
        Some(Errors::Message(message)) => vec![GraphqlErrorEntry::from_message(message)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_query_and_variables() {
        let variables = json!({"first": 10});
        let request = GraphqlRequest {
            query: "query { shop { name } }",
            variables: Some(&variables),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["query"], "query { shop { name } }");
        assert_eq!(value["variables"]["first"], 10);

        let bare = GraphqlRequest {
            query: "{ shop { name } }",
            variables: None,
        };
        assert_eq!(serde_json::to_value(&bare).unwrap()["variables"], Value::Null);
    }

    #[test]
    fn test_detects_access_denied() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "errors": [
                {"message": "Throttled", "extensions": {"code": "THROTTLED"}},
                {"message": "Access denied", "extensions": {"code": "ACCESS_DENIED"}}
            ]
        }))
        .unwrap();

        assert!(response.has_errors());
        assert!(response.has_access_denied());
        assert!(response.data.is_none());
    }

    #[test]
    fn test_other_errors_are_not_access_denied() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "Field 'nope' doesn't exist", "locations": [{"line": 1, "column": 3}]}]
        }))
        .unwrap();

        assert!(response.has_errors());
        assert!(!response.has_access_denied());
        assert_eq!(response.errors[0].locations.len(), 1);
    }

    #[test]
    fn test_data_only_response() {
        let response: GraphqlResponse =
            serde_json::from_value(json!({"data": {"shop": {"name": "S"}}})).unwrap();
        assert!(!response.has_errors());
        assert_eq!(response.data.unwrap()["shop"]["name"], "S");
    }

    #[test]
    fn test_string_errors_are_wrapped() {
        let response: GraphqlResponse = serde_json::from_value(json!({
            "errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"
        }))
        .unwrap();
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.contains("Invalid API key"));
    }

    #[test]
    fn test_extension_fields_are_preserved() {
        let entry: GraphqlErrorEntry = serde_json::from_value(json!({
            "message": "Throttled",
            "extensions": {"code": "THROTTLED", "documentation": "https://shopify.dev"}
        }))
        .unwrap();
        let extensions = entry.extensions.as_ref().unwrap();
        assert_eq!(extensions.other["documentation"], "https://shopify.dev");

        let round = serde_json::to_value(&entry).unwrap();
        assert_eq!(round["extensions"]["code"], "THROTTLED");
    }

    #[test]
    fn test_format_errors_joins_messages_with_codes() {
        let errors = vec![
            GraphqlErrorEntry::from_message("Field not found"),
            serde_json::from_value(json!({"message": "Denied", "extensions": {"code": "ACCESS_DENIED"}}))
                .unwrap(),
        ];
        assert_eq!(format_errors(&errors), "Field not found; Denied (ACCESS_DENIED)");
    }
}
