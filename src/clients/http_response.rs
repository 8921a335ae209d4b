//! Raw HTTP responses from Shopify.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

/// An HTTP response, with the body kept as text.
///
/// The body is deliberately left unparsed: error paths quote it verbatim,
/// success paths decode it with [`json`](Self::json).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Lower-cased response headers (a header may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        Self {
            code,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of header `name` (lower-case).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// Shopify support asks for this ID when investigating a failed call.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns the body followed by the request id, for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let body = if self.body.trim().is_empty() {
            "<empty body>"
        } else {
            self.body.trim()
        };
        self.request_id().map_or_else(
            || body.to_string(),
            |id| format!("{body} (request id: {id})"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in pairs {
            map.entry((*k).to_string()).or_default().push((*v).to_string());
        }
        map
    }

    #[test]
    fn test_is_ok_covers_2xx_only() {
        assert!(HttpResponse::new(200, HashMap::new(), "").is_ok());
        assert!(HttpResponse::new(299, HashMap::new(), "").is_ok());
        assert!(!HttpResponse::new(301, HashMap::new(), "").is_ok());
        assert!(!HttpResponse::new(401, HashMap::new(), "").is_ok());
    }

    #[test]
    fn test_request_id_and_deprecation_headers() {
        let response = HttpResponse::new(
            200,
            headers(&[
                ("x-request-id", "abc-123"),
                ("x-shopify-api-deprecated-reason", "use productSet"),
            ]),
            "{}",
        );
        assert_eq!(response.request_id(), Some("abc-123"));
        assert_eq!(response.deprecation_reason(), Some("use productSet"));
    }

    #[test]
    fn test_json_decodes_body() {
        let response = HttpResponse::new(200, HashMap::new(), r#"{"data":{"ok":true}}"#);
        let value: Value = response.json().unwrap();
        assert_eq!(value["data"]["ok"], Value::Bool(true));

        let garbage = HttpResponse::new(200, HashMap::new(), "<html>");
        assert!(garbage.json::<Value>().is_err());
    }

    #[test]
    fn test_describe_includes_body_and_request_id() {
        let response = HttpResponse::new(
            401,
            headers(&[("x-request-id", "req-9")]),
            r#"{"error":"invalid_client"}"#,
        );
        assert_eq!(
            response.describe(),
            r#"{"error":"invalid_client"} (request id: req-9)"#
        );

        let empty = HttpResponse::new(500, HashMap::new(), "  ");
        assert_eq!(empty.describe(), "<empty body>");
    }
}
