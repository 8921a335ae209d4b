//! Product shapes as returned by the Admin GraphQL API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Publication status of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Visible on sales channels.
    Active,
    /// Hidden and no longer sold.
    Archived,
    /// Not yet published.
    Draft,
    /// A status this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A product variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Decimal price as a string, e.g. `"19.99"`.
    pub price: Option<String>,
    pub sku: Option<String>,
    pub inventory_quantity: Option<i64>,
}

/// A product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The product GID, e.g. `gid://shopify/Product/1`.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    pub status: Option<ProductStatus>,
    pub description_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub total_inventory: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// The first variants of the product.
    #[serde(default, deserialize_with = "deserialize_nodes")]
    pub variants: Vec<ProductVariant>,
}

/// Cursor information for a connection page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of products.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    #[serde(rename = "nodes", default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Fields for creating or updating a product. Unset fields are not sent.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::products::{ProductInput, ProductStatus};
///
/// let input = ProductInput {
///     title: Some("Snowboard".to_string()),
///     status: Some(ProductStatus::Draft),
///     ..ProductInput::default()
/// };
///
/// let json = serde_json::to_value(&input).unwrap();
/// assert_eq!(json["title"], "Snowboard");
/// assert_eq!(json["status"], "DRAFT");
/// assert!(json.get("vendor").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl ProductInput {
    /// Returns `true` if a non-blank title is set.
    #[must_use]
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// A business rule violation reported in a mutation payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field. Shopify sends a list; a bare
    /// string is accepted too.
    #[serde(default, deserialize_with = "deserialize_field_path")]
    pub field: Vec<String>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field.join("."), self.message)
        }
    }
}

/// Outcome of a create or update.
///
/// Mutations never return `Err`: business and transport failures both
/// produce `success: false` with a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductMutationResult {
    pub success: bool,
    pub message: Option<String>,
    pub product: Option<Product>,
    pub user_errors: Vec<UserError>,
}

impl ProductMutationResult {
    pub(crate) const fn succeeded(product: Product) -> Self {
        Self {
            success: true,
            message: None,
            product: Some(product),
            user_errors: Vec::new(),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            product: None,
            user_errors: Vec::new(),
        }
    }

    pub(crate) fn rejected(user_errors: Vec<UserError>) -> Self {
        Self {
            success: false,
            message: Some(join_user_errors(&user_errors)),
            product: None,
            user_errors,
        }
    }
}

/// Outcome of a delete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductDeleteResult {
    pub success: bool,
    pub message: Option<String>,
    pub deleted_product_id: Option<String>,
    pub user_errors: Vec<UserError>,
}

impl ProductDeleteResult {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub(crate) fn rejected(user_errors: Vec<UserError>) -> Self {
        Self {
            success: false,
            message: Some(join_user_errors(&user_errors)),
            deleted_product_id: None,
            user_errors,
        }
    }
}

/// `productCreate` / `productUpdate` payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPayload {
    pub product: Option<Product>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// `productDelete` payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDeletePayload {
    pub deleted_product_id: Option<String>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

fn join_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn deserialize_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Nodes<T> {
        nodes: Vec<T>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NodesOrList<T> {
        Connection(Nodes<T>),
        List(Vec<T>),
    }

    Ok(
        match Option::<NodesOrList<T>>::deserialize(deserializer)? {
            Some(NodesOrList::Connection(c)) => c.nodes,
            Some(NodesOrList::List(list)) => list,
            None => Vec::new(),
        },
    )
}

fn deserialize_field_path<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldPath {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<FieldPath>::deserialize(deserializer)? {
        Some(FieldPath::One(field)) => vec![field],
        Some(FieldPath::Many(fields)) => fields,
        None => Vec::new(),
    })
}
