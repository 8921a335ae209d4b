//! Product read and write operations over the GraphQL gateway.
//!
//! Reads return a [`GatewayResult`]. Mutations always return a result object
//! with a `success` flag; Shopify `userErrors` and gateway failures both end
//! up there instead of in an `Err`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_gateway::products::{ProductInput, ProductService};
//!
//! let products = ProductService::new(Arc::new(gateway));
//!
//! let page = products.list_products(None, 20, None).await?;
//! for product in &page.products {
//!     println!("{} {}", product.id, product.title);
//! }
//!
//! let created = products
//!     .create_product(
//!         &ProductInput { title: Some("Hat".to_string()), ..ProductInput::default() },
//!         None,
//!     )
//!     .await;
//! if !created.success {
//!     eprintln!("create failed: {:?}", created.message);
//! }
//! ```

pub mod queries;
mod types;

pub use types::{
    PageInfo, Product, ProductConnection, ProductDeleteResult, ProductInput,
    ProductMutationResult, ProductStatus, ProductVariant, UserError,
};

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::error::ConfigError;
use crate::gateway::{GatewayError, GatewayResult, GraphqlGateway};
use queries::{
    MAX_PAGE_SIZE, PRODUCTS_QUERY, PRODUCT_CREATE_MUTATION, PRODUCT_DELETE_MUTATION,
    PRODUCT_QUERY, PRODUCT_UPDATE_MUTATION,
};
use types::{ProductDeletePayload, ProductPayload};

const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// Returns the GID for a product id. Numeric ids are expanded; anything else
/// is passed through trimmed.
///
/// ```rust
/// use shopify_gateway::products::product_gid;
///
/// assert_eq!(product_gid("123"), "gid://shopify/Product/123");
/// assert_eq!(product_gid("gid://shopify/Product/123"), "gid://shopify/Product/123");
/// ```
#[must_use]
pub fn product_gid(id: &str) -> String {
    let id = id.trim();
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        format!("{PRODUCT_GID_PREFIX}{id}")
    } else {
        id.to_string()
    }
}

#[derive(Deserialize)]
struct ProductsData {
    products: ProductConnection,
}

#[derive(Deserialize)]
struct ProductData {
    product: Option<Product>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductCreateData {
    product_create: Option<ProductPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductUpdateData {
    product_update: Option<ProductPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDeleteData {
    product_delete: Option<ProductDeletePayload>,
}

/// Product operations for one or more shops.
#[derive(Clone, Debug)]
pub struct ProductService {
    gateway: Arc<GraphqlGateway>,
}

impl ProductService {
    /// Creates a service over a shared gateway.
    #[must_use]
    pub const fn new(gateway: Arc<GraphqlGateway>) -> Self {
        Self { gateway }
    }

    /// Returns the underlying gateway.
    #[must_use]
    pub fn gateway(&self) -> &GraphqlGateway {
        &self.gateway
    }

    /// Lists products, `first` per page (clamped to 1..=250).
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`] from the underlying call.
    pub async fn list_products(
        &self,
        shop: Option<&str>,
        first: u32,
        after: Option<&str>,
    ) -> GatewayResult<ProductConnection> {
        self.fetch_page(shop, None, first, after).await
    }

    /// Searches products with Shopify's query syntax, e.g. `title:hat*`.
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`] from the underlying call.
    pub async fn search_products(
        &self,
        query: &str,
        shop: Option<&str>,
        first: u32,
        after: Option<&str>,
    ) -> GatewayResult<ProductConnection> {
        self.fetch_page(shop, Some(query), first, after).await
    }

    /// Fetches one product. Returns `Ok(None)` if Shopify has no such product.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Config`] if `id` is blank
    /// - any other [`GatewayError`] from the underlying call
    pub async fn get_product(&self, id: &str, shop: Option<&str>) -> GatewayResult<Option<Product>> {
        let gid = product_gid(id);
        if gid.is_empty() {
            return Err(GatewayError::Config(ConfigError::InvalidValue {
                field: "id",
                value: id.to_string(),
                reason: "product id must not be empty".to_string(),
            }));
        }

        let data: ProductData = self
            .gateway
            .execute_as(shop, PRODUCT_QUERY, Some(json!({ "id": gid })))
            .await?;
        Ok(data.product)
    }

    /// Creates a product. A blank title is rejected without calling Shopify.
    pub async fn create_product(
        &self,
        fields: &ProductInput,
        shop: Option<&str>,
    ) -> ProductMutationResult {
        if !fields.has_title() {
            return ProductMutationResult::failed("Product title is required");
        }

        let result = self
            .gateway
            .execute_as::<ProductCreateData>(
                shop,
                PRODUCT_CREATE_MUTATION,
                Some(json!({ "product": fields })),
            )
            .await
            .map(|data| data.product_create);

        Self::mutation_result("productCreate", result)
    }

    /// Updates the fields set in `fields`.
    pub async fn update_product(
        &self,
        id: &str,
        fields: &ProductInput,
        shop: Option<&str>,
    ) -> ProductMutationResult {
        let gid = product_gid(id);
        if gid.is_empty() {
            return ProductMutationResult::failed("Product id is required");
        }

        let mut product = json!(fields);
        product["id"] = json!(gid);

        let result = self
            .gateway
            .execute_as::<ProductUpdateData>(
                shop,
                PRODUCT_UPDATE_MUTATION,
                Some(json!({ "product": product })),
            )
            .await
            .map(|data| data.product_update);

        Self::mutation_result("productUpdate", result)
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: &str, shop: Option<&str>) -> ProductDeleteResult {
        let gid = product_gid(id);
        if gid.is_empty() {
            return ProductDeleteResult::failed("Product id is required");
        }

        let result = self
            .gateway
            .execute_as::<ProductDeleteData>(
                shop,
                PRODUCT_DELETE_MUTATION,
                Some(json!({ "input": { "id": gid } })),
            )
            .await;

        match result {
            Err(e) => {
                tracing::warn!(kind = %e.kind(), "productDelete failed: {e}");
                ProductDeleteResult::failed(e.to_string())
            }
            Ok(ProductDeleteData {
                product_delete: None,
            }) => ProductDeleteResult::failed("productDelete returned no payload"),
            Ok(ProductDeleteData {
                product_delete: Some(payload),
            }) => {
                if !payload.user_errors.is_empty() {
                    return ProductDeleteResult::rejected(payload.user_errors);
                }
                ProductDeleteResult {
                    success: true,
                    message: None,
                    deleted_product_id: payload.deleted_product_id,
                    user_errors: Vec::new(),
                }
            }
        }
    }

    async fn fetch_page(
        &self,
        shop: Option<&str>,
        query: Option<&str>,
        first: u32,
        after: Option<&str>,
    ) -> GatewayResult<ProductConnection> {
        let variables = json!({
            "first": first.clamp(1, MAX_PAGE_SIZE),
            "after": after,
            "query": query,
        });

        let data: ProductsData = self
            .gateway
            .execute_as(shop, PRODUCTS_QUERY, Some(variables))
            .await?;
        Ok(data.products)
    }

    fn mutation_result(
        operation: &str,
        result: GatewayResult<Option<ProductPayload>>,
    ) -> ProductMutationResult {
        match result {
            Err(e) => {
                tracing::warn!(kind = %e.kind(), "{operation} failed: {e}");
                ProductMutationResult::failed(e.to_string())
            }
            Ok(None) => ProductMutationResult::failed(format!("{operation} returned no payload")),
            Ok(Some(payload)) if !payload.user_errors.is_empty() => {
                ProductMutationResult::rejected(payload.user_errors)
            }
            Ok(Some(ProductPayload {
                product: Some(product),
                ..
            })) => ProductMutationResult::succeeded(product),
            Ok(Some(_)) => {
                ProductMutationResult::failed(format!("{operation} returned no product"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_gid_normalization() {
        assert_eq!(product_gid("42"), "gid://shopify/Product/42");
        assert_eq!(product_gid(" 42 "), "gid://shopify/Product/42");
        assert_eq!(
            product_gid("gid://shopify/Product/42"),
            "gid://shopify/Product/42"
        );
        assert_eq!(product_gid(""), "");
        assert_eq!(product_gid("abc"), "abc");
    }

    #[test]
    fn test_mutation_result_prefers_user_errors() {
        let result = ProductService::mutation_result(
            "productCreate",
            Ok(Some(ProductPayload {
                product: None,
                user_errors: vec![UserError {
                    field: vec!["title".to_string()],
                    message: "required".to_string(),
                }],
            })),
        );

        assert!(!result.success);
        assert!(result.product.is_none());
        assert!(result.message.unwrap().contains("required"));
    }

    #[test]
    fn test_mutation_result_maps_gateway_error() {
        let result = ProductService::mutation_result(
            "productUpdate",
            Err(GatewayError::Config(ConfigError::MissingShopDomain)),
        );

        assert!(!result.success);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_mutation_result_without_payload() {
        let result = ProductService::mutation_result("productCreate", Ok(None));
        assert!(!result.success);
        assert_eq!(
            result.message.as_deref(),
            Some("productCreate returned no payload")
        );
    }
}
