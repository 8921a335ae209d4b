//! Admin GraphQL documents used by [`ProductService`](super::ProductService).

/// Maximum page size Shopify accepts for a connection.
pub const MAX_PAGE_SIZE: u32 = 250;

macro_rules! product_fields {
    () => {
        r"
fragment ProductFields on Product {
  id
  title
  handle
  status
  descriptionHtml
  vendor
  productType
  tags
  totalInventory
  createdAt
  updatedAt
  variants(first: 10) {
    nodes {
      id
      title
      price
      sku
      inventoryQuantity
    }
  }
}
"
    };
}

/// Paginated product listing; `$query` is Shopify's search syntax.
pub const PRODUCTS_QUERY: &str = concat!(
    r"
query Products($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    nodes {
      ...ProductFields
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
  }
}
",
    product_fields!()
);

/// Single product by GID.
pub const PRODUCT_QUERY: &str = concat!(
    r"
query Product($id: ID!) {
  product(id: $id) {
    ...ProductFields
  }
}
",
    product_fields!()
);

/// Creates a product.
pub const PRODUCT_CREATE_MUTATION: &str = concat!(
    r"
mutation ProductCreate($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      ...ProductFields
    }
    userErrors {
      field
      message
    }
  }
}
",
    product_fields!()
);

/// Updates a product; the input carries the product `id`.
pub const PRODUCT_UPDATE_MUTATION: &str = concat!(
    r"
mutation ProductUpdate($product: ProductUpdateInput!) {
  productUpdate(product: $product) {
    product {
      ...ProductFields
    }
    userErrors {
      field
      message
    }
  }
}
",
    product_fields!()
);

/// Deletes a product.
pub const PRODUCT_DELETE_MUTATION: &str = r"
mutation ProductDelete($input: ProductDeleteInput!) {
  productDelete(input: $input) {
    deletedProductId
    userErrors {
      field
      message
    }
  }
}
";
