//! Shop selection for a gateway call.

use crate::config::ShopDomain;
use crate::error::ConfigError;

/// Picks the shop a call targets: the caller's explicit choice, else the
/// configured default.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::{ShopDomain, ShopDomainResolver};
///
/// let resolver = ShopDomainResolver::new(Some(ShopDomain::new("default-shop").unwrap()));
///
/// assert_eq!(resolver.resolve(Some("other")).unwrap().as_ref(), "other.myshopify.com");
/// assert_eq!(resolver.resolve(None).unwrap().as_ref(), "default-shop.myshopify.com");
/// assert_eq!(resolver.resolve(Some("  ")).unwrap().as_ref(), "default-shop.myshopify.com");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShopDomainResolver {
    default_shop: Option<ShopDomain>,
}

impl ShopDomainResolver {
    /// Creates a resolver with an optional default shop.
    #[must_use]
    pub const fn new(default_shop: Option<ShopDomain>) -> Self {
        Self { default_shop }
    }

    /// Returns the shop for a call.
    ///
    /// A blank `explicit` value counts as absent.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidShopDomain`] if `explicit` is not a valid shop domain
    /// - [`ConfigError::MissingShopDomain`] if neither `explicit` nor a default is available
    pub fn resolve(&self, explicit: Option<&str>) -> Result<ShopDomain, ConfigError> {
        match explicit.map(str::trim).filter(|shop| !shop.is_empty()) {
            Some(shop) => ShopDomain::new(shop),
            None => self
                .default_shop
                .clone()
                .ok_or(ConfigError::MissingShopDomain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_shop_wins_over_default() {
        let resolver = ShopDomainResolver::new(Some(ShopDomain::new("default").unwrap()));
        let shop = resolver.resolve(Some("s.myshopify.com")).unwrap();
        assert_eq!(shop.as_ref(), "s.myshopify.com");
    }

    #[test]
    fn test_falls_back_to_default() {
        let resolver = ShopDomainResolver::new(Some(ShopDomain::new("default").unwrap()));
        assert_eq!(
            resolver.resolve(None).unwrap().as_ref(),
            "default.myshopify.com"
        );
        assert_eq!(
            resolver.resolve(Some("")).unwrap().as_ref(),
            "default.myshopify.com"
        );
    }

    #[test]
    fn test_fails_without_explicit_or_default() {
        let resolver = ShopDomainResolver::default();
        assert_eq!(resolver.resolve(None), Err(ConfigError::MissingShopDomain));
        assert_eq!(
            resolver.resolve(Some("   ")),
            Err(ConfigError::MissingShopDomain)
        );
    }

    #[test]
    fn test_invalid_explicit_shop_is_rejected() {
        let resolver = ShopDomainResolver::new(Some(ShopDomain::new("default").unwrap()));
        assert!(matches!(
            resolver.resolve(Some("evil.example.com")),
            Err(ConfigError::InvalidShopDomain { .. })
        ));
    }
}
