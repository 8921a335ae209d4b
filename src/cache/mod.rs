//! In-memory access token cache.
//!
//! [`TokenCache`] maps a shop domain to the last token issued for it and the
//! instant that token expires. Freshness is decided lazily on every read:
//! a token is only handed out while more than the buffer window remains
//! before its expiry, so a request never leaves with a token that is about
//! to lapse in transit.
//!
//! Entries never expire by themselves. A stale entry stays in the map until
//! the next [`set`](TokenCache::set) replaces it or [`clear`](TokenCache::clear)
//! removes it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shopify_gateway::cache::{ManualClock, TokenCache};
//! use shopify_gateway::ShopDomain;
//!
//! let clock = Arc::new(ManualClock::default());
//! let cache = TokenCache::with_clock(clock.clone());
//! let shop = ShopDomain::new("s").unwrap();
//!
//! cache.set(&shop, "tok123", 3600);
//! assert_eq!(cache.get(&shop, Duration::from_secs(60)).as_deref(), Some("tok123"));
//!
//! clock.advance(chrono::Duration::seconds(3545));
//! assert_eq!(cache.get(&shop, Duration::from_secs(60)), None);
//! ```

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::ShopDomain;

/// Safety margin applied by [`TokenCache::get_fresh`].
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Upper bound on a stored TTL, so a nonsensical `expires_in` cannot overflow
/// the expiry instant. Ten years.
const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// A cached token for one shop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// The shop the token was issued for.
    pub shop_domain: ShopDomain,
    /// The access token.
    pub token: String,
    /// When the upstream provider considers the token expired.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Returns `true` if more than `buffer` remains before expiry at `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        // A negative remainder fails the conversion and counts as stale
        (self.expires_at - now)
            .to_std()
            .map_or(false, |remaining| remaining > buffer)
    }
}

/// Shop-keyed access token cache.
///
/// All methods take `&self`; the map sits behind an `RwLock` and every write is
/// a whole-entry replacement, so concurrent readers never observe a
/// half-updated entry.
#[derive(Debug)]
pub struct TokenCache {
    entries: RwLock<HashMap<ShopDomain, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

// Verify TokenCache is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenCache>();
};

impl TokenCache {
    /// Creates an empty cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the cached token for `shop` if more than `buffer` remains
    /// before it expires.
    ///
    /// Stale entries are left in place.
    #[must_use]
    pub fn get(&self, shop: &ShopDomain, buffer: Duration) -> Option<String> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(shop)
            .filter(|entry| entry.is_fresh_at(now, buffer))
            .map(|entry| entry.token.clone())
    }

    /// [`get`](Self::get) with the default 60 second buffer.
    #[must_use]
    pub fn get_fresh(&self, shop: &ShopDomain) -> Option<String> {
        self.get(shop, DEFAULT_EXPIRY_BUFFER)
    }

    /// Stores `token` for `shop`, expiring `expires_in_seconds` from now.
    ///
    /// Any previous entry for the shop is replaced outright.
    pub fn set(&self, shop: &ShopDomain, token: impl Into<String>, expires_in_seconds: u64) {
        let ttl = i64::try_from(expires_in_seconds.min(MAX_TTL_SECONDS)).unwrap_or_default();
        let entry = CacheEntry {
            shop_domain: shop.clone(),
            token: token.into(),
            expires_at: self.clock.now() + chrono::Duration::seconds(ttl),
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shop.clone(), entry);
    }

    /// Removes the entry for `shop`, or every entry when `shop` is `None`.
    pub fn clear(&self, shop: Option<&ShopDomain>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match shop {
            Some(shop) => {
                entries.remove(shop);
            }
            None => entries.clear(),
        }
    }

    /// Returns the expiry instant recorded for `shop`, fresh or not.
    #[must_use]
    pub fn expires_at(&self, shop: &ShopDomain) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shop)
            .map(|entry| entry.expires_at)
    }

    /// Returns the number of entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock() -> (TokenCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (TokenCache::with_clock(clock.clone()), clock)
    }

    fn shop(name: &str) -> ShopDomain {
        ShopDomain::new(name).unwrap()
    }

    #[test]
    fn test_fresh_token_is_returned() {
        let (cache, _clock) = cache_with_clock();
        let shop = shop("s.myshopify.com");

        cache.set(&shop, "tok123", 3600);

        assert_eq!(
            cache.get(&shop, Duration::from_millis(60_000)),
            Some("tok123".to_string())
        );
    }

    #[test]
    fn test_token_inside_buffer_window_is_absent() {
        let (cache, clock) = cache_with_clock();
        let shop = shop("s.myshopify.com");

        cache.set(&shop, "tok123", 3600);
        clock.advance(chrono::Duration::milliseconds(3_545_000));

        // 55s remain, less than the 60s buffer
        assert_eq!(cache.get(&shop, Duration::from_millis(60_000)), None);
        // ...but the entry itself is still there
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&shop, Duration::from_millis(50_000)),
            Some("tok123".to_string())
        );
    }

    #[test]
    fn test_freshness_boundary_is_strict() {
        let (cache, clock) = cache_with_clock();
        let shop = shop("s");

        cache.set(&shop, "tok", 120);
        clock.advance(chrono::Duration::seconds(60));

        // remaining == buffer is not enough
        assert_eq!(cache.get(&shop, Duration::from_secs(60)), None);
        assert_eq!(
            cache.get(&shop, Duration::from_secs(59)),
            Some("tok".to_string())
        );
    }

    #[test]
    fn test_freshness_law_over_elapsed_times() {
        let ttl_ms: i64 = 3_600_000;
        let buffer_ms: i64 = 60_000;

        for elapsed_ms in [0, 1_000, 3_539_999, 3_540_000, 3_545_000, 3_600_000, 4_000_000] {
            let (cache, clock) = cache_with_clock();
            let shop = shop("s");
            cache.set(&shop, "tok", 3600);
            clock.advance(chrono::Duration::milliseconds(elapsed_ms));

            let expected = ttl_ms - elapsed_ms > buffer_ms;
            let got = cache.get(&shop, Duration::from_millis(60_000)).is_some();
            assert_eq!(got, expected, "elapsed {elapsed_ms}ms");
        }
    }

    #[test]
    fn test_clear_one_shop_forces_miss() {
        let (cache, _clock) = cache_with_clock();
        let a = shop("a");
        let b = shop("b");

        cache.set(&a, "tok-a", 3600);
        cache.set(&b, "tok-b", 3600);
        cache.clear(Some(&a));

        assert_eq!(cache.get(&a, Duration::ZERO), None);
        assert_eq!(cache.get(&b, Duration::ZERO), Some("tok-b".to_string()));
    }

    #[test]
    fn test_clear_all_empties_cache() {
        let (cache, _clock) = cache_with_clock();
        cache.set(&shop("a"), "tok-a", 3600);
        cache.set(&shop("b"), "tok-b", 3600);

        cache.clear(None);

        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_replaces_previous_entry() {
        let (cache, clock) = cache_with_clock();
        let shop = shop("s");

        cache.set(&shop, "old", 3600);
        let first_expiry = cache.expires_at(&shop).unwrap();
        clock.advance(chrono::Duration::seconds(10));
        cache.set(&shop, "new", 100);

        assert_eq!(cache.get_fresh(&shop), Some("new".to_string()));
        assert!(cache.expires_at(&shop).unwrap() < first_expiry);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let (cache, _clock) = cache_with_clock();
        let shop = shop("s");
        cache.set(&shop, "tok", 0);
        assert_eq!(cache.get(&shop, Duration::ZERO), None);
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let (cache, _clock) = cache_with_clock();
        let shop = shop("s");
        cache.set(&shop, "tok", u64::MAX);
        assert_eq!(cache.get_fresh(&shop), Some("tok".to_string()));
    }

    #[test]
    fn test_unknown_shop_is_a_miss() {
        let cache = TokenCache::new();
        assert_eq!(cache.get_fresh(&shop("nobody")), None);
        assert!(cache.expires_at(&shop("nobody")).is_none());
    }
}
