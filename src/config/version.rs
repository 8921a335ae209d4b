//! Admin API version handling.
//!
//! The version is the dated path segment of the GraphQL endpoint:
//! `/admin/api/{version}/graphql.json`.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// Shopify releases a stable version every quarter (January, April, July,
/// October), each supported for roughly twelve months. `Unstable` always
/// sorts after every stable release.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::ApiVersion;
///
/// let version: ApiVersion = "2025-10".parse().unwrap();
/// assert_eq!(version.to_string(), "2025-10");
/// assert!(version < ApiVersion::Unstable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// A quarterly stable release.
    Stable {
        /// Release year.
        year: u16,
        /// Release month: 1, 4, 7 or 10.
        month: u8,
    },
    /// The unstable version, for development only.
    Unstable,
}

impl ApiVersion {
    /// The newest stable release this crate has been exercised against.
    pub const LATEST: Self = Self::Stable {
        year: 2026,
        month: 10,
    };

    /// The oldest release still inside Shopify's support window.
    pub const MINIMUM_SUPPORTED: Self = Self::Stable {
        year: 2025,
        month: 10,
    };

    /// Returns the latest stable API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::LATEST
    }

    /// Returns `true` for quarterly releases, `false` for `Unstable`.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }

    /// Returns `true` if this version is older than the support window.
    ///
    /// Requests against a deprecated version may start failing at any time.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.is_stable() && *self < Self::MINIMUM_SUPPORTED
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Unstable => f.write_str("unstable"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "unstable" {
            return Ok(Self::Unstable);
        }

        let invalid = || ConfigError::InvalidApiVersion { version: s.clone() };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: u16 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        if !matches!(month, 1 | 4 | 7 | 10) {
            return Err(invalid());
        }

        Ok(Self::Stable { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_quarterly_versions() {
        let version: ApiVersion = "2025-04".parse().unwrap();
        assert_eq!(
            version,
            ApiVersion::Stable {
                year: 2025,
                month: 4
            }
        );
        assert_eq!(version.to_string(), "2025-04");
    }

    #[test]
    fn test_parses_unstable_case_insensitively() {
        assert_eq!(
            " Unstable ".parse::<ApiVersion>().unwrap(),
            ApiVersion::Unstable
        );
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for raw in ["2025-02", "25-01", "2025-1", "latest", "2025/01", ""] {
            assert!(
                matches!(
                    raw.parse::<ApiVersion>(),
                    Err(ConfigError::InvalidApiVersion { .. })
                ),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_ordering_is_chronological_with_unstable_last() {
        let older: ApiVersion = "2024-10".parse().unwrap();
        let newer: ApiVersion = "2025-01".parse().unwrap();
        assert!(older < newer);
        assert!(ApiVersion::latest() < ApiVersion::Unstable);
    }

    #[test]
    fn test_deprecation_window() {
        let old: ApiVersion = "2024-01".parse().unwrap();
        assert!(old.is_deprecated());
        assert!(!ApiVersion::latest().is_deprecated());
        assert!(!ApiVersion::Unstable.is_deprecated());
    }

    #[test]
    fn test_default_is_latest() {
        assert_eq!(ApiVersion::default(), ApiVersion::latest());
        assert!(ApiVersion::latest().is_stable());
    }
}
