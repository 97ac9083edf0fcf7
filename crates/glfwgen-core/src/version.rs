//! GLFW release versions
//!
//! A version is either one of the published GLFW 3.x releases or an
//! arbitrary caller-supplied token (for custom builds or releases newer
//! than this crate). Custom versions are interned through an explicit
//! [`VersionCache`] so equal tokens share one allocation; the cache is an
//! ordinary value with no global state, created once per process or per
//! composer by the owner.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Published GLFW 3.x releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Release {
    V3_0_0,
    V3_0_1,
    V3_0_2,
    V3_0_3,
    V3_0_4,
    V3_1_0,
    V3_1_1,
    V3_1_2,
    V3_2_0,
    V3_2_1,
    V3_3_0,
    V3_3_1,
    V3_3_2,
    V3_3_3,
    V3_3_4,
    V3_3_5,
    V3_3_6,
}

impl Release {
    /// Latest published release
    pub const LATEST: Release = Release::V3_3_6;

    /// Latest release of each minor series
    pub const V3_3: Release = Release::V3_3_6;
    pub const V3_2: Release = Release::V3_2_1;
    pub const V3_1: Release = Release::V3_1_2;
    pub const V3_0: Release = Release::V3_0_4;

    /// All published releases, oldest first
    pub const ALL: [Release; 17] = [
        Release::V3_0_0,
        Release::V3_0_1,
        Release::V3_0_2,
        Release::V3_0_3,
        Release::V3_0_4,
        Release::V3_1_0,
        Release::V3_1_1,
        Release::V3_1_2,
        Release::V3_2_0,
        Release::V3_2_1,
        Release::V3_3_0,
        Release::V3_3_1,
        Release::V3_3_2,
        Release::V3_3_3,
        Release::V3_3_4,
        Release::V3_3_5,
        Release::V3_3_6,
    ];

    /// Dotted-triple form, e.g. `"3.3.6"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Release::V3_0_0 => "3.0.0",
            Release::V3_0_1 => "3.0.1",
            Release::V3_0_2 => "3.0.2",
            Release::V3_0_3 => "3.0.3",
            Release::V3_0_4 => "3.0.4",
            Release::V3_1_0 => "3.1.0",
            Release::V3_1_1 => "3.1.1",
            Release::V3_1_2 => "3.1.2",
            Release::V3_2_0 => "3.2.0",
            Release::V3_2_1 => "3.2.1",
            Release::V3_3_0 => "3.3.0",
            Release::V3_3_1 => "3.3.1",
            Release::V3_3_2 => "3.3.2",
            Release::V3_3_3 => "3.3.3",
            Release::V3_3_4 => "3.3.4",
            Release::V3_3_5 => "3.3.5",
            Release::V3_3_6 => "3.3.6",
        }
    }

    /// Look up a release by its dotted-triple form
    pub fn from_token(token: &str) -> Option<Release> {
        Release::ALL.iter().copied().find(|r| r.as_str() == token)
    }
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GLFW version: a known release or an arbitrary token
///
/// Custom tokens are accepted verbatim and never rejected; the version's
/// primary job is locating template headers on disk, not validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Known(Release),
    Custom(Arc<str>),
}

impl Version {
    /// Latest published release
    pub const LATEST: Version = Version::Known(Release::LATEST);

    /// Resolve a token without an interning cache
    ///
    /// Known release strings become [`Version::Known`]; anything else is a
    /// freshly allocated [`Version::Custom`] preserving the literal.
    pub fn parse(token: &str) -> Version {
        match Release::from_token(token) {
            Some(release) => Version::Known(release),
            None => Version::Custom(Arc::from(token)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Version::Known(release) => release.as_str(),
            Version::Custom(token) => token,
        }
    }

    /// Compare two versions
    ///
    /// Numeric dotted-triple comparison when both sides parse as `N.N.N`,
    /// lexicographic string comparison otherwise. The fallback misorders
    /// tokens like `"3.10-dev"` against `"3.9-dev"`; custom versions are
    /// only ordered when a caller sorts them explicitly, so this matches
    /// the upstream behavior rather than papering over it.
    pub fn compare(&self, other: &Version) -> Ordering {
        match (parse_triple(self.as_str()), parse_triple(other.as_str())) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.as_str().cmp(other.as_str()),
        }
    }
}

impl From<Release> for Version {
    fn from(release: Release) -> Self {
        Version::Known(release)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_triple(s: &str) -> Option<(u64, u64, u64)> {
    let mut parts = s.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// Interning cache for custom versions
///
/// Repeated resolution of the same unknown token yields versions sharing
/// one string allocation. Known release tokens bypass the cache entirely.
#[derive(Debug, Default)]
pub struct VersionCache {
    interned: HashMap<String, Version>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a token to a version, interning unknown tokens
    ///
    /// Never fails: unknown tokens are accepted verbatim.
    pub fn resolve(&mut self, token: &str) -> Version {
        if let Some(release) = Release::from_token(token) {
            return Version::Known(release);
        }
        self.interned
            .entry(token.to_string())
            .or_insert_with(|| Version::Custom(Arc::from(token)))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_versions_round_trip() {
        let mut cache = VersionCache::new();
        for release in Release::ALL {
            let resolved = cache.resolve(release.as_str());
            assert_eq!(resolved, Version::Known(release));
            assert_eq!(resolved.as_str(), release.as_str());
        }
    }

    #[test]
    fn test_custom_versions_preserve_literal() {
        let mut cache = VersionCache::new();
        for token in ["3.4.0", "custom-build", "3.3.6-rc1"] {
            let resolved = cache.resolve(token);
            assert!(matches!(resolved, Version::Custom(_)));
            assert_eq!(resolved.as_str(), token);
        }
    }

    #[test]
    fn test_custom_versions_are_interned() {
        let mut cache = VersionCache::new();
        let a = cache.resolve("3.4.0");
        let b = cache.resolve("3.4.0");
        match (&a, &b) {
            (Version::Custom(a), Version::Custom(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected custom versions"),
        }
    }

    #[test]
    fn test_numeric_triple_comparison() {
        let a = Version::parse("3.9.0");
        let b = Version::parse("3.10.0");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            Version::parse("3.3.6").compare(&Version::parse("3.3.6")),
            Ordering::Equal
        );
        assert_eq!(
            Version::from(Release::V3_2_1).compare(&Version::from(Release::V3_0_4)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_lexicographic_fallback() {
        // Non-triple tokens fall back to string ordering, which misorders
        // multi-digit components. Known limitation, kept deliberately.
        let a = Version::parse("3.10-dev");
        let b = Version::parse("3.9-dev");
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_latest_alias() {
        assert_eq!(Release::LATEST, Release::V3_3_6);
        assert_eq!(Release::V3_2, Release::V3_2_1);
        assert_eq!(Version::LATEST.as_str(), "3.3.6");
    }
}
