//! Pseudo visitor identity derived from an email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A stable pseudo user id for analytics, derived from an email address.
///
/// The site has no real identity system; the analytics service needs a
/// stable `userId`, so one is derived deterministically from the email
/// the visitor submits. The derivation is a 32-bit rolling hash carried
/// over from the original site, kept bit-exact so ids remain stable
/// across deployments:
///
/// ```text
/// acc = (acc << 5) - acc + code_unit   (wrapping, 32-bit signed)
/// id  = "user_" + |acc|
/// ```
///
/// ## Examples
///
/// ```
/// use topspin_core::VisitorId;
///
/// assert!(VisitorId::derive("").is_none());
///
/// let id = VisitorId::derive("jane@x.com").unwrap();
/// assert_eq!(id.as_str(), "user_1238705529");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct VisitorId(String);

impl VisitorId {
    /// Derive a `VisitorId` from an email address.
    ///
    /// Returns `None` for an empty input: there is no identity to
    /// derive.
    ///
    /// The hash runs over UTF-16 code units to stay bit-exact with the
    /// original `charCodeAt`-based derivation. The absolute value is
    /// taken in 64-bit space so `i32::MIN` maps to `2147483648`.
    #[must_use]
    pub fn derive(email: &str) -> Option<Self> {
        if email.is_empty() {
            return None;
        }

        let mut acc: i32 = 0;
        for unit in email.encode_utf16() {
            acc = acc
                .wrapping_shl(5)
                .wrapping_sub(acc)
                .wrapping_add(i32::from(unit));
        }

        Some(Self(format!("user_{}", i64::from(acc).unsigned_abs())))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `VisitorId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VisitorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
