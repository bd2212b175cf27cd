//! Coaching package offerings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`CoachingPackage`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown coaching package: {0}")]
pub struct PackageError(String);

/// The coaching packages available for purchase.
///
/// A closed set: the purchase form's select options serialize to the
/// display names below, and anything outside the set fails to parse
/// before it reaches a handler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CoachingPackage {
    /// Fundamentals for new players.
    #[serde(rename = "Beginner Boost")]
    BeginnerBoost,
    /// Serve technique intensive.
    #[serde(rename = "Serve Mastery")]
    ServeMastery,
    /// Court movement and positioning.
    #[serde(rename = "Footwork Pro")]
    FootworkPro,
}

impl CoachingPackage {
    /// All packages, in display order for the purchase form.
    pub const ALL: [Self; 3] = [Self::BeginnerBoost, Self::ServeMastery, Self::FootworkPro];

    /// The customer-facing package name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeginnerBoost => "Beginner Boost",
            Self::ServeMastery => "Serve Mastery",
            Self::FootworkPro => "Footwork Pro",
        }
    }
}

impl fmt::Display for CoachingPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CoachingPackage {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| PackageError(s.to_owned()))
    }
}
