//! Maturity levels
//!
//! A capability is scored on a closed 1–4 scale. The newtype makes an
//! out-of-range score unrepresentable once a value has been accepted.

use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability maturity score in `[1, 4]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MaturityLevel(u8);

impl MaturityLevel {
    /// Lowest level: initial
    pub const MIN: Self = Self(1);
    /// Highest level: optimizing
    pub const MAX: Self = Self(4);
    /// Level assigned to every item of a freshly generated catalog
    pub const DEFAULT: Self = Self::MAX;
    /// All levels in ascending order
    pub const ALL: [Self; 4] = [Self(1), Self(2), Self(3), Self(4)];

    /// Create a level, `None` when `value` is outside `[1, 4]`
    #[inline]
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN.0..=Self::MAX.0).contains(v))
            .map(Self)
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Short stage name shown in the legend
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Initial",
            2 => "Developing",
            3 => "Established",
            _ => "Optimizing",
        }
    }

    /// One-line legend description of the stage
    #[must_use]
    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "basic understanding and limited practice",
            2 => "practical application and partial integration",
            3 => "systematic practice and organization-wide rollout",
            _ => "continuous improvement and innovative use",
        }
    }
}

impl Default for MaturityLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for MaturityLevel {
    type Error = MappingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(MappingError::InvalidLevel(value))
    }
}

impl From<MaturityLevel> for u8 {
    fn from(level: MaturityLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_closed_range() {
        for v in 1..=4 {
            assert_eq!(MaturityLevel::new(v).map(MaturityLevel::value), Some(v as u8));
        }
    }

    #[test]
    fn rejects_outside_range() {
        assert!(MaturityLevel::new(0).is_none());
        assert!(MaturityLevel::new(5).is_none());
        assert!(MaturityLevel::new(-1).is_none());
        assert!(MaturityLevel::new(i64::MAX).is_none());
    }

    #[test]
    fn default_is_optimizing() {
        assert_eq!(MaturityLevel::default(), MaturityLevel::MAX);
        assert_eq!(MaturityLevel::DEFAULT.label(), "Optimizing");
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            MaturityLevel::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn serde_as_bare_integer() {
        let level = MaturityLevel::new(3).unwrap();
        assert_eq!(serde_json::to_string(&level).unwrap(), "3");

        let back: MaturityLevel = serde_json::from_str("2").unwrap();
        assert_eq!(back.value(), 2);

        assert!(serde_json::from_str::<MaturityLevel>("7").is_err());
        assert!(serde_json::from_str::<MaturityLevel>("\"2\"").is_err());
    }
}
