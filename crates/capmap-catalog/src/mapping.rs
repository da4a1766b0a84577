//! Imported name → level mappings
//!
//! [`ImportMapping`] is the unit exchanged between the record parser, the
//! reconciler and the persistence store. Every value is a [`MaturityLevel`],
//! so a mapping that exists is valid by construction. [`RawMapping`] models
//! the untrusted shape before that check.

use crate::error::MappingError;
use crate::level::MaturityLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Untrusted capability name → integer level mapping
pub type RawMapping = BTreeMap<String, i64>;

/// Returns `true` iff every value of `raw` is an integer in `[1, 4]`
///
/// An empty mapping is valid.
#[must_use]
pub fn is_valid(raw: &RawMapping) -> bool {
    raw.values().all(|&level| MaturityLevel::new(level).is_some())
}

/// Validated capability name → maturity level mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportMapping {
    entries: BTreeMap<String, MaturityLevel>,
}

impl ImportMapping {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name -> level`, returning the level it replaced
    pub fn insert(&mut self, name: impl Into<String>, level: MaturityLevel) -> Option<MaturityLevel> {
        self.entries.insert(name.into(), level)
    }

    /// Level recorded for `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<MaturityLevel> {
        self.entries.get(name).copied()
    }

    /// Whether `name` has a recorded level
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, MaturityLevel)> + '_ {
        self.entries.iter().map(|(name, &level)| (name.as_str(), level))
    }

    /// Iterate names in order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Widen back to the untrusted representation
    #[must_use]
    pub fn to_raw(&self) -> RawMapping {
        self.entries
            .iter()
            .map(|(name, level)| (name.clone(), i64::from(level.value())))
            .collect()
    }
}

impl TryFrom<RawMapping> for ImportMapping {
    type Error = MappingError;

    fn try_from(raw: RawMapping) -> Result<Self, Self::Error> {
        let mut mapping = Self::new();
        for (name, level) in raw {
            let Some(valid) = MaturityLevel::new(level) else {
                return Err(MappingError::LevelOutOfRange { name, level });
            };
            mapping.insert(name, valid);
        }
        Ok(mapping)
    }
}

impl FromIterator<(String, MaturityLevel)> for ImportMapping {
    fn from_iter<I: IntoIterator<Item = (String, MaturityLevel)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ImportMapping {
    type Item = (&'a String, &'a MaturityLevel);
    type IntoIter = std::collections::btree_map::Iter<'a, String, MaturityLevel>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
