//! Catalog structure and the built-in definition
//!
//! A [`CatalogDefinition`] is static configuration: the ordered categories
//! and item names shown on the heat-map. A [`Catalog`] is the scored view of
//! a definition, rebuilt whenever levels change.

use crate::error::CatalogError;
use crate::level::MaturityLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Header row written by [`Catalog::to_sample_csv`]
pub const SAMPLE_HEADER: &str = "capability,level";

/// One scored capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityItem {
    /// Display name, unique within its category
    pub name: String,
    /// Current maturity level
    pub level: MaturityLevel,
}

impl CapabilityItem {
    /// Create item
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, level: MaturityLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Labelled group of capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCategory {
    /// Category label
    pub category: String,
    /// Items in display order
    pub items: Vec<CapabilityItem>,
}

/// Ordered list of scored categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<CapabilityCategory>,
}

impl Catalog {
    /// Wrap categories as-is
    #[inline]
    #[must_use]
    pub fn new(categories: Vec<CapabilityCategory>) -> Self {
        Self { categories }
    }

    /// Categories in display order
    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[CapabilityCategory] {
        &self.categories
    }

    /// All items across categories, in display order
    pub fn items(&self) -> impl Iterator<Item = &CapabilityItem> + '_ {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Total item count
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Level of the first item named `name`
    #[must_use]
    pub fn level_of(&self, name: &str) -> Option<MaturityLevel> {
        self.items().find(|item| item.name == name).map(|item| item.level)
    }

    /// Whether any category holds an item named `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items().any(|item| item.name == name)
    }

    /// Render the catalog in the import file format
    ///
    /// The first line is [`SAMPLE_HEADER`]; each following line is
    /// `<name>,<level>` in display order.
    #[must_use]
    pub fn to_sample_csv(&self) -> String {
        let mut out = String::with_capacity(32 * (self.item_count() + 1));
        out.push_str(SAMPLE_HEADER);
        out.push('\n');
        for item in self.items() {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{},{}", item.name, item.level);
        }
        out
    }
}

/// Unscored category: a label and its item names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category label
    pub label: String,
    /// Item names in display order
    pub items: Vec<String>,
}

impl CategorySpec {
    /// Create category spec
    #[must_use]
    pub fn new<I, S>(label: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fixed catalog layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    /// Categories in display order
    pub categories: Vec<CategorySpec>,
}

const DEVOPS: &[(&str, &[&str])] = &[
    (
        "Culture & Organization",
        &[
            "Cross-functional collaboration",
            "Continuous learning and improvement",
            "Learning from failure",
            "Data-driven decision making",
            "Adaptability to change",
        ],
    ),
    (
        "Process",
        &[
            "Agile development",
            "CI/CD",
            "Continuous deployment",
            "IaC",
            "Configuration management",
            "Release management",
        ],
    ),
    (
        "Technology",
        &[
            "Version control",
            "Automation tooling",
            "Containerization",
            "Orchestration",
            "Cloud adoption",
            "Microservices",
        ],
    ),
    (
        "Monitoring",
        &[
            "Application monitoring",
            "Infrastructure monitoring",
            "Log analysis",
            "Performance management",
            "Security monitoring",
            "Incident management",
        ],
    ),
    (
        "Security",
        &[
            "Security test automation",
            "Vulnerability scanning",
            "Compliance",
            "Access control",
            "Secrets management",
            "Secure coding",
        ],
    ),
    (
        "Quality Assurance",
        &[
            "Test automation",
            "Code quality management",
            "Performance testing",
            "Security testing",
            "UAT",
            "Chaos engineering",
        ],
    ),
    (
        "Metrics",
        &[
            "Deployment frequency",
            "Lead time",
            "MTTR",
            "Change failure rate",
            "SLO management",
            "Feedback analysis",
        ],
    ),
];

impl CatalogDefinition {
    /// Create definition from category specs
    #[inline]
    #[must_use]
    pub fn new(categories: Vec<CategorySpec>) -> Self {
        Self { categories }
    }

    /// Built-in DevOps capability catalog
    #[must_use]
    pub fn devops() -> Self {
        Self::new(
            DEVOPS
                .iter()
                .map(|(label, items)| CategorySpec::new(*label, items.iter().copied()))
                .collect(),
        )
    }

    /// Check labels are present and item names are unique per category
    ///
    /// # Errors
    /// - `CatalogError::EmptyCategoryLabel` for a blank label
    /// - `CatalogError::EmptyItemName` for a blank item name
    /// - `CatalogError::DuplicateItem` when a category repeats a name
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (index, category) in self.categories.iter().enumerate() {
            if category.label.trim().is_empty() {
                return Err(CatalogError::EmptyCategoryLabel { index });
            }
            let mut seen = HashSet::with_capacity(category.items.len());
            for item in &category.items {
                if item.trim().is_empty() {
                    return Err(CatalogError::EmptyItemName {
                        category: category.label.clone(),
                    });
                }
                if !seen.insert(item.as_str()) {
                    return Err(CatalogError::DuplicateItem {
                        category: category.label.clone(),
                        item: item.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Baseline catalog with every item at [`MaturityLevel::DEFAULT`]
    ///
    /// Used on first run and after a reset.
    #[must_use]
    pub fn generate_default(&self) -> Catalog {
        Catalog::new(
            self.categories
                .iter()
                .map(|spec| CapabilityCategory {
                    category: spec.label.clone(),
                    items: spec
                        .items
                        .iter()
                        .map(|name| CapabilityItem::new(name.clone(), MaturityLevel::DEFAULT))
                        .collect(),
                })
                .collect(),
        )
    }

    /// Total number of item names
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

impl Default for CatalogDefinition {
    fn default() -> Self {
        Self::devops()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn devops_definition_is_valid() {
        let def = CatalogDefinition::devops();
        assert!(def.validate().is_ok());
        assert_eq!(def.categories.len(), 7);
        assert_eq!(def.item_count(), 41);
        assert_eq!(def.categories[1].label, "Process");
        assert_eq!(def.categories[1].items[1], "CI/CD");
    }

    #[test]
    fn generate_default_uses_level_four() {
        let catalog = CatalogDefinition::devops().generate_default();
        assert_eq!(catalog.item_count(), 41);
        assert!(catalog.items().all(|i| i.level == MaturityLevel::MAX));
    }

    #[test]
    fn generate_default_is_deterministic() {
        let def = CatalogDefinition::devops();
        assert_eq!(def.generate_default(), def.generate_default());
    }

    #[test]
    fn validate_rejects_duplicates_within_category() {
        let def = CatalogDefinition::new(vec![CategorySpec::new("Process", ["IaC", "CI/CD", "IaC"])]);
        assert_eq!(
            def.validate(),
            Err(CatalogError::DuplicateItem {
                category: "Process".into(),
                item: "IaC".into()
            })
        );
    }

    #[test]
    fn validate_allows_same_name_across_categories() {
        let def = CatalogDefinition::new(vec![
            CategorySpec::new("A", ["Shared"]),
            CategorySpec::new("B", ["Shared"]),
        ]);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_label_and_item() {
        let def = CatalogDefinition::new(vec![CategorySpec::new("  ", ["x"])]);
        assert_eq!(def.validate(), Err(CatalogError::EmptyCategoryLabel { index: 0 }));

        let def = CatalogDefinition::new(vec![CategorySpec::new("A", [""])]);
        assert!(matches!(def.validate(), Err(CatalogError::EmptyItemName { .. })));
    }

    #[test]
    fn sample_csv_lists_items_in_order() {
        let def = CatalogDefinition::new(vec![
            CategorySpec::new("A", ["one", "two"]),
            CategorySpec::new("B", ["three"]),
        ]);
        let csv = def.generate_default().to_sample_csv();
        assert_eq!(csv, "capability,level\none,4\ntwo,4\nthree,4\n");
    }

    #[test]
    fn level_of_finds_item() {
        let catalog = CatalogDefinition::devops().generate_default();
        assert_eq!(catalog.level_of("MTTR"), Some(MaturityLevel::MAX));
        assert_eq!(catalog.level_of("Nope"), None);
        assert!(catalog.contains("UAT"));
    }
}
