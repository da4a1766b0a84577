//! Error types for the catalog crate

/// Errors building an [`ImportMapping`](crate::ImportMapping) from untrusted values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A bare value outside the maturity scale
    #[error("maturity level {0} is outside 1..=4")]
    InvalidLevel(i64),

    /// A named entry whose level is outside the maturity scale
    #[error("capability '{name}' has level {level}, expected 1..=4")]
    LevelOutOfRange {
        /// Capability name as imported
        name: String,
        /// Rejected level
        level: i64,
    },
}

/// Errors validating a [`CatalogDefinition`](crate::CatalogDefinition)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Category with a blank label
    #[error("category #{index} has an empty label")]
    EmptyCategoryLabel {
        /// Position of the category in the definition
        index: usize,
    },

    /// Item with a blank name
    #[error("category '{category}' contains an empty item name")]
    EmptyItemName {
        /// Label of the category holding the blank name
        category: String,
    },

    /// Item name repeated within one category
    #[error("category '{category}' lists '{item}' more than once")]
    DuplicateItem {
        /// Category label
        category: String,
        /// Repeated item name
        item: String,
    },
}
