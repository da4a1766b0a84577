//! Merging imported levels into a catalog
//!
//! Reconciliation is a pure function: the input catalog is never mutated, a
//! new one is returned with the same categories and items in the same order.

use crate::catalog::{CapabilityCategory, CapabilityItem, Catalog};
use crate::mapping::ImportMapping;

/// Apply `mapping` to `catalog`
///
/// Every item whose name is a key of `mapping` takes the mapped level; all
/// other items keep their current level. Keys that match no item are
/// ignored and never extend the catalog.
#[must_use]
pub fn reconcile(catalog: &Catalog, mapping: &ImportMapping) -> Catalog {
    let categories = catalog
        .categories()
        .iter()
        .map(|category| CapabilityCategory {
            category: category.category.clone(),
            items: category
                .items
                .iter()
                .map(|item| CapabilityItem {
                    name: item.name.clone(),
                    level: mapping.get(&item.name).unwrap_or(item.level),
                })
                .collect(),
        })
        .collect();

    let merged = Catalog::new(categories);
    tracing::debug!(
        mapped = mapping.len(),
        items = merged.item_count(),
        "reconciled import mapping"
    );
    merged
}

/// Mapping keys that match no item of `catalog`
#[must_use]
pub fn unmatched_names<'m>(catalog: &Catalog, mapping: &'m ImportMapping) -> Vec<&'m str> {
    mapping.names().filter(|name| !catalog.contains(name)).collect()
}
