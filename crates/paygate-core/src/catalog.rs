// crates/paygate-core/src/catalog.rs
// ============================================================================
// Module: Static Product Catalog
// Description: In-memory ProductCatalog keyed by store and product id.
// Purpose: Back receipt verification with an explicit lookup table.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`StaticCatalog`] holds the `storeProductId -> unifiedPackageId` mapping
//! in memory. Deployments that source the mapping from the product database
//! implement [`ProductCatalog`] themselves; the lookup contract is the same:
//! an unknown product id resolves to `None` and must never be defaulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::identifiers::StoreProductId;
use crate::core::identifiers::UnifiedPackageId;
use crate::core::receipt::StoreKind;
use crate::interfaces::CatalogError;
use crate::interfaces::ProductCatalog;

// ============================================================================
// SECTION: Static Catalog
// ============================================================================

/// In-memory product catalog.
///
/// # Invariants
/// - Entries are keyed by `(store, product id)`; the same product id may map
///   to different packages per store.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Mapping from store-scoped product ids to unified packages.
    entries: BTreeMap<(StoreKind, StoreProductId), UnifiedPackageId>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds one mapping, replacing any previous entry for the same key.
    pub fn insert(
        &mut self,
        store: StoreKind,
        product_id: StoreProductId,
        package_id: UnifiedPackageId,
    ) {
        self.entries.insert((store, product_id), package_id);
    }

    /// Returns the number of mappings present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no mappings are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProductCatalog for StaticCatalog {
    fn resolve(
        &self,
        store: StoreKind,
        product_id: &StoreProductId,
    ) -> Result<Option<UnifiedPackageId>, CatalogError> {
        Ok(self.entries.get(&(store, product_id.clone())).cloned())
    }
}
