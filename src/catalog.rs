// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Helpers for catalog providers
//!
//! Selectors expect the catalog to be sorted by tenant, then by start time.
//! They do not check that, an unsorted catalog silently produces bad groups.

use crate::BlockMeta;

/// Sorts a catalog into the order selectors expect
///
/// The sort is stable, so blocks with equal tenant and start time keep their relative order.
pub fn sort(catalog: &mut [BlockMeta]) {
    catalog.sort_by(BlockMeta::catalog_cmp);
}

/// Returns `true` if the catalog is in the order selectors expect
#[must_use]
pub fn is_sorted(catalog: &[BlockMeta]) -> bool {
    catalog
        .windows(2)
        .all(|pair| match pair {
            [a, b] => a.catalog_cmp(b).is_le(),
            _ => true,
        })
}

/// Splits a sorted catalog into contiguous per-tenant slices
///
/// Each slice can be handed to its own selector.
#[must_use]
pub fn partition_by_tenant(catalog: &[BlockMeta]) -> TenantPartitions<'_> {
    TenantPartitions { rest: catalog }
}

/// Iterator over the per-tenant slices of a catalog
///
/// Created by [`partition_by_tenant`].
pub struct TenantPartitions<'a> {
    rest: &'a [BlockMeta],
}

impl<'a> Iterator for TenantPartitions<'a> {
    type Item = &'a [BlockMeta];

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.first()?;

        let len = self
            .rest
            .iter()
            .position(|block| block.tenant_id != first.tenant_id)
            .unwrap_or(self.rest.len());

        let (partition, rest) = self.rest.split_at(len);
        self.rest = rest;

        Some(partition)
    }
}
