// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::time::elapsed;
use std::{
    cmp::Ordering,
    sync::Arc,
    time::{Duration, SystemTime},
};

/// Metadata of an immutable, previously written block
///
/// Block metadata is owned by the catalog provider, selectors only ever read it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockMeta {
    /// Tenant that owns the block
    pub tenant_id: Arc<str>,

    /// Start of the time range covered by the block
    pub start_time: SystemTime,

    /// End of the time range covered by the block
    ///
    /// Should not be earlier than `start_time`.
    pub end_time: SystemTime,

    /// Number of objects stored in the block
    ///
    /// Only used as a weight, never checked against the block's contents.
    pub total_objects: u64,
}

impl BlockMeta {
    /// Creates block metadata
    pub fn new<T: Into<Arc<str>>>(
        tenant_id: T,
        start_time: SystemTime,
        end_time: SystemTime,
        total_objects: u64,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            start_time,
            end_time,
            total_objects,
        }
    }

    /// Time covered by the block
    #[must_use]
    pub fn span(&self) -> Duration {
        elapsed(self.start_time, self.end_time)
    }

    /// Catalog order: by tenant, then by start time
    #[must_use]
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        self.tenant_id
            .cmp(&other.tenant_id)
            .then_with(|| self.start_time.cmp(&other.start_time))
    }
}
