// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::{initial_state, BlockSelector, Choice, Input, ScanState};
use crate::{time::elapsed, BlockMeta};
use std::time::Duration;

/// Contiguous-window block selection
///
/// Picks the first run of `group_size` consecutive blocks (in catalog order)
/// whose combined time span, from the start of the first block to the
/// end of the last block, is shorter than `max_range`.
///
/// Selected runs are consumed. Blocks the cursor has moved past are not looked at again,
/// even if they were never selected.
///
/// Tenant boundaries are not checked, the catalog order is trusted.
pub struct Strategy<'a> {
    catalog: &'a [BlockMeta],
    group_size: usize,
    max_range: Duration,
    state: ScanState,
}

impl<'a> Strategy<'a> {
    /// Configures a new contiguous-window selector
    ///
    /// A catalog shorter than `group_size` yields a selector that never selects anything.
    ///
    /// # Errors
    ///
    /// Returns error, if `group_size` or `max_range` is zero.
    pub fn new(
        catalog: &'a [BlockMeta],
        group_size: usize,
        max_range: Duration,
    ) -> crate::Result<Self> {
        Self::with_strictness(catalog, group_size, max_range, false)
    }

    pub(crate) fn with_strictness(
        catalog: &'a [BlockMeta],
        group_size: usize,
        max_range: Duration,
        strict: bool,
    ) -> crate::Result<Self> {
        if max_range.is_zero() {
            return Err(crate::Error::InvalidRange(max_range));
        }

        let state = initial_state("SimpleSelector", catalog, group_size, strict)?;

        Ok(Self {
            catalog,
            group_size,
            max_range,
            state,
        })
    }
}

impl<'a> BlockSelector<'a> for Strategy<'a> {
    fn get_name(&self) -> &'static str {
        "SimpleSelector"
    }

    fn choose(&mut self) -> Choice<'a> {
        let ScanState::Scanning { cursor } = self.state else {
            return Choice::DoNothing;
        };

        let len = self.catalog.len();
        let mut pos = cursor;

        while pos + self.group_size <= len {
            let Some(group) = self.catalog.get(pos..pos + self.group_size) else {
                break;
            };

            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                break;
            };

            let span = elapsed(first.start_time, last.end_time);

            if span < self.max_range {
                self.state.advance(pos + self.group_size, len);

                log::debug!(
                    "{}: chose blocks {pos}..{} of tenant {:?}, spanning {span:?}",
                    self.get_name(),
                    pos + self.group_size,
                    first.tenant_id,
                );

                return Choice::DoCompact(Input {
                    blocks: group.iter().collect(),
                    grouping_key: first.tenant_id.to_string(),
                });
            }

            log::trace!(
                "{}: blocks {pos}..{} span {span:?}, not below {:?}",
                self.get_name(),
                pos + self.group_size,
                self.max_range,
            );

            pos += 1;
        }

        log::trace!("{}: reached end of catalog", self.get_name());
        self.state.advance(len, len);

        Choice::DoNothing
    }

    fn state(&self) -> ScanState {
        self.state
    }

    fn catalog_len(&self) -> usize {
        self.catalog.len()
    }
}
