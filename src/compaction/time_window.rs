// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::{initial_state, BlockSelector, Choice, Input, ObjectCountQueue, ScanState};
use crate::{time::bucket_of, BlockMeta};
use std::time::Duration;

/// Time-window block selection
///
/// Blocks are bucketed by their start time into fixed windows of `window` width.
/// Every maximal run of consecutive blocks of the same tenant and bucket is a candidate:
/// if it holds at least `group_size` blocks, the `group_size` blocks with the fewest
/// objects are chosen.
///
/// Small blocks are the cheapest to merge, and blocks that already absorbed earlier
/// merges are left alone.
///
/// Every run is looked at once. A run that is too small is skipped for the rest
/// of the pass, the selector needs to be rebuilt from an updated catalog to revisit it.
pub struct Strategy<'a> {
    catalog: &'a [BlockMeta],
    group_size: usize,
    window_secs: i64,
    state: ScanState,
}

impl<'a> Strategy<'a> {
    /// Configures a new time-window selector
    ///
    /// Only whole seconds of `window` are used.
    /// A catalog shorter than `group_size` yields a selector that never selects anything.
    ///
    /// # Errors
    ///
    /// Returns error, if `group_size` is zero or `window` is shorter than a second.
    pub fn new(catalog: &'a [BlockMeta], group_size: usize, window: Duration) -> crate::Result<Self> {
        Self::with_strictness(catalog, group_size, window, false)
    }

    pub(crate) fn with_strictness(
        catalog: &'a [BlockMeta],
        group_size: usize,
        window: Duration,
        strict: bool,
    ) -> crate::Result<Self> {
        let window_secs = match i64::try_from(window.as_secs()) {
            Ok(secs) if secs > 0 => secs,
            _ => return Err(crate::Error::InvalidRange(window)),
        };

        let state = initial_state("TimeWindowSelector", catalog, group_size, strict)?;

        Ok(Self {
            catalog,
            group_size,
            window_secs,
            state,
        })
    }

    /// Gets the time bucket of a block
    #[must_use]
    pub fn bucket(&self, block: &BlockMeta) -> i64 {
        bucket_of(block.start_time, self.window_secs)
    }
}

impl<'a> BlockSelector<'a> for Strategy<'a> {
    fn get_name(&self) -> &'static str {
        "TimeWindowSelector"
    }

    fn choose(&mut self) -> Choice<'a> {
        let len = self.catalog.len();

        while let ScanState::Scanning { cursor } = self.state {
            let Some(first) = self.catalog.get(cursor) else {
                self.state.advance(len, len);
                break;
            };

            let bucket = self.bucket(first);

            // NOTE: The queue is rebuilt for every run
            let mut queue = ObjectCountQueue::with_limit(self.group_size);

            let run = self
                .catalog
                .get(cursor..)
                .unwrap_or_default()
                .iter()
                .take_while(|block| {
                    block.tenant_id == first.tenant_id && self.bucket(block) == bucket
                });

            let mut run_len = 0;

            for block in run {
                queue.push(block);
                run_len += 1;
            }

            let run_end = cursor + run_len;
            self.state.advance(run_end, len);

            if run_len >= self.group_size {
                log::debug!(
                    "{}: chose {} of {run_len} blocks in bucket {bucket} of tenant {:?}",
                    self.get_name(),
                    queue.len(),
                    first.tenant_id,
                );

                return Choice::DoCompact(Input {
                    blocks: queue.into_blocks(),
                    grouping_key: format!("{}-{bucket}", first.tenant_id),
                });
            }

            log::debug!(
                "{}: skipping bucket {bucket} of tenant {:?}, only {run_len} blocks (need {})",
                self.get_name(),
                first.tenant_id,
                self.group_size,
            );
        }

        log::trace!("{}: reached end of catalog", self.get_name());

        Choice::DoNothing
    }

    fn state(&self) -> ScanState {
        self.state
    }

    fn catalog_len(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Strategy;
    use crate::{
        compaction::{BlockSelector, Choice},
        BlockMeta,
    };
    use std::time::{Duration, SystemTime};
    use test_log::test;

    const HOUR: Duration = Duration::from_secs(3_600);

    fn fixture_block(tenant: &str, start_hour: u32, total_objects: u64) -> BlockMeta {
        let start = SystemTime::UNIX_EPOCH + HOUR * start_hour;
        BlockMeta::new(tenant, start, start + HOUR, total_objects)
    }

    fn objects(blocks: &[&BlockMeta]) -> Vec<u64> {
        blocks.iter().map(|x| x.total_objects).collect()
    }

    #[test]
    fn time_window_two_buckets() -> crate::Result<()> {
        // 3 hour windows: hours 1, 2 fall into bucket 0, hours 3, 4, 5 into bucket 1
        let catalog = vec![
            fixture_block("t1", 1, 5),
            fixture_block("t1", 2, 6),
            fixture_block("t1", 3, 50),
            fixture_block("t1", 4, 10),
            fixture_block("t1", 5, 30),
        ];

        let mut selector = Strategy::new(&catalog, 2, HOUR * 3)?;

        let (blocks, key) = selector.choose().into_parts();
        assert_eq!(vec![5, 6], objects(&blocks));
        assert_eq!("t1-0", key);
        assert_eq!(2, selector.cursor());

        let (blocks, key) = selector.choose().into_parts();
        assert_eq!(vec![10, 30], objects(&blocks));
        assert_eq!("t1-1", key);
        assert!(selector.is_exhausted());

        assert_eq!(Choice::DoNothing, selector.choose());
        assert_eq!(Choice::DoNothing, selector.choose());

        Ok(())
    }

    #[test]
    fn time_window_skips_small_buckets() -> crate::Result<()> {
        let catalog = vec![
            fixture_block("t1", 0, 1),
            fixture_block("t1", 6, 1),
            fixture_block("t1", 7, 2),
            fixture_block("t1", 12, 1),
        ];

        let mut selector = Strategy::new(&catalog, 2, HOUR * 6)?;

        let (blocks, key) = selector.choose().into_parts();
        assert_eq!(vec![1, 2], objects(&blocks));
        assert_eq!("t1-1", key);
        assert_eq!(3, selector.cursor());

        assert_eq!(Choice::DoNothing, selector.choose());
        assert!(selector.is_exhausted());

        Ok(())
    }

    #[test]
    fn time_window_splits_tenants() -> crate::Result<()> {
        let catalog = vec![
            fixture_block("a", 0, 1),
            fixture_block("b", 0, 1),
            fixture_block("b", 1, 1),
        ];

        let mut selector = Strategy::new(&catalog, 2, HOUR * 6)?;

        let (blocks, key) = selector.choose().into_parts();
        assert_eq!("b-0", key);
        assert!(blocks.iter().all(|x| &*x.tenant_id == "b"));

        Ok(())
    }

    #[test]
    fn time_window_ties_keep_earlier_blocks() -> crate::Result<()> {
        let catalog = vec![
            fixture_block("t1", 0, 7),
            fixture_block("t1", 1, 7),
            fixture_block("t1", 2, 7),
        ];

        let mut selector = Strategy::new(&catalog, 2, HOUR * 6)?;

        let (blocks, _) = selector.choose().into_parts();
        assert_eq!(2, blocks.len());
        assert!(std::ptr::eq(blocks[0], &catalog[0]));
        assert!(std::ptr::eq(blocks[1], &catalog[1]));

        Ok(())
    }

    #[test]
    fn time_window_pre_epoch_bucket() -> crate::Result<()> {
        let start = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        let catalog = vec![
            BlockMeta::new("t1", start, start, 1),
            BlockMeta::new("t1", start, start, 1),
        ];

        let mut selector = Strategy::new(&catalog, 2, HOUR)?;

        let (_, key) = selector.choose().into_parts();
        assert_eq!("t1--1", key);

        Ok(())
    }

    #[test]
    fn time_window_invalid_config() {
        let catalog = vec![fixture_block("t1", 0, 1)];

        assert!(matches!(
            Strategy::new(&catalog, 0, HOUR),
            Err(crate::Error::ZeroGroupSize)
        ));
        assert!(matches!(
            Strategy::new(&catalog, 1, Duration::from_millis(999)),
            Err(crate::Error::InvalidRange(_))
        ));
    }

    #[test]
    fn time_window_short_catalog() -> crate::Result<()> {
        let catalog = vec![fixture_block("t1", 0, 1)];

        let mut selector = Strategy::new(&catalog, 2, HOUR)?;
        assert!(selector.is_exhausted());
        assert_eq!(Choice::DoNothing, selector.choose());

        assert!(matches!(
            Strategy::with_strictness(&catalog, 2, HOUR, true),
            Err(crate::Error::CatalogTooShort { .. })
        ));

        Ok(())
    }
}
