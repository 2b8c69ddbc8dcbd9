// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::compaction::{BlockSelector, Choice, Input};
use std::time::Instant;

/// Receives the groups chosen by a selector and merges them
///
/// The executor is responsible for removing merged blocks from
/// future catalog snapshots.
pub trait Executor<'a> {
    /// Error returned when a merge fails
    type Error;

    /// Merges a group of blocks into a single block
    ///
    /// # Errors
    ///
    /// Returns error, if the merge failed.
    fn execute(&mut self, input: Input<'a>) -> Result<(), Self::Error>;
}

impl<'a, F, E> Executor<'a> for F
where
    F: FnMut(Input<'a>) -> Result<(), E>,
{
    type Error = E;

    fn execute(&mut self, input: Input<'a>) -> Result<(), Self::Error> {
        self(input)
    }
}

/// Summary of a planning pass
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PassStats {
    /// Number of dispatched jobs
    pub jobs: usize,

    /// Number of blocks across all dispatched jobs
    pub blocks: usize,

    /// Number of objects across all dispatched jobs
    pub objects: u64,
}

/// Runs a planning pass
///
/// Consults the selector until it has nothing left to choose,
/// handing every chosen group to the executor.
///
/// # Errors
///
/// Stops at, and returns, the first executor error.
/// The selector is left where it was, a new pass needs a new selector anyway.
pub fn run_pass<'a, S, X>(selector: &mut S, executor: &mut X) -> Result<PassStats, X::Error>
where
    S: BlockSelector<'a> + ?Sized,
    X: Executor<'a>,
{
    let start = Instant::now();
    let mut stats = PassStats::default();

    log::trace!("planner: consulting {}", selector.get_name());

    while let Choice::DoCompact(input) = selector.choose() {
        log::debug!(
            "planner: dispatching job {:?} with {} blocks",
            input.grouping_key,
            input.blocks.len(),
        );

        stats.jobs += 1;
        stats.blocks += input.blocks.len();
        stats.objects += input.total_objects();

        executor.execute(input)?;
    }

    log::debug!(
        "planner: {} finished pass with {} jobs in {:?}",
        selector.get_name(),
        stats.jobs,
        start.elapsed(),
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::run_pass;
    use crate::{
        compaction::{BlockSelector, Input, Simple},
        BlockMeta,
    };
    use std::time::{Duration, SystemTime};
    use test_log::test;

    fn fixture_catalog() -> Vec<BlockMeta> {
        (0..6)
            .map(|i| {
                let start = SystemTime::UNIX_EPOCH + Duration::from_secs(i * 10);
                BlockMeta::new("t1", start, start + Duration::from_secs(10), i + 1)
            })
            .collect()
    }

    #[test]
    fn planner_drains_selector() -> crate::Result<()> {
        let catalog = fixture_catalog();
        let mut selector = Simple::new(&catalog, 2, Duration::from_secs(60))?;

        let mut keys = vec![];
        let stats = run_pass(&mut selector, &mut |input: Input<'_>| {
            keys.push(input.grouping_key);
            Ok::<_, ()>(())
        })
        .unwrap_or_default();

        assert_eq!(3, stats.jobs);
        assert_eq!(6, stats.blocks);
        assert_eq!(21, stats.objects);
        assert_eq!(vec!["t1", "t1", "t1"], keys);
        assert!(selector.is_exhausted());

        Ok(())
    }

    #[test]
    fn planner_stops_on_error() -> crate::Result<()> {
        let catalog = fixture_catalog();
        let mut selector = Simple::new(&catalog, 2, Duration::from_secs(60))?;

        let mut calls = 0;
        let result = run_pass(&mut selector, &mut |_: Input<'_>| {
            calls += 1;
            Err::<(), _>("disk full")
        });

        assert_eq!(Err("disk full"), result);
        assert_eq!(1, calls);
        assert_eq!(2, selector.cursor());

        Ok(())
    }
}
