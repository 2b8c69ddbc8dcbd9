// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Block selection for time-series compaction planning.
//!
//! Given a catalog of immutable blocks (each tagged with a tenant, a time range and an
//! object count), a selector repeatedly proposes groups of blocks that should be merged
//! into a single, larger block. Merging the blocks is up to the caller.
//!
//! Two strategies are built in:
//!
//! - [`compaction::Simple`]: first run of consecutive blocks spanning less than a time range
//! - [`compaction::TimeWindow`]: blocks bucketed into fixed time windows, preferring
//!   the blocks with the fewest objects
//!
//! A selector is single-use: it scans its catalog once, then keeps returning
//! [`compaction::Choice::DoNothing`]. The catalog has to be sorted by tenant, then by start time,
//! see [`catalog::sort`].
//!
//! ```
//! use compaction_selector::{compaction::{BlockSelector, Choice}, BlockMeta, Config, StrategyKind};
//! use std::time::{Duration, SystemTime};
//!
//! let hour = Duration::from_secs(3_600);
//!
//! let catalog = (0..5)
//!     .map(|h| {
//!         let start = SystemTime::UNIX_EPOCH + hour * h;
//!         BlockMeta::new("tenant-1", start, start + hour, 100)
//!     })
//!     .collect::<Vec<_>>();
//!
//! let mut selector = Config::new(2)
//!     .strategy(StrategyKind::Simple)
//!     .max_range(hour * 3)
//!     .open(&catalog)?;
//!
//! while let Choice::DoCompact(input) = selector.choose() {
//!     // Hand the group to the compactor
//!     assert_eq!(2, input.blocks.len());
//!     assert_eq!("tenant-1", input.grouping_key);
//! }
//!
//! assert!(selector.is_exhausted());
//! #
//! # Ok::<_, compaction_selector::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]

mod block;

/// Helpers for catalog providers
pub mod catalog;

/// Contains block selection strategies
pub mod compaction;

mod config;
mod error;

/// Drives selectors through a planning pass
pub mod planner;

/// Time helpers
pub mod time;

pub use {
    block::BlockMeta,
    config::{Config, StrategyKind},
    error::{Error, Result},
};
