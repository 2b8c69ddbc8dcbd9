// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Contains block selection strategies

pub(crate) mod queue;
pub(crate) mod simple;
pub(crate) mod time_window;

use crate::BlockMeta;

pub use queue::ObjectCountQueue;
pub use simple::Strategy as Simple;
pub use time_window::Strategy as TimeWindow;

/// Input for the compactor
///
/// The selector chooses which blocks to merge into a single block.
#[derive(Debug, Eq, PartialEq)]
pub struct Input<'a> {
    /// Blocks to merge, in catalog order
    pub blocks: Vec<&'a BlockMeta>,

    /// Identifies the group, used for job naming and deduplication
    pub grouping_key: String,
}

impl Input<'_> {
    /// Sum of objects in all blocks of the group
    #[must_use]
    pub fn total_objects(&self) -> u64 {
        self.blocks.iter().map(|x| x.total_objects).sum()
    }
}

/// Describes what to do (compact or not)
#[derive(Debug, Eq, PartialEq)]
pub enum Choice<'a> {
    /// Nothing (more) to do in this pass
    DoNothing,

    /// Merges a group of blocks
    DoCompact(Input<'a>),
}

impl<'a> Choice<'a> {
    /// Returns `true` if there is nothing to compact
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::DoNothing)
    }

    /// Splits the choice into the group and its grouping key
    ///
    /// [`Choice::DoNothing`] becomes an empty group with an empty key.
    #[must_use]
    pub fn into_parts(self) -> (Vec<&'a BlockMeta>, String) {
        match self {
            Self::DoNothing => (Vec::new(), String::new()),
            Self::DoCompact(input) => (input.blocks, input.grouping_key),
        }
    }
}

/// Scan state of a selector
///
/// A selector is single-use: once exhausted, it stays exhausted.
/// To revisit blocks, build a new selector from a fresh catalog.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    /// Next candidate position in the catalog
    Scanning {
        /// Catalog index
        cursor: usize,
    },

    /// Catalog has been fully scanned
    Exhausted,
}

impl ScanState {
    /// Starting state for a catalog of `len` blocks
    pub(crate) fn start(len: usize) -> Self {
        if len == 0 {
            Self::Exhausted
        } else {
            Self::Scanning { cursor: 0 }
        }
    }

    /// Moves to `cursor`, or to [`ScanState::Exhausted`] if that is past the catalog
    pub(crate) fn advance(&mut self, cursor: usize, len: usize) {
        debug_assert!(cursor >= self.position(len), "cursor may not go back");

        *self = if cursor >= len {
            Self::Exhausted
        } else {
            Self::Scanning { cursor }
        };
    }

    /// Cursor position, `len` if exhausted
    pub(crate) fn position(self, len: usize) -> usize {
        match self {
            Self::Scanning { cursor } => cursor,
            Self::Exhausted => len,
        }
    }
}

/// Trait for a block selection strategy
///
/// A selector is built from a sorted catalog (by tenant, then start time)
/// and emits one group per call until it runs out of work.
#[allow(clippy::module_name_repetitions)]
pub trait BlockSelector<'a> {
    /// Gets the strategy name
    fn get_name(&self) -> &'static str;

    /// Chooses the next group of blocks to compact
    ///
    /// Returns [`Choice::DoNothing`] once the catalog is exhausted,
    /// and keeps doing so on every further call.
    fn choose(&mut self) -> Choice<'a>;

    /// Current scan state
    fn state(&self) -> ScanState;

    /// Number of blocks in the catalog
    fn catalog_len(&self) -> usize;

    /// Current cursor position; equals the catalog length once exhausted
    fn cursor(&self) -> usize {
        self.state().position(self.catalog_len())
    }

    /// Returns `true` if there is no more work in this pass
    fn is_exhausted(&self) -> bool {
        self.state() == ScanState::Exhausted
    }
}

/// Either of the built-in selectors
#[allow(clippy::module_name_repetitions)]
pub enum AnySelector<'a> {
    /// Contiguous-window selector
    Simple(Simple<'a>),

    /// Time-bucketed selector
    TimeWindow(TimeWindow<'a>),
}

impl<'a> BlockSelector<'a> for AnySelector<'a> {
    fn get_name(&self) -> &'static str {
        match self {
            Self::Simple(x) => x.get_name(),
            Self::TimeWindow(x) => x.get_name(),
        }
    }

    fn choose(&mut self) -> Choice<'a> {
        match self {
            Self::Simple(x) => x.choose(),
            Self::TimeWindow(x) => x.choose(),
        }
    }

    fn state(&self) -> ScanState {
        match self {
            Self::Simple(x) => x.state(),
            Self::TimeWindow(x) => x.state(),
        }
    }

    fn catalog_len(&self) -> usize {
        match self {
            Self::Simple(x) => x.catalog_len(),
            Self::TimeWindow(x) => x.catalog_len(),
        }
    }
}

impl<'a> From<Simple<'a>> for AnySelector<'a> {
    fn from(value: Simple<'a>) -> Self {
        Self::Simple(value)
    }
}

impl<'a> From<TimeWindow<'a>> for AnySelector<'a> {
    fn from(value: TimeWindow<'a>) -> Self {
        Self::TimeWindow(value)
    }
}

/// Checks the parameters shared by all strategies, returning the starting state
pub(crate) fn initial_state(
    name: &str,
    catalog: &[BlockMeta],
    group_size: usize,
    strict: bool,
) -> crate::Result<ScanState> {
    if group_size == 0 {
        return Err(crate::Error::ZeroGroupSize);
    }

    if catalog.len() < group_size {
        if strict {
            return Err(crate::Error::CatalogTooShort {
                len: catalog.len(),
                group_size,
            });
        }

        log::debug!(
            "{name}: catalog has {} blocks, fewer than group size {group_size}, nothing to select",
            catalog.len(),
        );
        return Ok(ScanState::Exhausted);
    }

    Ok(ScanState::start(catalog.len()))
}
