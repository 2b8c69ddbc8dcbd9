// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    compaction::{AnySelector, Simple, TimeWindow},
    BlockMeta,
};
use std::time::Duration;

/// Which selection strategy to build
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StrategyKind {
    /// Contiguous-window selection, see [`crate::compaction::Simple`]
    Simple,

    /// Time-window selection, see [`crate::compaction::TimeWindow`]
    #[default]
    TimeWindow,
}

/// Selector configuration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Number of blocks merged per compaction job
    ///
    /// Defaults to 4
    pub(crate) group_size: usize,

    /// Span cap (contiguous-window) or bucket width (time-window)
    ///
    /// Defaults to 1 hour
    pub(crate) max_range: Duration,

    /// Strategy to build
    ///
    /// Defaults to time-window
    pub(crate) strategy: StrategyKind,

    /// Reject catalogs shorter than the group size
    ///
    /// Defaults to false
    pub(crate) strict_catalog_len: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_size: 4,
            max_range: Duration::from_secs(3_600),
            strategy: StrategyKind::default(),
            strict_catalog_len: false,
        }
    }
}

impl Config {
    /// Initializes a new config
    #[must_use]
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size,
            ..Default::default()
        }
    }

    /// Sets the span cap or bucket width (default: 1 hour)
    #[must_use]
    pub fn max_range(mut self, range: Duration) -> Self {
        self.max_range = range;
        self
    }

    /// Sets the strategy to use (default: time-window)
    #[must_use]
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// If enabled, building a selector over a catalog shorter than the group size fails
    /// with [`crate::Error::CatalogTooShort`]
    ///
    /// Otherwise the selector simply has nothing to select (default: false)
    #[must_use]
    pub fn strict_catalog_len(mut self, strict: bool) -> Self {
        self.strict_catalog_len = strict;
        self
    }

    /// Builds a selector over a sorted catalog
    ///
    /// # Errors
    ///
    /// Returns error, if the configuration is invalid.
    pub fn open<'a>(&self, catalog: &'a [BlockMeta]) -> crate::Result<AnySelector<'a>> {
        log::trace!(
            "Building {:?} selector over {} blocks (group size {}, range {:?})",
            self.strategy,
            catalog.len(),
            self.group_size,
            self.max_range,
        );

        Ok(match self.strategy {
            StrategyKind::Simple => Simple::with_strictness(
                catalog,
                self.group_size,
                self.max_range,
                self.strict_catalog_len,
            )?
            .into(),
            StrategyKind::TimeWindow => TimeWindow::with_strictness(
                catalog,
                self.group_size,
                self.max_range,
                self.strict_catalog_len,
            )?
            .into(),
        })
    }
}
