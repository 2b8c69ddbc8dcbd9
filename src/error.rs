// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::time::Duration;

/// Represents errors that can occur when constructing a block selector
///
/// Running out of work is never an error, see [`crate::compaction::Choice::DoNothing`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// The configured group size is zero
    ZeroGroupSize,

    /// The configured range cannot be used by the chosen strategy
    ///
    /// The contiguous-window strategy needs a non-zero span cap,
    /// the time-window strategy needs a bucket width of at least one second.
    InvalidRange(Duration),

    /// The catalog holds fewer blocks than a single group needs
    ///
    /// Only returned if strict catalog length checking is enabled.
    CatalogTooShort {
        /// Number of blocks in the catalog
        len: usize,

        /// Configured group size
        group_size: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroGroupSize => write!(f, "configuration error: groupSize must be positive"),
            Self::InvalidRange(range) => {
                write!(f, "configuration error: invalid maxRange {range:?}")
            }
            Self::CatalogTooShort { len, group_size } => write!(
                f,
                "configuration error: catalog shorter than groupSize ({len} < {group_size})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Selector result
pub type Result<T> = std::result::Result<T, Error>;
