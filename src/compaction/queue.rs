// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::BlockMeta;
use std::{cmp::Ordering, collections::BinaryHeap};

/// Heap slot, ranked by `(total_objects, seqno)`
///
/// Among blocks with the same object count, the one pushed later ranks larger.
#[derive(Debug)]
struct Ranked<'a> {
    total_objects: u64,
    seqno: usize,
    block: &'a BlockMeta,
}

impl Ranked<'_> {
    fn key(&self) -> (u64, usize) {
        (self.total_objects, self.seqno)
    }
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Ranked<'_> {}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Max-priority queue of blocks, keyed by object count
///
/// The block with the most objects is always at the front.
/// If the queue has a limit, pushing past the limit evicts the front,
/// so the queue keeps the `limit` blocks with the fewest objects.
#[derive(Debug)]
pub struct ObjectCountQueue<'a> {
    heap: BinaryHeap<Ranked<'a>>,
    limit: Option<usize>,
    seqno: usize,
}

impl Default for ObjectCountQueue<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ObjectCountQueue<'a> {
    /// Creates an unbounded queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            limit: None,
            seqno: 0,
        }
    }

    /// Creates a queue that holds at most `limit` blocks
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            // NOTE: +1 because a push goes over the limit before evicting
            heap: BinaryHeap::with_capacity(limit.saturating_add(1)),
            limit: Some(limit),
            seqno: 0,
        }
    }

    /// Number of queued blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the block with the most objects, without removing it
    #[must_use]
    pub fn peek(&self) -> Option<&'a BlockMeta> {
        self.heap.peek().map(|x| x.block)
    }

    /// Pushes a block
    ///
    /// If this pushes the queue over its limit, the block with the most objects
    /// (possibly the one just pushed) is evicted and returned.
    pub fn push(&mut self, block: &'a BlockMeta) -> Option<&'a BlockMeta> {
        self.heap.push(Ranked {
            total_objects: block.total_objects,
            seqno: self.seqno,
            block,
        });
        self.seqno += 1;

        match self.limit {
            Some(limit) if self.heap.len() > limit => self.pop(),
            _ => None,
        }
    }

    /// Removes and returns the block with the most objects
    pub fn pop(&mut self) -> Option<&'a BlockMeta> {
        self.heap.pop().map(|x| x.block)
    }

    /// Pops the largest blocks until at most `len` remain
    pub fn trim_to(&mut self, len: usize) {
        while self.heap.len() > len {
            if let Some(evicted) = self.pop() {
                log::trace!(
                    "queue: evicting block with {} objects",
                    evicted.total_objects
                );
            }
        }
    }

    /// Consumes the queue, returning the remaining blocks in push order
    #[must_use]
    pub fn into_blocks(self) -> Vec<&'a BlockMeta> {
        let mut items = self.heap.into_vec();
        items.sort_unstable_by_key(|x| x.seqno);
        items.into_iter().map(|x| x.block).collect()
    }
}
