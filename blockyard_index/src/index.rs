// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `ConnectionIndex` API: one y-sorted bucket per connection kind.

use core::fmt::Debug;

use kurbo::{Point, Vec2};

use crate::sorted::YSortedList;
use crate::types::{ConnectionKind, Neighbor};

/// Spatial index of connection points, bucketed by [`ConnectionKind`].
///
/// The index does not own connection data. Callers store a copy of the
/// position each key was added at and must pass that same position back to
/// [`remove`](Self::remove) and [`move_by`](Self::move_by).
#[derive(Clone, Debug)]
pub struct ConnectionIndex<K> {
    buckets: [YSortedList<K>; 4],
}

impl<K> Default for ConnectionIndex<K> {
    fn default() -> Self {
        Self {
            buckets: core::array::from_fn(|_| YSortedList::default()),
        }
    }
}

impl<K: Copy + PartialEq + Debug> ConnectionIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket holding connections of `kind`.
    pub fn bucket(&self, kind: ConnectionKind) -> &YSortedList<K> {
        &self.buckets[kind.bucket()]
    }

    /// Total number of indexed connections.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(YSortedList::len).sum()
    }

    /// Whether no connection is indexed.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(YSortedList::is_empty)
    }

    /// Remove every connection from every bucket.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Add `key` to the bucket for `kind`.
    pub fn add(&mut self, kind: ConnectionKind, key: K, position: Point) {
        tracing::trace!(?kind, ?key, x = position.x, y = position.y, "index add");
        self.buckets[kind.bucket()].add(key, position);
    }

    /// Remove `key` from the bucket for `kind`.
    ///
    /// Returns `false` when the key is not indexed at `position`; the index
    /// is left untouched in that case.
    pub fn remove(&mut self, kind: ConnectionKind, key: K, position: Point) -> bool {
        let removed = self.buckets[kind.bucket()].remove(key, position);
        tracing::trace!(?kind, ?key, removed, "index remove");
        removed
    }

    /// Whether `key` is indexed at `position`.
    pub fn contains(&self, kind: ConnectionKind, key: K, position: Point) -> bool {
        self.buckets[kind.bucket()].contains(key, position)
    }

    /// Translate an indexed connection by `delta`.
    ///
    /// Returns `false` (and adds nothing) when `key` was not indexed.
    pub fn move_by(&mut self, kind: ConnectionKind, key: K, position: Point, delta: Vec2) -> bool {
        self.buckets[kind.bucket()].move_by(key, position, delta)
    }

    /// Find the closest connection that a connection of kind `source_kind`
    /// at `origin` could plug into.
    ///
    /// Searches the bucket of `source_kind.opposite()` within `max_radius`.
    /// `accept` filters candidates (compatibility, ownership, occupancy).
    pub fn find_closest<F>(
        &self,
        source_kind: ConnectionKind,
        origin: Point,
        max_radius: f64,
        accept: F,
    ) -> Option<Neighbor<K>>
    where
        F: FnMut(K) -> bool,
    {
        self.buckets[source_kind.opposite().bucket()].find_closest(origin, max_radius, accept)
    }
}
