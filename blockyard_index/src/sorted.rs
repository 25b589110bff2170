// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A list of keyed points kept sorted by y.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use kurbo::{Point, Vec2};

use crate::types::Neighbor;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Entry<K> {
    key: K,
    position: Point,
}

/// Keyed points sorted by their y coordinate.
///
/// Entries with equal y keep their insertion order. The x coordinate is not
/// ordered. Keys are compared by equality, so the same key must not be added
/// twice; the list does not check this.
#[derive(Clone, Debug)]
pub struct YSortedList<K> {
    entries: Vec<Entry<K>>,
}

impl<K> Default for YSortedList<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq + Debug> YSortedList<K> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate `(key, position)` pairs in y order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Point)> + '_ {
        self.entries.iter().map(|e| (e.key, e.position))
    }

    /// Whether every entry's y is no greater than its successor's.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].position.y <= w[1].position.y)
    }

    /// Insert `key` at `position`, after any entries with the same y.
    pub fn add(&mut self, key: K, position: Point) {
        debug_assert!(!position.y.is_nan(), "connection y must not be NaN");
        let at = self.entries.partition_point(|e| e.position.y <= position.y);
        self.entries.insert(at, Entry { key, position });
    }

    /// Remove `key`, which must have been added at `position.y`.
    ///
    /// Returns `false` and leaves the list untouched when no entry with that
    /// key sits at that y.
    pub fn remove(&mut self, key: K, position: Point) -> bool {
        match self.find(key, position.y) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Whether `key` is present at `position.y`.
    pub fn contains(&self, key: K, position: Point) -> bool {
        self.find(key, position.y).is_some()
    }

    /// Remove `key` from `position`, shift it by `delta`, and insert it again.
    ///
    /// Returns `false` without inserting anything when the key was absent.
    pub fn move_by(&mut self, key: K, position: Point, delta: Vec2) -> bool {
        if !self.remove(key, position) {
            return false;
        }
        self.add(key, position + delta);
        true
    }

    /// Find the entry closest to `origin` within `max_radius`.
    ///
    /// Only the band of entries with `|y - origin.y| <= max_radius` is
    /// visited, in y order. `accept` is consulted for entries that would
    /// improve on the current best. Among equidistant entries the first one
    /// in y order wins.
    pub fn find_closest<F>(
        &self,
        origin: Point,
        max_radius: f64,
        mut accept: F,
    ) -> Option<Neighbor<K>>
    where
        F: FnMut(K) -> bool,
    {
        if max_radius < 0.0 {
            return None;
        }
        let low = origin.y - max_radius;
        let high = origin.y + max_radius;
        let start = self.entries.partition_point(|e| e.position.y < low);

        let mut best: Option<Neighbor<K>> = None;
        for e in self.entries[start..].iter().take_while(|e| e.position.y <= high) {
            let distance = origin.distance(e.position);
            if distance > max_radius {
                continue;
            }
            if best.is_some_and(|b| distance >= b.distance) {
                continue;
            }
            if accept(e.key) {
                best = Some(Neighbor {
                    key: e.key,
                    position: e.position,
                    distance,
                });
            }
        }
        best
    }

    /// Locate `key` among the entries at `y`.
    ///
    /// A binary search lands on some entry with that y; the equal-y run is
    /// then scanned backward and forward from there.
    fn find(&self, key: K, y: f64) -> Option<usize> {
        let probe = self
            .entries
            .binary_search_by(|e| e.position.y.partial_cmp(&y).unwrap_or(Ordering::Less))
            .ok()?;

        let mut i = probe;
        loop {
            if self.entries[i].key == key {
                return Some(i);
            }
            if i == 0 || self.entries[i - 1].position.y != y {
                break;
            }
            i -= 1;
        }

        let mut i = probe + 1;
        while i < self.entries.len() && self.entries[i].position.y == y {
            if self.entries[i].key == key {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}
