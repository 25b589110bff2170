// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connection kinds and search results.

use kurbo::Point;

/// The four structural kinds of connection point a block can expose.
///
/// Statement inputs use [`ConnectionKind::Next`] (they accept a statement's
/// `Previous` connection just like a block's own `Next` does) and value
/// inputs use [`ConnectionKind::Input`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionKind {
    /// Top of a statement block; plugs into a `Next`.
    Previous,
    /// Bottom of a statement block, or a statement input slot.
    Next,
    /// Value input slot; accepts an `Output`.
    Input,
    /// Left edge of a value block; plugs into an `Input`.
    Output,
}

impl ConnectionKind {
    /// All kinds, in bucket order.
    pub const ALL: [Self; 4] = [Self::Previous, Self::Next, Self::Input, Self::Output];

    /// The kind this one can be plugged into.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Previous => Self::Next,
            Self::Next => Self::Previous,
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }

    /// Whether `self` and `other` form a structurally compatible pair.
    #[inline]
    pub const fn pairs_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Previous, Self::Next)
                | (Self::Next, Self::Previous)
                | (Self::Input, Self::Output)
                | (Self::Output, Self::Input)
        )
    }

    /// Whether a connection of this kind sits on the child side of a link.
    ///
    /// `Previous` and `Output` attach a block *to* a parent; `Next` and `Input`
    /// accept children.
    #[inline]
    pub const fn is_child_side(self) -> bool {
        matches!(self, Self::Previous | Self::Output)
    }

    pub(crate) const fn bucket(self) -> usize {
        match self {
            Self::Previous => 0,
            Self::Next => 1,
            Self::Input => 2,
            Self::Output => 3,
        }
    }
}

/// A candidate returned by a nearest-connection search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor<K> {
    /// Key of the matched entry.
    pub key: K,
    /// Position the entry was indexed at.
    pub position: Point,
    /// Euclidean distance from the query origin.
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::ConnectionKind;

    #[test]
    fn opposite_is_an_involution() {
        for kind in ConnectionKind::ALL {
            assert_eq!(kind.opposite().opposite(), kind);
            assert!(kind.pairs_with(kind.opposite()));
            assert!(!kind.pairs_with(kind), "{kind:?} must not pair with itself");
        }
    }

    #[test]
    fn child_side_kinds() {
        assert!(ConnectionKind::Previous.is_child_side());
        assert!(ConnectionKind::Output.is_child_side());
        assert!(!ConnectionKind::Next.is_child_side());
        assert!(!ConnectionKind::Input.is_child_side());
    }

    #[test]
    fn buckets_are_distinct() {
        let mut seen = [false; 4];
        for kind in ConnectionKind::ALL {
            assert!(!seen[kind.bucket()], "bucket reused by {kind:?}");
            seen[kind.bucket()] = true;
        }
    }
}
