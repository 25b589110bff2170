// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by blocks and connections.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::types::SlotId;

#[derive(Clone, Debug)]
pub(crate) struct Arena<I, T> {
    slots: Vec<Option<T>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    _id: PhantomData<I>,
}

impl<I, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            _id: PhantomData,
        }
    }
}

impl<I: SlotId, T> Arena<I, T> {
    pub(crate) fn insert(&mut self, value: T) -> I {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(value);
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(value));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Ids use 32-bit indices by design."
        )]
        I::from_parts(idx as u32, generation)
    }

    pub(crate) fn remove(&mut self, id: I) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.free_list.push(id.idx());
        self.slots[id.idx()].take()
    }

    pub(crate) fn contains(&self, id: I) -> bool {
        self.generations.get(id.idx()) == Some(&id.generation())
            && self.slots[id.idx()].is_some()
    }

    pub(crate) fn get(&self, id: I) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: I) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.idx()].as_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.slots
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_some())
            .map(|(i, (_, &generation))| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Ids use 32-bit indices by design."
                )]
                I::from_parts(i as u32, generation)
            })
    }

    pub(crate) fn clear(&mut self) {
        // Freed slots get a new generation when reused, so old ids stay stale.
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockId;

    #[test]
    fn stale_ids_are_rejected_after_reuse() {
        let mut arena: Arena<BlockId, &str> = Arena::default();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));
        let b = arena.insert("b");
        assert_eq!(a.idx(), b.idx());
        assert!(!arena.contains(a));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut arena: Arena<BlockId, u8> = Arena::default();
        let a = arena.insert(1);
        let b = arena.insert(2);
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert!(arena.get(a).is_none() && arena.get(b).is_none());
        let c = arena.insert(3);
        assert!(!arena.contains(a) && !arena.contains(b));
        assert_eq!(arena.ids().collect::<Vec<_>>(), [c]);
    }
}
