//! Fixed-capacity arena with generation-checked handles.

use std::collections::VecDeque;

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    released_at: Option<u64>,
    entry: Option<T>,
}

/// Arena of `T` with a FIFO free list.
///
/// Handles are `(index, generation)` pairs. Releasing a slot bumps its
/// generation so any handle issued before the release reads as dead. A slot
/// released during tick `t` stays on the free list until tick `t + 1`.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: VecDeque<u32>,
    active: usize,
}

impl<T> Pool<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity).unwrap_or(u32::MAX);
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                released_at: None,
                entry: None,
            })
            .collect();
        Self {
            slots,
            free: (0..capacity).collect(),
            active: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active
    }

    /// Stores `value` in the oldest eligible free slot.
    ///
    /// Returns `None` when every free slot was released during `tick`, or
    /// when the pool is full.
    pub(crate) fn acquire(&mut self, tick: u64, value: T) -> Option<(u32, u32)> {
        let index = *self.free.front()?;
        let slot = &mut self.slots[index as usize];
        if slot.released_at == Some(tick) {
            return None;
        }
        let _ = self.free.pop_front();
        slot.entry = Some(value);
        slot.released_at = None;
        self.active += 1;
        Some((index, slot.generation))
    }

    /// Empties the slot addressed by the handle, returning its entry.
    pub(crate) fn release(&mut self, index: u32, generation: u32, tick: u64) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.released_at = Some(tick);
        self.free.push_back(index);
        self.active -= 1;
        Some(entry)
    }

    pub(crate) fn get(&self, index: u32, generation: u32) -> Option<&T> {
        let slot = self.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub(crate) fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Occupied slots in index order as `(index, generation, entry)`.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|entry| (index as u32, slot.generation, entry))
        })
    }

    /// Handles of every occupied slot in index order.
    pub(crate) fn handles(&self) -> Vec<(u32, u32)> {
        self.iter()
            .map(|(index, generation, _)| (index, generation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_fails_when_exhausted() {
        let mut pool = Pool::with_capacity(2);
        assert!(pool.acquire(1, 'a').is_some());
        assert!(pool.acquire(1, 'b').is_some());
        assert!(pool.acquire(1, 'c').is_none());
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn released_slot_waits_for_next_tick() {
        let mut pool = Pool::with_capacity(1);
        let (index, generation) = pool.acquire(1, 'a').expect("slot");
        assert_eq!(pool.release(index, generation, 2), Some('a'));
        assert!(pool.acquire(2, 'b').is_none());
        let (reused, next_generation) = pool.acquire(3, 'b').expect("slot");
        assert_eq!(reused, index);
        assert_eq!(next_generation, generation + 1);
    }

    #[test]
    fn stale_handle_reads_as_dead() {
        let mut pool = Pool::with_capacity(1);
        let (index, generation) = pool.acquire(1, 'a').expect("slot");
        let _ = pool.release(index, generation, 1);
        let _ = pool.acquire(2, 'b').expect("slot");
        assert!(pool.get(index, generation).is_none());
        assert!(pool.release(index, generation, 2).is_none());
        assert_eq!(pool.active_count(), 1);
    }
}
