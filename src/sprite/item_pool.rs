use alloc::boxed::Box;
use alloc::vec::Vec;

use arrayvec::ArrayVec;

use crate::shared_constants::MAX_SPRITE_ITEMS;

/// Opaque identity of a sprite.
///
/// Besides the slot it lives in, a handle remembers which generation of that slot it
/// was created for, so a handle to a destroyed sprite can't reach whatever got
/// allocated in its place afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    index: u16,
    generation: u16,
}

impl SpriteHandle {
    /// Pool slot the sprite lives in.
    pub fn index(&self) -> usize {
        return usize::from(self.index);
    }
}

struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

/// A fixed-capacity pool. Values never move while alive, so other structures can refer
/// to them by slot index.
pub(crate) struct ItemPool<T> {
    slots: Box<[Slot<T>]>,
    free_indexes: ArrayVec<u16, MAX_SPRITE_ITEMS>,
}

impl<T> ItemPool<T> {
    /// Create a pool with room for `capacity` values.
    ///
    /// Panics if `capacity` exceeds `MAX_SPRITE_ITEMS`.
    pub fn new(capacity: usize) -> ItemPool<T> {
        assert!(
            capacity <= MAX_SPRITE_ITEMS,
            "Pool capacity {} exceeds {}",
            capacity,
            MAX_SPRITE_ITEMS
        );
        let mut slots = Vec::with_capacity(capacity);
        let mut free_indexes = ArrayVec::new();
        for index in 0..capacity {
            slots.push(Slot {
                generation: 0,
                value: None,
            });
            // Lowest indexes are handed out first
            free_indexes.push((capacity - 1 - index) as u16);
        }
        return ItemPool {
            slots: slots.into_boxed_slice(),
            free_indexes,
        };
    }

    /// Number of values currently alive.
    pub fn size(&self) -> usize {
        return self.slots.len() - self.free_indexes.len();
    }

    /// Number of values that can still be created.
    pub fn available(&self) -> usize {
        return self.free_indexes.len();
    }

    pub fn full(&self) -> bool {
        return self.free_indexes.is_empty();
    }

    /// Store a value, returning the slot it went into, or `None` if the pool is full.
    pub fn create(&mut self, value: T) -> Option<u16> {
        let index = self.free_indexes.pop()?;
        self.slots[usize::from(index)].value = Some(value);
        return Some(index);
    }

    /// Remove the value in the given slot, invalidating every handle to it.
    ///
    /// Panics if the slot is empty.
    pub fn destroy(&mut self, index: u16) -> T {
        let slot = &mut self.slots[usize::from(index)];
        let value = slot.value.take().expect("Destroying an empty pool slot");
        slot.generation = slot.generation.wrapping_add(1);
        self.free_indexes.push(index);
        return value;
    }

    /// Handle to the value currently in the given slot.
    pub fn handle(&self, index: u16) -> SpriteHandle {
        return SpriteHandle {
            index,
            generation: self.slots[usize::from(index)].generation,
        };
    }

    /// Slot of the value a handle refers to, if it's still alive.
    pub fn index_of(&self, handle: SpriteHandle) -> Option<u16> {
        let slot = self.slots.get(usize::from(handle.index))?;
        if slot.generation == handle.generation && slot.value.is_some() {
            return Some(handle.index);
        }
        return None;
    }

    /// Value in an occupied slot.
    ///
    /// Panics if the slot is empty.
    pub fn get(&self, index: u16) -> &T {
        return self.slots[usize::from(index)]
            .value
            .as_ref()
            .expect("Accessing an empty pool slot");
    }

    /// Value in an occupied slot.
    ///
    /// Panics if the slot is empty.
    pub fn get_mut(&mut self, index: u16) -> &mut T {
        return self.slots[usize::from(index)]
            .value
            .as_mut()
            .expect("Accessing an empty pool slot");
    }

    /// Every value alongside its slot, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u16, &mut T)> + '_ {
        return self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.value.as_mut().map(|value| (index as u16, value)));
    }
}
