//! The OAM mirror, the handle table builder and the dirty range tracker.
//!
//! Visible sprites occupy the slots right after the reserved ones, in sort order. Any change
//! that can alter which sprites are on screen, or their order, schedules a rebuild of the
//! whole table; smaller changes copy the sprite's words into its current slot and extend
//! the range of slots to commit.

use super::error::SpriteError;
use super::hw_attributes::{self, HwSpriteHandle};
use super::item::SpriteItem;
use super::item_pool::ItemPool;
use super::oam::OamTarget;
use super::sorted_sprites::SortedSprites;
use crate::debug_log::Subsystems;
use crate::shared_constants::OAM_SLOTS;

/// Smallest contiguous range of indexes touched since the last flush.
///
/// The empty range is represented by `first == limit`, `last == 0`, so including an index
/// is a plain min/max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitRange {
    first: usize,
    last: usize,
    limit: usize,
}

impl CommitRange {
    pub fn empty(limit: usize) -> CommitRange {
        return CommitRange {
            first: limit,
            last: 0,
            limit,
        };
    }

    pub fn full(limit: usize) -> CommitRange {
        return CommitRange {
            first: 0,
            last: limit - 1,
            limit,
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.first >= self.limit;
    }

    /// First and last index of the range, both inclusive.
    pub fn get(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        return Some((self.first, self.last));
    }

    pub fn include(&mut self, index: usize) {
        self.include_range(index, index);
    }

    pub fn include_range(&mut self, first: usize, last: usize) {
        self.first = self.first.min(first);
        self.last = self.last.max(last);
    }

    /// Replace the range. `first > last` leaves it empty.
    pub fn set(&mut self, first: usize, last: usize) {
        if first > last {
            self.reset();
        } else {
            self.first = first;
            self.last = last;
        }
    }

    pub fn reset(&mut self) {
        self.first = self.limit;
        self.last = 0;
    }
}

pub(crate) struct HandlesTable {
    handles: [HwSpriteHandle; OAM_SLOTS],
    reserved_count: usize,
    last_visible_count: usize,
    rebuild_pending: bool,
    reload_all_pending: bool,
    to_commit: CommitRange,
}

impl HandlesTable {
    /// Every slot starts hidden, and the whole table is pending to be committed
    /// so OAM matches the mirror after the first commit.
    pub fn new(reserved_count: usize) -> HandlesTable {
        let mut table = HandlesTable {
            handles: [HwSpriteHandle::HIDDEN; OAM_SLOTS],
            reserved_count,
            last_visible_count: 0,
            rebuild_pending: false,
            reload_all_pending: false,
            to_commit: CommitRange::full(OAM_SLOTS),
        };
        table.reload_all();
        return table;
    }

    pub fn handles(&self) -> &[HwSpriteHandle; OAM_SLOTS] {
        return &self.handles;
    }

    pub fn reserved_count(&self) -> usize {
        return self.reserved_count;
    }

    pub fn set_reserved_count(&mut self, reserved_count: usize) {
        self.reserved_count = reserved_count;
    }

    pub fn rebuild_pending(&self) -> bool {
        return self.rebuild_pending;
    }

    pub fn schedule_rebuild(&mut self) {
        self.rebuild_pending = true;
    }

    /// Rebuild the table on the next update, hiding the reserved slots and every slot
    /// after the visible ones, and commit all of OAM afterwards.
    pub fn reload_all(&mut self) {
        self.last_visible_count = OAM_SLOTS - self.reserved_count;
        self.rebuild_pending = true;
        self.reload_all_pending = true;
    }

    pub fn to_commit(&self) -> Option<(usize, usize)> {
        return self.to_commit.get();
    }

    /// Copy a sprite into its slot, unless a rebuild is pending and will do it anyway.
    pub fn update_item(&mut self, item: &SpriteItem) {
        if !self.rebuild_pending {
            self.copy_item(item);
        }
    }

    /// Copy a sprite into its slot, if it has one.
    pub fn copy_item(&mut self, item: &SpriteItem) {
        if let Some(handles_index) = item.handles_index {
            let index = usize::from(handles_index);
            hw_attributes::copy_handle(&item.handle, &mut self.handles[index]);
            self.to_commit.include(index);
        }
    }

    /// Write the registers of an affine matrix into the fill words of its slots.
    pub fn set_affine_mat_registers(&mut self, first_slot: usize, registers: &[i16; 4]) {
        for (offset, register) in registers.iter().enumerate() {
            self.handles[first_slot + offset].fill = *register as u16;
        }
    }

    /// Reassign slots to every on screen sprite, if a rebuild is pending.
    pub fn rebuild(
        &mut self,
        sorted: &SortedSprites,
        items: &mut ItemPool<SpriteItem>,
    ) -> Result<(), SpriteError> {
        if !self.rebuild_pending {
            return Ok(());
        }
        let reserved_count = self.reserved_count;
        let reload_all = self.reload_all_pending;
        if reload_all {
            self.reload_all_pending = false;
            for handle in self.handles[..reserved_count].iter_mut() {
                hw_attributes::hide_and_destroy(&mut handle.attr0);
            }
        }

        let available_count = OAM_SLOTS - reserved_count;
        let mut visible_count = 0;
        for index in sorted.iter() {
            let item = items.get_mut(index);
            if item.on_screen {
                if visible_count == available_count {
                    return Err(SpriteError::TooManyOnScreen);
                }
                let handles_index = reserved_count + visible_count;
                hw_attributes::copy_handle(&item.handle, &mut self.handles[handles_index]);
                item.handles_index = Some(handles_index as u8);
                visible_count += 1;
            } else {
                item.handles_index = None;
            }
        }

        let last_visible_count = self.last_visible_count.min(available_count);
        self.rebuild_pending = false;
        self.last_visible_count = visible_count;
        let hide_end = reserved_count + last_visible_count.max(visible_count);
        for handle in self.handles[reserved_count + visible_count..hide_end].iter_mut() {
            hw_attributes::hide_and_destroy(&mut handle.attr0);
        }

        // Slots still pending from before the rebuild stay pending
        if reload_all {
            self.to_commit = CommitRange::full(OAM_SLOTS);
        } else {
            let to_commit_count = visible_count.max(last_visible_count);
            if to_commit_count > 0 {
                self.to_commit
                    .include_range(reserved_count, reserved_count + to_commit_count - 1);
            }
        }
        debug_log!(
            Subsystems::SpritesManager,
            "Rebuilt handles: {} visible sprites (previously {}), commit range {:?}",
            visible_count,
            last_visible_count,
            self.to_commit.get()
        );
        return Ok(());
    }

    /// Flush the pending range, extended by `extra_range`, to OAM.
    pub fn commit(
        &mut self,
        extra_range: Option<(usize, usize)>,
        target: &mut dyn OamTarget,
        use_dma: bool,
    ) {
        let mut range = self.to_commit;
        if let Some((first, last)) = extra_range {
            range.include_range(first, last);
        }
        if let Some((first, last)) = range.get() {
            debug_log!(
                Subsystems::Commit,
                "Committing slots {}..={} ({})",
                first,
                last,
                if use_dma { "DMA" } else { "CPU" }
            );
            target.write_handles(first, &self.handles[first..=last], use_dma);
        }
        self.to_commit.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_starts_empty_and_grows_to_fit() {
        let mut range = CommitRange::empty(OAM_SLOTS);
        assert_eq!(range.get(), None);
        range.include(5);
        range.include(9);
        range.include(3);
        assert_eq!(range.get(), Some((3, 9)));
        range.reset();
        assert!(range.is_empty());
    }

    #[test]
    fn inverted_set_leaves_range_empty() {
        let mut range = CommitRange::full(32);
        assert_eq!(range.get(), Some((0, 31)));
        range.set(4, 2);
        assert_eq!(range.get(), None);
    }
}
