//! Destinations for committed OAM slots.

use alloc::vec::Vec;

use super::hw_attributes::HwSpriteHandle;
use crate::shared_constants::OAM_SLOTS;

/// Something the OAM mirror can be flushed into.
pub trait OamTarget {
    /// Copy `handles` into consecutive slots starting at `first_index`.
    /// `use_dma` asks for a DMA transfer instead of a CPU copy, where the target can tell the difference.
    fn write_handles(&mut self, first_index: usize, handles: &[HwSpriteHandle], use_dma: bool);
}

/// A single flush into an `OamImage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OamTransfer {
    pub first_index: usize,
    pub count: usize,
    pub use_dma: bool,
}

/// An in-memory OAM, for running the sprite subsystem anywhere but on the console.
///
/// Every flush is recorded, so callers can see how much was transferred and how.
pub struct OamImage {
    slots: [HwSpriteHandle; OAM_SLOTS],
    transfers: Vec<OamTransfer>,
}

impl OamImage {
    /// An image where every slot is zeroed, like OAM after power-on.
    pub fn new() -> OamImage {
        return OamImage {
            slots: [HwSpriteHandle::default(); OAM_SLOTS],
            transfers: Vec::new(),
        };
    }

    pub fn slot(&self, index: usize) -> &HwSpriteHandle {
        return &self.slots[index];
    }

    pub fn slots(&self) -> &[HwSpriteHandle; OAM_SLOTS] {
        return &self.slots;
    }

    /// Flushes received since creation or the last `clear_transfers()`, oldest first.
    pub fn transfers(&self) -> &[OamTransfer] {
        return &self.transfers;
    }

    pub fn clear_transfers(&mut self) {
        self.transfers.clear();
    }
}

impl Default for OamImage {
    fn default() -> Self {
        return OamImage::new();
    }
}

impl OamTarget for OamImage {
    fn write_handles(&mut self, first_index: usize, handles: &[HwSpriteHandle], use_dma: bool) {
        self.slots[first_index..first_index + handles.len()].copy_from_slice(handles);
        self.transfers.push(OamTransfer {
            first_index,
            count: handles.len(),
            use_dma,
        });
    }
}
