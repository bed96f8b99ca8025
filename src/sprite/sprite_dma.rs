use core::convert::TryInto;
use core::ptr;

use gba::io::dma;

use super::hw_attributes::HwSpriteHandle;
use super::oam::OamTarget;
use crate::shared_constants::{OAM_BASE_ADDR, OAM_SLOTS, OAM_SLOT_NUM_U32S};

const NUM_BYTES_PER_OAM_SLOT: usize = OAM_SLOT_NUM_U32S * 4;

/// The real OAM.
///
/// # Safety
///
/// Commits should only happen during VBlank, otherwise the PPU may render a half-written table.
/// This assumes nothing else writes to the OAM slots the sprites manager owns.
pub struct HardwareOam;

impl OamTarget for HardwareOam {
    fn write_handles(&mut self, first_index: usize, handles: &[HwSpriteHandle], use_dma: bool) {
        // Make sure we don't write past the end of OAM
        if first_index + handles.len() > OAM_SLOTS {
            panic!(
                "Attempt to commit past the end of OAM (first slot: {}, slots: {})",
                first_index,
                handles.len()
            );
        }
        let dest_addr = OAM_BASE_ADDR + (first_index * NUM_BYTES_PER_OAM_SLOT);
        let num_u32s = handles.len() * OAM_SLOT_NUM_U32S;
        // `HwSpriteHandle` is 4-byte aligned and made of two u32's worth of data
        let source = handles.as_ptr() as *const u32;
        if use_dma {
            let count: u16 = match num_u32s.try_into() {
                Ok(count) => count,
                Err(_) => panic!("OAM transfer of {} words is too long for DMA", num_u32s),
            };
            unsafe {
                dma::DMA3::set_source(source);
                dma::DMA3::set_dest(dest_addr as *mut u32);
                dma::DMA3::set_count(count);
                dma::DMA3::set_control(
                    dma::DMAControlSetting::new()
                        .with_enabled(true)
                        .with_use_32bit(true),
                );
            }
        } else {
            // OAM doesn't support byte writes, so copy word by word
            let dest = dest_addr as *mut u32;
            for offset in 0..num_u32s {
                unsafe {
                    ptr::write_volatile(dest.add(offset), ptr::read(source.add(offset)));
                }
            }
        }
    }
}
