//! Handles to the tile and palette VRAM the sprites point at.
//!
//! Allocating that memory is the job of the tiles and palette managers; sprites only
//! hold shared references to what they were given, so the memory stays alive for as
//! long as some sprite still draws with it.

use alloc::rc::Rc;

use super::hw_sprite::BppMode;

/// Number of tile ids addressable from the third attributes word.
const TILE_IDS_COUNT: u16 = 1024;
/// Number of 16 colour palette banks.
const PALETTE_BANKS_COUNT: u8 = 16;

#[derive(Debug)]
struct TilesData {
    id: u16,
    tiles_count: usize,
}

/// Shared handle to a block of sprite tiles in VRAM.
///
/// Two handles are equal if they refer to the same allocation.
#[derive(Debug, Clone)]
pub struct SpriteTilesPtr(Rc<TilesData>);

impl SpriteTilesPtr {
    /// Wrap an allocation made by the tiles manager.
    ///
    /// Panics if `id` can't be expressed in the third attributes word.
    pub fn new(id: u16, tiles_count: usize) -> SpriteTilesPtr {
        assert!(id < TILE_IDS_COUNT, "Invalid sprite tiles id: {}", id);
        return SpriteTilesPtr(Rc::new(TilesData { id, tiles_count }));
    }

    /// Index of the first tile.
    pub fn id(&self) -> u16 {
        return self.0.id;
    }

    /// Number of 4bpp tile slots occupied.
    pub fn tiles_count(&self) -> usize {
        return self.0.tiles_count;
    }

    /// Number of live handles to this allocation.
    pub fn usages(&self) -> usize {
        return Rc::strong_count(&self.0);
    }
}

impl PartialEq for SpriteTilesPtr {
    fn eq(&self, other: &SpriteTilesPtr) -> bool {
        return Rc::ptr_eq(&self.0, &other.0);
    }
}

impl Eq for SpriteTilesPtr {}

#[derive(Debug)]
struct PaletteData {
    id: u8,
    bpp: BppMode,
}

/// Shared handle to a sprite palette in palette RAM.
///
/// Two handles are equal if they refer to the same allocation.
#[derive(Debug, Clone)]
pub struct SpritePalettePtr(Rc<PaletteData>);

impl SpritePalettePtr {
    /// Wrap an allocation made by the palette manager.
    ///
    /// 8bpp palettes always occupy the whole palette RAM, so their bank is 0.
    pub fn new(id: u8, bpp: BppMode) -> SpritePalettePtr {
        assert!(id < PALETTE_BANKS_COUNT, "Invalid sprite palette id: {}", id);
        assert!(
            bpp == BppMode::Bpp4 || id == 0,
            "8bpp sprite palettes must use bank 0, got {}",
            id
        );
        return SpritePalettePtr(Rc::new(PaletteData { id, bpp }));
    }

    /// Palette bank.
    pub fn id(&self) -> u8 {
        return self.0.id;
    }

    pub fn bpp(&self) -> BppMode {
        return self.0.bpp;
    }

    /// Number of live handles to this allocation.
    pub fn usages(&self) -> usize {
        return Rc::strong_count(&self.0);
    }
}

impl PartialEq for SpritePalettePtr {
    fn eq(&self, other: &SpritePalettePtr) -> bool {
        return Rc::ptr_eq(&self.0, &other.0);
    }
}

impl Eq for SpritePalettePtr {}
