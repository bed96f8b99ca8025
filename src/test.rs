//! Fixtures shared by the tests of every module.

use crate::config::SpritesConfig;
use crate::shared_types::FixedPoint;
use crate::sprite::{BppMode, SpriteHandle, SpritePalettePtr, SpriteShapeSize, SpriteTilesPtr, SpritesManager};

/// Tiles for a sprite of the given size with a 16 colour palette.
pub(crate) fn tiles_for(shape_size: SpriteShapeSize) -> SpriteTilesPtr {
    return SpriteTilesPtr::new(0, shape_size.tiles_count(BppMode::Bpp4));
}

pub(crate) fn palette() -> SpritePalettePtr {
    return SpritePalettePtr::new(1, BppMode::Bpp4);
}

pub(crate) fn manager() -> SpritesManager {
    return manager_with(SpritesConfig::default());
}

pub(crate) fn manager_with(config: SpritesConfig) -> SpritesManager {
    match SpritesManager::init(config) {
        Ok(manager) => return manager,
        Err(err) => panic!("{}", err),
    }
}

/// Create a 16x16 sprite centred at the given position.
pub(crate) fn sprite_at(manager: &mut SpritesManager, x: i32, y: i32) -> SpriteHandle {
    let shape_size = SpriteShapeSize::SIXTEEN_BY_SIXTEEN;
    return manager.create(FixedPoint::from_ints(x, y), shape_size, tiles_for(shape_size), palette());
}
