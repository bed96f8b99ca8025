//! Bundles of sprite properties matching each hardware attributes word.
//!
//! They let callers read or write everything a word holds at once, and are the
//! per-scanline inputs of the H-Blank fill functions.

use super::affine_mats::AffineMatId;
use super::resources::{SpritePalettePtr, SpriteTilesPtr};
use crate::shared_types::Fixed;

/// Properties stored in the first attributes word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFirstAttributes {
    pub y: Fixed,
    pub mosaic_enabled: bool,
    pub blending_enabled: bool,
    pub window_enabled: bool,
    pub visible: bool,
}

impl SpriteFirstAttributes {
    pub fn new(
        y: Fixed,
        mosaic_enabled: bool,
        blending_enabled: bool,
        window_enabled: bool,
        visible: bool,
    ) -> SpriteFirstAttributes {
        return SpriteFirstAttributes {
            y,
            mosaic_enabled,
            blending_enabled,
            window_enabled,
            visible,
        };
    }
}

/// Properties stored in the second attributes word of a regular sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRegularSecondAttributes {
    pub x: Fixed,
    pub horizontal_flip: bool,
    pub vertical_flip: bool,
}

impl SpriteRegularSecondAttributes {
    pub fn new(x: Fixed, horizontal_flip: bool, vertical_flip: bool) -> SpriteRegularSecondAttributes {
        return SpriteRegularSecondAttributes {
            x,
            horizontal_flip,
            vertical_flip,
        };
    }
}

/// Properties stored in the second attributes word of an affine sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAffineSecondAttributes {
    pub x: Fixed,
    pub affine_mat: AffineMatId,
}

impl SpriteAffineSecondAttributes {
    pub fn new(x: Fixed, affine_mat: AffineMatId) -> SpriteAffineSecondAttributes {
        return SpriteAffineSecondAttributes { x, affine_mat };
    }
}

/// Properties stored in the third attributes word.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteThirdAttributes {
    pub tiles: SpriteTilesPtr,
    pub palette: SpritePalettePtr,
    pub bg_priority: i32,
}

impl SpriteThirdAttributes {
    pub fn new(
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
        bg_priority: i32,
    ) -> SpriteThirdAttributes {
        return SpriteThirdAttributes {
            tiles,
            palette,
            bg_priority,
        };
    }
}
