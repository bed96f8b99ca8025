//! Per-scanline attribute tables for H-Blank effects.
//!
//! An H-Blank effect rewrites one attributes word of a sprite's OAM slot before each scanline
//! is drawn. These functions build the 160 words such an effect writes, from per-scanline
//! logical values, using the same position model as the regular commit path.

use super::attributes::{
    SpriteAffineSecondAttributes, SpriteFirstAttributes, SpriteRegularSecondAttributes,
    SpriteThirdAttributes,
};
use super::error::SpriteError;
use super::hw_attributes::{self, ViewMode};
use super::item::SpriteItem;
use super::item_pool::SpriteHandle;
use super::sprites_manager::{check_bg_priority, SpritesManager};
use crate::debug_log::Subsystems;
use crate::shared_constants::SCREEN_LINES;
use crate::shared_types::{floor_int, Fixed, Point};

/// Distance between the logical position of a sprite and its hardware position.
fn hw_offset(item: &SpriteItem) -> Point {
    return item.hw_position - item.position.floor();
}

/// Mode the sprite is shown in, ignoring whether it's currently on screen.
fn shown_view_mode(item: &SpriteItem) -> ViewMode {
    if item.affine_mat.is_none() {
        return ViewMode::Regular;
    }
    if item.double_size {
        return ViewMode::AffineDoubleSize;
    }
    return ViewMode::Affine;
}

impl SpritesManager {
    /// Second attributes words with the sprite moved horizontally on each line.
    pub fn fill_hblank_horizontal_positions(
        &self,
        handle: SpriteHandle,
        positions: &[Fixed; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        let offset = hw_offset(item).x;
        let mut attr1 = item.handle.attr1;
        for (line, position) in positions.iter().enumerate() {
            hw_attributes::set_x(floor_int(*position) + offset, &mut attr1);
            dest[line] = attr1;
        }
    }

    /// First attributes words with the sprite moved vertically on each line.
    pub fn fill_hblank_vertical_positions(
        &self,
        handle: SpriteHandle,
        positions: &[Fixed; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        let offset = hw_offset(item).y;
        let mut attr0 = item.handle.attr0;
        for (line, position) in positions.iter().enumerate() {
            hw_attributes::set_y(floor_int(*position) + offset, &mut attr0);
            dest[line] = attr0;
        }
    }

    /// Lines whose attributes are not visible get the hidden pattern.
    ///
    /// Panics if a line enables both blending and the window.
    pub fn fill_hblank_first_attributes(
        &self,
        handle: SpriteHandle,
        attributes: &[SpriteFirstAttributes; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        let offset = hw_offset(item).y;
        let shape = hw_attributes::shape(item.handle.attr0);
        let bpp = item.palette.bpp();
        let view_mode = shown_view_mode(item);
        let fade_enabled = self.display().blending_fade_enabled;
        debug_log!(
            Subsystems::HBlank,
            "Filling first attributes of sprite {} ({:?})",
            handle.index(),
            view_mode
        );
        for (line, line_attributes) in attributes.iter().enumerate() {
            if line_attributes.blending_enabled && line_attributes.window_enabled {
                panic!("{}", SpriteError::BlendingAndWindow);
            }
            if !line_attributes.visible {
                dest[line] = hw_attributes::hidden_first_attributes();
                continue;
            }
            dest[line] = hw_attributes::first_attributes(
                floor_int(line_attributes.y) + offset,
                shape,
                bpp,
                view_mode,
                line_attributes.mosaic_enabled,
                line_attributes.blending_enabled,
                line_attributes.window_enabled,
                fade_enabled,
            );
        }
    }

    /// Panics if the sprite is affine.
    pub fn fill_hblank_regular_second_attributes(
        &self,
        handle: SpriteHandle,
        attributes: &[SpriteRegularSecondAttributes; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        if item.affine_mat.is_some() {
            panic!("{}", SpriteError::NotRegular);
        }
        let offset = hw_offset(item).x;
        let size = hw_attributes::size(item.handle.attr1);
        for (line, line_attributes) in attributes.iter().enumerate() {
            dest[line] = hw_attributes::regular_second_attributes(
                floor_int(line_attributes.x) + offset,
                size,
                line_attributes.horizontal_flip,
                line_attributes.vertical_flip,
            );
        }
    }

    /// Panics if the sprite is regular.
    pub fn fill_hblank_affine_second_attributes(
        &self,
        handle: SpriteHandle,
        attributes: &[SpriteAffineSecondAttributes; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        if item.affine_mat.is_none() {
            panic!("{}", SpriteError::NotAffine);
        }
        let offset = hw_offset(item).x;
        let size = hw_attributes::size(item.handle.attr1);
        for (line, line_attributes) in attributes.iter().enumerate() {
            dest[line] = hw_attributes::affine_second_attributes(
                floor_int(line_attributes.x) + offset,
                size,
                line_attributes.affine_mat.id(),
            );
        }
    }

    /// Panics if the tiles of a line don't fit the sprite's shape and size, if a line's palette
    /// has another colour depth than the sprite's, or if a bg priority is out of range.
    pub fn fill_hblank_third_attributes(
        &self,
        handle: SpriteHandle,
        attributes: &[SpriteThirdAttributes; SCREEN_LINES],
        dest: &mut [u16; SCREEN_LINES],
    ) {
        let item = self.item(handle);
        let shape_size = hw_attributes::shape_size(&item.handle);
        let bpp = item.palette.bpp();
        for (line, line_attributes) in attributes.iter().enumerate() {
            if line_attributes.palette.bpp() != bpp {
                panic!("{}", SpriteError::BppMismatch);
            }
            if let Err(err) = check_bg_priority(line_attributes.bg_priority) {
                panic!("{}", err);
            }
            let expected = shape_size.tiles_count(line_attributes.palette.bpp());
            let actual = line_attributes.tiles.tiles_count();
            if actual != expected {
                panic!("{}", SpriteError::InvalidTilesCount { expected, actual });
            }
            dest[line] = hw_attributes::third_attributes(
                line_attributes.tiles.id(),
                line_attributes.palette.id(),
                line_attributes.bg_priority,
            );
        }
    }
}
