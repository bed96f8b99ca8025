use super::affine_mats::AffineMatId;
use super::hw_attributes::{self, HwSpriteHandle};
use super::resources::{SpritePalettePtr, SpriteTilesPtr};
use super::sorted_sprites::SortKey;
use crate::camera::CameraPtr;
use crate::shared_constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::shared_types::{FixedPoint, Point};

/// Whether the area an affine sprite is rendered in is doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteDoubleSizeMode {
    /// Doubled only if the affine matrix would otherwise clip the sprite.
    Auto,
    Enabled,
    Disabled,
}

impl Default for SpriteDoubleSizeMode {
    fn default() -> Self {
        return SpriteDoubleSizeMode::Auto;
    }
}

/// Everything the sprites manager knows about one sprite.
pub(crate) struct SpriteItem {
    /// Mirror of the sprite's OAM words. Only copied to a slot while the sprite is on screen.
    pub handle: HwSpriteHandle,
    /// Logical position of the centre of the sprite.
    pub position: FixedPoint,
    /// Top-left corner written to the hardware words.
    pub hw_position: Point,
    pub usages: u32,
    pub sort_key: SortKey,
    pub tiles: SpriteTilesPtr,
    pub palette: SpritePalettePtr,
    pub affine_mat: Option<AffineMatId>,
    pub camera: Option<CameraPtr>,
    /// OAM slot assigned in the last rebuild.
    pub handles_index: Option<u8>,
    pub half_width: i32,
    pub half_height: i32,
    pub double_size_mode: SpriteDoubleSizeMode,
    pub double_size: bool,
    /// Logical blending flag; the hardware bit also depends on the blend-fade state.
    pub blending_enabled: bool,
    pub visible: bool,
    pub remove_affine_mat_when_not_needed: bool,
    pub on_screen: bool,
    /// Set while the item is queued for an on screen check.
    pub check_on_screen: bool,
}

impl SpriteItem {
    /// Create a regular sprite with default attributes. The hardware words are set up by the caller.
    pub fn new(
        position: FixedPoint,
        sort_key: SortKey,
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
    ) -> SpriteItem {
        return SpriteItem {
            handle: HwSpriteHandle::default(),
            position,
            hw_position: Point::default(),
            usages: 1,
            sort_key,
            tiles,
            palette,
            affine_mat: None,
            camera: None,
            handles_index: None,
            half_width: 0,
            half_height: 0,
            double_size_mode: SpriteDoubleSizeMode::Auto,
            double_size: false,
            blending_enabled: false,
            visible: true,
            remove_affine_mat_when_not_needed: true,
            on_screen: false,
            check_on_screen: false,
        };
    }

    /// Recompute the cached half dimensions, and with them the hardware position.
    pub fn update_half_dimensions(&mut self) {
        let (width, height) = hw_attributes::dimensions(&self.handle, self.double_size);
        self.half_width = width / 2;
        self.half_height = height / 2;
        self.update_hw_position();
    }

    /// Recompute the hardware position from scratch. Returns whether it changed.
    pub fn update_hw_position(&mut self) -> bool {
        let mut real_position = self.position.floor();
        if let Some(camera) = &self.camera {
            real_position = real_position - camera.offset();
        }
        let hw_position = Point::new(
            real_position.x + (SCREEN_WIDTH / 2) - self.half_width,
            real_position.y + (SCREEN_HEIGHT / 2) - self.half_height,
        );
        let changed = hw_position != self.hw_position;
        self.set_hw_position(hw_position);
        return changed;
    }

    pub fn set_hw_position(&mut self, hw_position: Point) {
        self.hw_position = hw_position;
        hw_attributes::set_x(hw_position.x, &mut self.handle.attr1);
        hw_attributes::set_y(hw_position.y, &mut self.handle.attr0);
    }

    pub fn bg_priority(&self) -> i32 {
        return self.sort_key.bg_priority();
    }

    pub fn z_order(&self) -> i32 {
        return self.sort_key.z_order();
    }

    /// Show the mirror in the mode matching the current encoding.
    pub fn show(&mut self) {
        if self.affine_mat.is_some() {
            hw_attributes::show_affine(self.double_size, &mut self.handle.attr0);
        } else {
            hw_attributes::show_regular(&mut self.handle.attr0);
        }
    }
}
