//! The sprites manager: the single entry point to the sprite subsystem.
//!
//! Sprites are created, mutated and destroyed through `SpritesManager` by handle. Mutations
//! only touch the sprite's OAM mirror and schedule work; `update()` then settles which
//! sprites are on screen and which OAM slots they get, and `commit()` flushes the slots
//! that changed to OAM.

use arrayvec::ArrayVec;

use super::affine_mats::{AffineMatAttributes, AffineMatId, AffineMatsManager, AffineMatsUpdate};
use super::attributes::{
    SpriteAffineSecondAttributes, SpriteFirstAttributes, SpriteRegularSecondAttributes,
    SpriteThirdAttributes,
};
use super::builder::SpriteBuilder;
use super::error::SpriteError;
use super::handles::HandlesTable;
use super::hw_attributes::{self, ViewMode};
use super::hw_sprite::SpriteShapeSize;
use super::item::{SpriteDoubleSizeMode, SpriteItem};
use super::item_pool::{ItemPool, SpriteHandle};
use super::oam::OamTarget;
use super::on_screen;
use super::resources::{SpritePalettePtr, SpriteTilesPtr};
use super::sorted_sprites::{SortKey, SortedSprites};
use crate::camera::CameraPtr;
use crate::config::SpritesConfig;
use crate::debug_log::Subsystems;
use crate::shared_constants::{
    AFFINE_MAT_SLOTS, MAX_BG_PRIORITY, MAX_SPRITE_ITEMS, MAX_Z_ORDER, MIN_Z_ORDER, OAM_SLOTS,
};
use crate::shared_types::{DisplayState, Fixed, FixedPoint, Point};

/// Unwrap the result of an operation whose failure is a programmer error.
fn fatal<T>(result: Result<T, SpriteError>) -> T {
    match result {
        Ok(value) => return value,
        Err(err) => panic!("{}", err),
    }
}

pub(super) fn check_bg_priority(bg_priority: i32) -> Result<(), SpriteError> {
    if bg_priority < 0 || bg_priority > MAX_BG_PRIORITY {
        return Err(SpriteError::InvalidBgPriority(bg_priority));
    }
    return Ok(());
}

fn check_z_order(z_order: i32) -> Result<(), SpriteError> {
    if z_order < MIN_Z_ORDER || z_order > MAX_Z_ORDER {
        return Err(SpriteError::InvalidZOrder(z_order));
    }
    return Ok(());
}

fn check_tiles_count(
    shape_size: SpriteShapeSize,
    tiles: &SpriteTilesPtr,
    palette: &SpritePalettePtr,
) -> Result<(), SpriteError> {
    let expected = shape_size.tiles_count(palette.bpp());
    if tiles.tiles_count() != expected {
        return Err(SpriteError::InvalidTilesCount {
            expected,
            actual: tiles.tiles_count(),
        });
    }
    return Ok(());
}

/// Double size state of a sprite drawn through the given matrix.
fn affine_double_size(
    double_size_mode: SpriteDoubleSizeMode,
    affine_mats: &AffineMatsManager,
    affine_mat: AffineMatId,
    shape_size: SpriteShapeSize,
) -> bool {
    return match double_size_mode {
        SpriteDoubleSizeMode::Auto => affine_mats.sprite_double_size(affine_mat, shape_size),
        SpriteDoubleSizeMode::Enabled => true,
        SpriteDoubleSizeMode::Disabled => false,
    };
}

pub struct SpritesManager {
    config: SpritesConfig,
    items: ItemPool<SpriteItem>,
    sorted: SortedSprites,
    table: HandlesTable,
    affine_mats: AffineMatsManager,
    display: DisplayState,
    /// Items with `check_on_screen` set, and no others.
    items_to_check: ArrayVec<u16, MAX_SPRITE_ITEMS>,
    check_items_on_screen: bool,
}

impl SpritesManager {
    /// Set up the subsystem. Every OAM slot starts hidden and is committed on the first `commit()`.
    pub fn init(config: SpritesConfig) -> Result<SpritesManager, SpriteError> {
        config.validate()?;
        let mut affine_mats = AffineMatsManager::new(config.max_items);
        affine_mats.reserve_sprite_handles(config.reserved_handles_count);
        debug_log!(
            Subsystems::SpritesManager,
            "Init: {} items, {} sort layers, {} reserved handles",
            config.max_items,
            config.max_sort_layers,
            config.reserved_handles_count
        );
        return Ok(SpritesManager {
            config,
            items: ItemPool::new(config.max_items),
            sorted: SortedSprites::new(config.max_sort_layers, config.max_items),
            table: HandlesTable::new(config.reserved_handles_count),
            affine_mats,
            display: DisplayState::default(),
            items_to_check: ArrayVec::new(),
            check_items_on_screen: false,
        });
    }

    pub fn shutdown(self) {
        debug_log!(
            Subsystems::SpritesManager,
            "Shutdown with {} sprites alive",
            self.items.size()
        );
    }

    pub fn config(&self) -> &SpritesConfig {
        return &self.config;
    }

    /// Whether the handle refers to a sprite that is still alive.
    pub fn contains(&self, handle: SpriteHandle) -> bool {
        return self.items.index_of(handle).is_some();
    }

    pub fn used_items_count(&self) -> usize {
        return self.items.size();
    }

    pub fn available_items_count(&self) -> usize {
        return self.items.available();
    }

    pub fn affine_mats(&self) -> &AffineMatsManager {
        return &self.affine_mats;
    }

    /// Affine matrix changes made through here reach the sprites using them on the next `update()`.
    pub fn affine_mats_mut(&mut self) -> &mut AffineMatsManager {
        return &mut self.affine_mats;
    }

    // Creation and destruction.

    /// Create a visible regular sprite with default attributes.
    ///
    /// Panics if there's no room for it or the tiles don't fit the shape and size.
    pub fn create(
        &mut self,
        position: FixedPoint,
        shape_size: SpriteShapeSize,
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
    ) -> SpriteHandle {
        return self.create_from_builder(
            SpriteBuilder::new(shape_size, tiles, palette).with_position(position),
        );
    }

    /// Like `create()`, but returns `None` if the sprite or sort layer pools are exhausted.
    pub fn create_optional(
        &mut self,
        position: FixedPoint,
        shape_size: SpriteShapeSize,
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
    ) -> Option<SpriteHandle> {
        return self.create_from_builder_optional(
            SpriteBuilder::new(shape_size, tiles, palette).with_position(position),
        );
    }

    pub fn create_from_builder(&mut self, builder: SpriteBuilder) -> SpriteHandle {
        return fatal(self.try_create(builder));
    }

    pub fn create_from_builder_optional(&mut self, builder: SpriteBuilder) -> Option<SpriteHandle> {
        match self.try_create(builder) {
            Ok(handle) => return Some(handle),
            Err(err @ SpriteError::ItemsPoolFull) | Err(err @ SpriteError::SortLayersFull) => {
                debug_log!(Subsystems::SpritesManager, "Sprite not created: {}", err);
                return None;
            }
            Err(err) => panic!("{}", err),
        }
    }

    fn try_create(&mut self, builder: SpriteBuilder) -> Result<SpriteHandle, SpriteError> {
        check_bg_priority(builder.bg_priority)?;
        check_z_order(builder.z_order)?;
        check_tiles_count(builder.shape_size, &builder.tiles, &builder.palette)?;
        if builder.blending_enabled && builder.window_enabled {
            return Err(SpriteError::BlendingAndWindow);
        }
        if self.items.full() {
            return Err(SpriteError::ItemsPoolFull);
        }

        let shape_size = builder.shape_size;
        let sort_key = SortKey::new(builder.bg_priority, builder.z_order);
        let bpp = builder.palette.bpp();
        let tiles_id = builder.tiles.id();
        let palette_id = builder.palette.id();
        let mut item = SpriteItem::new(builder.position, sort_key, builder.tiles, builder.palette);
        item.camera = builder.camera;
        item.double_size_mode = builder.double_size_mode;
        item.blending_enabled = builder.blending_enabled;
        item.visible = builder.visible;
        item.remove_affine_mat_when_not_needed = builder.remove_affine_mat_when_not_needed;

        // A matrix which does nothing but flip isn't worth a matrix slot
        let mut affine_mat = builder.affine_mat;
        let mut horizontal_flip = builder.horizontal_flip;
        let mut vertical_flip = builder.vertical_flip;
        if let Some(id) = affine_mat {
            if item.remove_affine_mat_when_not_needed && self.affine_mats.is_flipped_identity(id) {
                horizontal_flip = self.affine_mats.horizontal_flip(id);
                vertical_flip = self.affine_mats.vertical_flip(id);
                affine_mat = None;
            }
        }

        let mut view_mode = match affine_mat {
            Some(id) => {
                item.double_size =
                    affine_double_size(item.double_size_mode, &self.affine_mats, id, shape_size);
                if item.double_size {
                    ViewMode::AffineDoubleSize
                } else {
                    ViewMode::Affine
                }
            }
            None => ViewMode::Regular,
        };
        if !item.visible {
            view_mode = ViewMode::Hidden;
        }
        item.handle.attr0 = hw_attributes::first_attributes(
            0,
            shape_size.shape(),
            bpp,
            view_mode,
            builder.mosaic_enabled,
            builder.blending_enabled,
            builder.window_enabled,
            self.display.blending_fade_enabled,
        );
        item.handle.attr1 = match affine_mat {
            Some(id) => hw_attributes::affine_second_attributes(0, shape_size.size(), id.id()),
            None => hw_attributes::regular_second_attributes(
                0,
                shape_size.size(),
                horizontal_flip,
                vertical_flip,
            ),
        };
        item.handle.attr2 = hw_attributes::third_attributes(tiles_id, palette_id, builder.bg_priority);
        item.affine_mat = affine_mat;
        item.update_half_dimensions();

        let visible = item.visible;
        let index = self.items.create(item).ok_or(SpriteError::ItemsPoolFull)?;
        if let Err(err) = self.sorted.insert(index, sort_key) {
            self.items.destroy(index);
            return Err(err);
        }
        if let Some(id) = affine_mat {
            self.affine_mats.increase_usages(id);
            self.affine_mats.attach_sprite(id, index);
        }
        if visible {
            self.schedule_on_screen_check(index);
            self.table.schedule_rebuild();
        }
        return Ok(self.items.handle(index));
    }

    pub fn usages(&self, handle: SpriteHandle) -> u32 {
        return self.item(handle).usages;
    }

    pub fn increase_usages(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        self.items.get_mut(index).usages += 1;
    }

    /// Drop one usage of a sprite, destroying it when none remain.
    pub fn decrease_usages(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        item.usages -= 1;
        if item.usages == 0 {
            self.destroy(index);
        }
    }

    fn destroy(&mut self, index: u16) {
        self.sorted.erase(index);
        let item = self.items.destroy(index);
        if let Some(id) = item.affine_mat {
            self.affine_mats.dettach_sprite(id, index);
            self.affine_mats.decrease_usages(id);
        }
        if item.check_on_screen {
            self.forget_on_screen_check(index);
        }
        if item.visible {
            self.table.schedule_rebuild();
        }
    }

    // Handle lookup.

    fn index(&self, handle: SpriteHandle) -> u16 {
        match self.items.index_of(handle) {
            Some(index) => return index,
            None => panic!("{}", SpriteError::InvalidHandle),
        }
    }

    pub(super) fn item(&self, handle: SpriteHandle) -> &SpriteItem {
        return self.items.get(self.index(handle));
    }

    pub(super) fn display(&self) -> DisplayState {
        return self.display;
    }

    /// OAM slot the sprite was given in the last update, if it's on screen.
    pub fn hw_id(&self, handle: SpriteHandle) -> Option<usize> {
        return self.item(handle).handles_index.map(usize::from);
    }

    // Shape, tiles and palette.

    pub fn shape_size(&self, handle: SpriteHandle) -> SpriteShapeSize {
        return hw_attributes::shape_size(&self.item(handle).handle);
    }

    /// Size of the area the sprite is rendered in, doubled in double size mode.
    pub fn dimensions(&self, handle: SpriteHandle) -> (i32, i32) {
        let item = self.item(handle);
        return (item.half_width * 2, item.half_height * 2);
    }

    pub fn view_mode(&self, handle: SpriteHandle) -> ViewMode {
        return hw_attributes::view_mode(self.item(handle).handle.attr0);
    }

    pub fn tiles(&self, handle: SpriteHandle) -> &SpriteTilesPtr {
        return &self.item(handle).tiles;
    }

    /// Panics if the tiles don't fit the current shape, size and palette.
    pub fn set_tiles(&mut self, handle: SpriteHandle, tiles: SpriteTilesPtr) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if tiles == item.tiles {
            return;
        }
        let shape_size = hw_attributes::shape_size(&item.handle);
        fatal(check_tiles_count(shape_size, &tiles, &item.palette));
        hw_attributes::set_tiles_id(tiles.id(), &mut item.handle.attr2);
        item.tiles = tiles;
        self.table.update_item(item);
    }

    pub fn set_tiles_with_shape_size(
        &mut self,
        handle: SpriteHandle,
        shape_size: SpriteShapeSize,
        tiles: SpriteTilesPtr,
    ) {
        let palette = self.item(handle).palette.clone();
        self.set_tiles_and_palette(handle, shape_size, tiles, palette);
    }

    pub fn palette(&self, handle: SpriteHandle) -> &SpritePalettePtr {
        return &self.item(handle).palette;
    }

    /// Panics if the new palette's colour depth differs from the current one.
    pub fn set_palette(&mut self, handle: SpriteHandle, palette: SpritePalettePtr) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if palette == item.palette {
            return;
        }
        if palette.bpp() != item.palette.bpp() {
            panic!("{}", SpriteError::BppMismatch);
        }
        hw_attributes::set_palette_id(palette.id(), &mut item.handle.attr2);
        item.palette = palette;
        self.table.update_item(item);
    }

    /// Replace shape, size, tiles and palette at once, which also allows changing the colour depth.
    pub fn set_tiles_and_palette(
        &mut self,
        handle: SpriteHandle,
        shape_size: SpriteShapeSize,
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
    ) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        let different_shape_size = shape_size != hw_attributes::shape_size(&item.handle);
        let different_tiles = tiles != item.tiles;
        let different_palette = palette != item.palette;
        if !different_shape_size && !different_tiles && !different_palette {
            return;
        }
        fatal(check_tiles_count(shape_size, &tiles, &palette));
        if different_tiles {
            hw_attributes::set_tiles_id(tiles.id(), &mut item.handle.attr2);
            item.tiles = tiles;
        }
        if different_palette {
            hw_attributes::set_palette_id(palette.id(), &mut item.handle.attr2);
            hw_attributes::set_bpp(palette.bpp(), &mut item.handle.attr0);
            item.palette = palette;
        }
        if different_shape_size {
            self.set_item_shape_size(index, shape_size);
        } else {
            self.table.update_item(item);
        }
    }

    fn set_item_shape_size(&mut self, index: u16, shape_size: SpriteShapeSize) {
        let item = self.items.get_mut(index);
        hw_attributes::set_shape_size(shape_size, &mut item.handle);
        if let Some(id) = item.affine_mat {
            let double_size =
                affine_double_size(item.double_size_mode, &self.affine_mats, id, shape_size);
            if double_size != item.double_size {
                item.double_size = double_size;
                if item.visible {
                    hw_attributes::show_affine(double_size, &mut item.handle.attr0);
                }
            }
        }
        self.update_item_dimensions(index);
    }

    /// Dimensions changed, so the sprite may have entered or left the screen.
    fn update_item_dimensions(&mut self, index: u16) {
        let item = self.items.get_mut(index);
        item.update_half_dimensions();
        if item.visible {
            self.schedule_on_screen_check(index);
        }
    }

    // Position.

    pub fn position(&self, handle: SpriteHandle) -> FixedPoint {
        return self.item(handle).position;
    }

    /// Top-left corner written to the hardware words.
    pub fn hw_position(&self, handle: SpriteHandle) -> Point {
        return self.item(handle).hw_position;
    }

    pub fn x(&self, handle: SpriteHandle) -> Fixed {
        return self.item(handle).position.x;
    }

    pub fn y(&self, handle: SpriteHandle) -> Fixed {
        return self.item(handle).position.y;
    }

    pub fn set_x(&mut self, handle: SpriteHandle, x: Fixed) {
        let y = self.item(handle).position.y;
        self.set_position(handle, FixedPoint::new(x, y));
    }

    pub fn set_y(&mut self, handle: SpriteHandle, y: Fixed) {
        let x = self.item(handle).position.x;
        self.set_position(handle, FixedPoint::new(x, y));
    }

    /// Move the centre of the sprite. Sub-pixel moves only update the logical position.
    pub fn set_position(&mut self, handle: SpriteHandle, position: FixedPoint) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        let diff = position.floor() - item.position.floor();
        item.position = position;
        if diff == Point::default() {
            return;
        }
        let hw_position = item.hw_position + diff;
        item.set_hw_position(hw_position);
        if item.visible {
            self.schedule_on_screen_check(index);
        }
    }

    // Ordering.

    pub fn bg_priority(&self, handle: SpriteHandle) -> i32 {
        return self.item(handle).bg_priority();
    }

    /// Panics if `bg_priority` is not in `0..=3`.
    pub fn set_bg_priority(&mut self, handle: SpriteHandle, bg_priority: i32) {
        fatal(check_bg_priority(bg_priority));
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if bg_priority == item.bg_priority() {
            return;
        }
        hw_attributes::set_bg_priority(bg_priority, &mut item.handle.attr2);
        let sort_key = SortKey::new(bg_priority, item.z_order());
        self.set_sort_key(index, sort_key);
    }

    pub fn z_order(&self, handle: SpriteHandle) -> i32 {
        return self.item(handle).z_order();
    }

    /// Panics if `z_order` is not in `-32767..=32767`.
    pub fn set_z_order(&mut self, handle: SpriteHandle, z_order: i32) {
        fatal(check_z_order(z_order));
        let index = self.index(handle);
        let item = self.items.get(index);
        if z_order == item.z_order() {
            return;
        }
        let sort_key = SortKey::new(item.bg_priority(), z_order);
        self.set_sort_key(index, sort_key);
    }

    fn set_sort_key(&mut self, index: u16, sort_key: SortKey) {
        self.sorted.erase(index);
        let item = self.items.get_mut(index);
        item.sort_key = sort_key;
        let on_screen = item.on_screen;
        fatal(self.sorted.insert(index, sort_key));
        if on_screen {
            self.table.schedule_rebuild();
        }
    }

    /// Draw the sprite above every other sprite with the same bg priority and z order.
    pub fn put_above(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        if self.sorted.put_in_front_of_layer(index) && self.items.get(index).on_screen {
            self.table.schedule_rebuild();
        }
    }

    /// Draw the sprite below every other sprite with the same bg priority and z order.
    pub fn put_below(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        if self.sorted.put_in_back_of_layer(index) && self.items.get(index).on_screen {
            self.table.schedule_rebuild();
        }
    }

    // Flags.

    pub fn horizontal_flip(&self, handle: SpriteHandle) -> bool {
        let item = self.item(handle);
        return match item.affine_mat {
            Some(id) => self.affine_mats.horizontal_flip(id),
            None => hw_attributes::horizontal_flip(item.handle.attr1),
        };
    }

    /// Flips of affine sprites live in their matrix, so this changes the matrix for every sprite using it.
    pub fn set_horizontal_flip(&mut self, handle: SpriteHandle, horizontal_flip: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        match item.affine_mat {
            Some(id) => self.affine_mats.set_horizontal_flip(id, horizontal_flip),
            None => {
                hw_attributes::set_horizontal_flip(horizontal_flip, &mut item.handle.attr1);
                self.table.update_item(item);
            }
        }
    }

    pub fn vertical_flip(&self, handle: SpriteHandle) -> bool {
        let item = self.item(handle);
        return match item.affine_mat {
            Some(id) => self.affine_mats.vertical_flip(id),
            None => hw_attributes::vertical_flip(item.handle.attr1),
        };
    }

    pub fn set_vertical_flip(&mut self, handle: SpriteHandle, vertical_flip: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        match item.affine_mat {
            Some(id) => self.affine_mats.set_vertical_flip(id, vertical_flip),
            None => {
                hw_attributes::set_vertical_flip(vertical_flip, &mut item.handle.attr1);
                self.table.update_item(item);
            }
        }
    }

    pub fn mosaic_enabled(&self, handle: SpriteHandle) -> bool {
        return hw_attributes::mosaic_enabled(self.item(handle).handle.attr0);
    }

    pub fn set_mosaic_enabled(&mut self, handle: SpriteHandle, mosaic_enabled: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        hw_attributes::set_mosaic_enabled(mosaic_enabled, &mut item.handle.attr0);
        self.table.update_item(item);
    }

    pub fn blending_enabled(&self, handle: SpriteHandle) -> bool {
        return self.item(handle).blending_enabled;
    }

    /// Panics if enabling blending while the window is enabled.
    pub fn set_blending_enabled(&mut self, handle: SpriteHandle, blending_enabled: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if blending_enabled && hw_attributes::window_enabled(item.handle.attr0) {
            panic!("{}", SpriteError::BlendingAndWindow);
        }
        item.blending_enabled = blending_enabled;
        hw_attributes::set_blending_enabled(
            blending_enabled,
            self.display.blending_fade_enabled,
            &mut item.handle.attr0,
        );
        self.table.update_item(item);
    }

    pub fn window_enabled(&self, handle: SpriteHandle) -> bool {
        return hw_attributes::window_enabled(self.item(handle).handle.attr0);
    }

    /// Panics if enabling the window while blending is enabled.
    pub fn set_window_enabled(&mut self, handle: SpriteHandle, window_enabled: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if window_enabled && item.blending_enabled {
            panic!("{}", SpriteError::BlendingAndWindow);
        }
        hw_attributes::set_window_enabled(window_enabled, &mut item.handle.attr0);
        self.table.update_item(item);
    }

    pub fn double_size(&self, handle: SpriteHandle) -> bool {
        return self.item(handle).double_size;
    }

    pub fn double_size_mode(&self, handle: SpriteHandle) -> SpriteDoubleSizeMode {
        return self.item(handle).double_size_mode;
    }

    pub fn set_double_size_mode(&mut self, handle: SpriteHandle, double_size_mode: SpriteDoubleSizeMode) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if double_size_mode == item.double_size_mode {
            return;
        }
        item.double_size_mode = double_size_mode;
        if let Some(id) = item.affine_mat {
            let shape_size = hw_attributes::shape_size(&item.handle);
            let double_size = affine_double_size(double_size_mode, &self.affine_mats, id, shape_size);
            if double_size != item.double_size {
                item.double_size = double_size;
                if item.visible {
                    hw_attributes::show_affine(double_size, &mut item.handle.attr0);
                }
                self.update_item_dimensions(index);
            }
        }
    }

    pub fn visible(&self, handle: SpriteHandle) -> bool {
        return self.item(handle).visible;
    }

    pub fn set_visible(&mut self, handle: SpriteHandle, visible: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if visible == item.visible {
            return;
        }
        item.visible = visible;
        if visible {
            item.show();
            self.schedule_on_screen_check(index);
        } else {
            hw_attributes::hide(&mut item.handle.attr0);
            item.on_screen = false;
            if item.check_on_screen {
                item.check_on_screen = false;
                self.forget_on_screen_check(index);
            }
        }
        self.table.schedule_rebuild();
    }

    /// Whether the last update found the sprite visible and inside the screen.
    pub fn on_screen(&self, handle: SpriteHandle) -> bool {
        return self.item(handle).on_screen;
    }

    // Camera.

    pub fn camera(&self, handle: SpriteHandle) -> Option<&CameraPtr> {
        return self.item(handle).camera.as_ref();
    }

    pub fn set_camera(&mut self, handle: SpriteHandle, camera: CameraPtr) {
        self.replace_camera(handle, Some(camera));
    }

    pub fn remove_camera(&mut self, handle: SpriteHandle) {
        self.replace_camera(handle, None);
    }

    fn replace_camera(&mut self, handle: SpriteHandle, camera: Option<CameraPtr>) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        if camera == item.camera {
            return;
        }
        item.camera = camera;
        if item.update_hw_position() && item.visible {
            self.schedule_on_screen_check(index);
        }
    }

    /// Recompute the hardware position of every sprite following a camera.
    /// Call it after moving cameras and before `update()`.
    pub fn update_cameras(&mut self) {
        for (index, item) in self.items.iter_mut() {
            if item.camera.is_some() && item.update_hw_position() && item.visible {
                if !item.check_on_screen {
                    item.check_on_screen = true;
                    self.items_to_check.push(index);
                }
                self.check_items_on_screen = true;
            }
        }
    }

    // Affine matrices.

    pub fn affine_mat(&self, handle: SpriteHandle) -> Option<AffineMatId> {
        return self.item(handle).affine_mat;
    }

    /// Draw the sprite through an existing matrix, taking a usage of it.
    pub fn set_affine_mat(&mut self, handle: SpriteHandle, affine_mat: AffineMatId) {
        let index = self.index(handle);
        if self.items.get(index).affine_mat == Some(affine_mat) {
            return;
        }
        self.affine_mats.increase_usages(affine_mat);
        self.assign_affine_mat(index, affine_mat, false);
    }

    /// Draw the sprite through a new matrix which keeps the sprite's current flips.
    /// The matrix is released once it stops doing anything but flipping.
    ///
    /// Panics if every affine matrix is in use.
    pub fn set_new_affine_mat(&mut self, handle: SpriteHandle, mut attributes: AffineMatAttributes) {
        attributes.set_horizontal_flip(self.horizontal_flip(handle));
        attributes.set_vertical_flip(self.vertical_flip(handle));
        let index = self.index(handle);
        let affine_mat = self.affine_mats.create(attributes);
        self.assign_affine_mat(index, affine_mat, true);
    }

    /// Takes over a usage of `affine_mat` the caller already holds.
    fn assign_affine_mat(&mut self, index: u16, affine_mat: AffineMatId, remove_when_not_needed: bool) {
        let item = self.items.get_mut(index);
        item.remove_affine_mat_when_not_needed = remove_when_not_needed;
        if let Some(old_affine_mat) = item.affine_mat {
            self.affine_mats.dettach_sprite(old_affine_mat, index);
            self.affine_mats.decrease_usages(old_affine_mat);
        }
        item.affine_mat = Some(affine_mat);
        self.affine_mats.attach_sprite(affine_mat, index);

        let shape_size = hw_attributes::shape_size(&item.handle);
        let double_size =
            affine_double_size(item.double_size_mode, &self.affine_mats, affine_mat, shape_size);
        hw_attributes::set_affine_mat_id(affine_mat.id(), &mut item.handle.attr1);
        if item.visible {
            hw_attributes::show_affine(double_size, &mut item.handle.attr0);
        }
        if double_size != item.double_size {
            item.double_size = double_size;
            self.update_item_dimensions(index);
        } else {
            self.table.update_item(item);
        }
    }

    /// Go back to a regular sprite, keeping the flips of the matrix.
    pub fn remove_affine_mat(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        self.remove_item_affine_mat(index);
    }

    fn remove_item_affine_mat(&mut self, index: u16) {
        let item = self.items.get_mut(index);
        let affine_mat = match item.affine_mat {
            Some(affine_mat) => affine_mat,
            None => return,
        };
        let horizontal_flip = self.affine_mats.horizontal_flip(affine_mat);
        let vertical_flip = self.affine_mats.vertical_flip(affine_mat);
        hw_attributes::set_affine_mat_id(0, &mut item.handle.attr1);
        hw_attributes::set_horizontal_flip(horizontal_flip, &mut item.handle.attr1);
        hw_attributes::set_vertical_flip(vertical_flip, &mut item.handle.attr1);
        if item.visible {
            hw_attributes::show_regular(&mut item.handle.attr0);
        }
        item.affine_mat = None;
        self.affine_mats.dettach_sprite(affine_mat, index);
        self.affine_mats.decrease_usages(affine_mat);
        if item.double_size {
            item.double_size = false;
            self.update_item_dimensions(index);
        } else {
            self.table.update_item(item);
        }
    }

    pub fn remove_affine_mat_when_not_needed(&self, handle: SpriteHandle) -> bool {
        return self.item(handle).remove_affine_mat_when_not_needed;
    }

    /// If set, the sprite goes back to regular once its matrix only flips.
    pub fn set_remove_affine_mat_when_not_needed(&mut self, handle: SpriteHandle, remove: bool) {
        let index = self.index(handle);
        let item = self.items.get_mut(index);
        item.remove_affine_mat_when_not_needed = remove;
        if let Some(affine_mat) = item.affine_mat {
            if remove && self.affine_mats.is_flipped_identity(affine_mat) {
                self.remove_item_affine_mat(index);
            }
        }
    }

    // Attribute bundles.

    pub fn first_attributes(&self, handle: SpriteHandle) -> SpriteFirstAttributes {
        let item = self.item(handle);
        return SpriteFirstAttributes::new(
            item.position.y,
            hw_attributes::mosaic_enabled(item.handle.attr0),
            item.blending_enabled,
            hw_attributes::window_enabled(item.handle.attr0),
            item.visible,
        );
    }

    pub fn set_first_attributes(&mut self, handle: SpriteHandle, attributes: SpriteFirstAttributes) {
        self.set_y(handle, attributes.y);
        self.set_mosaic_enabled(handle, attributes.mosaic_enabled);
        // Whichever flag ends up disabled is written first
        if attributes.blending_enabled {
            self.set_window_enabled(handle, attributes.window_enabled);
            self.set_blending_enabled(handle, true);
        } else {
            self.set_blending_enabled(handle, false);
            self.set_window_enabled(handle, attributes.window_enabled);
        }
        self.set_visible(handle, attributes.visible);
    }

    /// Panics if the sprite is affine.
    pub fn regular_second_attributes(&self, handle: SpriteHandle) -> SpriteRegularSecondAttributes {
        let item = self.item(handle);
        if item.affine_mat.is_some() {
            panic!("{}", SpriteError::NotRegular);
        }
        return SpriteRegularSecondAttributes::new(
            item.position.x,
            hw_attributes::horizontal_flip(item.handle.attr1),
            hw_attributes::vertical_flip(item.handle.attr1),
        );
    }

    /// Panics if the sprite is affine.
    pub fn set_regular_second_attributes(
        &mut self,
        handle: SpriteHandle,
        attributes: SpriteRegularSecondAttributes,
    ) {
        if self.item(handle).affine_mat.is_some() {
            panic!("{}", SpriteError::NotRegular);
        }
        self.set_x(handle, attributes.x);
        self.set_horizontal_flip(handle, attributes.horizontal_flip);
        self.set_vertical_flip(handle, attributes.vertical_flip);
    }

    /// Panics if the sprite is regular.
    pub fn affine_second_attributes(&self, handle: SpriteHandle) -> SpriteAffineSecondAttributes {
        let item = self.item(handle);
        match item.affine_mat {
            Some(affine_mat) => return SpriteAffineSecondAttributes::new(item.position.x, affine_mat),
            None => panic!("{}", SpriteError::NotAffine),
        }
    }

    /// Panics if the sprite is regular.
    pub fn set_affine_second_attributes(
        &mut self,
        handle: SpriteHandle,
        attributes: SpriteAffineSecondAttributes,
    ) {
        if self.item(handle).affine_mat.is_none() {
            panic!("{}", SpriteError::NotAffine);
        }
        self.set_x(handle, attributes.x);
        self.set_affine_mat(handle, attributes.affine_mat);
    }

    pub fn third_attributes(&self, handle: SpriteHandle) -> SpriteThirdAttributes {
        let item = self.item(handle);
        return SpriteThirdAttributes::new(item.tiles.clone(), item.palette.clone(), item.bg_priority());
    }

    pub fn set_third_attributes(&mut self, handle: SpriteHandle, attributes: SpriteThirdAttributes) {
        let shape_size = self.shape_size(handle);
        self.set_tiles_and_palette(handle, shape_size, attributes.tiles, attributes.palette);
        self.set_bg_priority(handle, attributes.bg_priority);
    }

    // Reserved handles and reloads.

    pub fn reserved_handles_count(&self) -> usize {
        return self.table.reserved_count();
    }

    /// Leave the first `count` OAM slots to other subsystems.
    ///
    /// Panics if `count` is not below the number of OAM slots, or if an affine matrix in
    /// use lives in one of the newly reserved slots.
    pub fn set_reserved_handles_count(&mut self, count: usize) {
        if count >= OAM_SLOTS {
            panic!("{}", SpriteError::InvalidReservedHandlesCount(count));
        }
        let old_count = self.table.reserved_count();
        if count == old_count {
            return;
        }
        self.affine_mats.reserve_sprite_handles(count);
        if count > old_count {
            for (_, item) in self.items.iter_mut() {
                item.handles_index = None;
            }
        }
        self.table.set_reserved_count(count);
        self.table.reload_all();
        debug_log!(
            Subsystems::SpritesManager,
            "Reserved handles: {} -> {}",
            old_count,
            count
        );
    }

    /// Commit the sprite again even if nothing changed.
    pub fn reload(&mut self, handle: SpriteHandle) {
        let index = self.index(handle);
        self.table.update_item(self.items.get(index));
    }

    pub fn blending_fade_enabled(&self) -> bool {
        return self.display.blending_fade_enabled;
    }

    pub fn set_blending_fade_enabled(&mut self, blending_fade_enabled: bool) {
        if blending_fade_enabled != self.display.blending_fade_enabled {
            self.display.blending_fade_enabled = blending_fade_enabled;
            self.reload_blending();
        }
    }

    /// Rewrite the hardware blend bit of every sprite from the current blend-fade state.
    pub fn reload_blending(&mut self) {
        let fade_enabled = self.display.blending_fade_enabled;
        let rebuild_pending = self.table.rebuild_pending();
        for (_, item) in self.items.iter_mut() {
            hw_attributes::set_blending_enabled(item.blending_enabled, fade_enabled, &mut item.handle.attr0);
            if !rebuild_pending {
                self.table.copy_item(item);
            }
        }
    }

    /// Rebuild and commit the whole OAM on the next frame.
    pub fn reload_all(&mut self) {
        self.table.reload_all();
    }

    // Frame loop.

    /// OAM slots the next `commit()` writes, leaving affine matrices aside.
    pub fn commit_range(&self) -> Option<(usize, usize)> {
        return self.table.to_commit();
    }

    /// Settle the frame: apply affine matrix changes, check the moved sprites against
    /// the screen and reassign OAM slots if needed.
    ///
    /// Panics if more sprites are on screen than there are unreserved OAM slots.
    pub fn update(&mut self) {
        let affine_mats_update = self.affine_mats.update();
        self.apply_affine_mats_update(affine_mats_update);
        if self.check_items_on_screen {
            self.check_items_on_screen = false;
            self.check_items_on_screen_now();
        }
        fatal(self.table.rebuild(&self.sorted, &mut self.items));
    }

    fn apply_affine_mats_update(&mut self, affine_mats_update: AffineMatsUpdate) {
        let mut pending = affine_mats_update.remove_if_not_needed;
        while pending != 0 {
            let affine_mat = AffineMatId::from_index(pending.trailing_zeros() as usize);
            pending &= pending - 1;
            if !self.affine_mats.contains(affine_mat)
                || !self.affine_mats.is_flipped_identity(affine_mat)
            {
                continue;
            }
            for index in self.affine_mats.attached_sprites(affine_mat) {
                if self.items.get(index).remove_affine_mat_when_not_needed {
                    self.remove_item_affine_mat(index);
                }
            }
        }

        let mut pending = affine_mats_update.registers_changed;
        while pending != 0 {
            let affine_mat = AffineMatId::from_index(pending.trailing_zeros() as usize);
            pending &= pending - 1;
            if !self.affine_mats.contains(affine_mat) {
                continue;
            }
            for index in self.affine_mats.attached_sprites(affine_mat) {
                let item = self.items.get_mut(index);
                if item.double_size_mode != SpriteDoubleSizeMode::Auto {
                    continue;
                }
                let shape_size = hw_attributes::shape_size(&item.handle);
                let double_size = self.affine_mats.sprite_double_size(affine_mat, shape_size);
                if double_size != item.double_size {
                    item.double_size = double_size;
                    if item.visible {
                        hw_attributes::show_affine(double_size, &mut item.handle.attr0);
                    }
                    self.update_item_dimensions(index);
                }
            }
        }
    }

    fn schedule_on_screen_check(&mut self, index: u16) {
        let item = self.items.get_mut(index);
        if !item.check_on_screen {
            item.check_on_screen = true;
            self.items_to_check.push(index);
        }
        self.check_items_on_screen = true;
    }

    fn forget_on_screen_check(&mut self, index: u16) {
        if let Some(position) = self.items_to_check.iter().position(|queued| *queued == index) {
            self.items_to_check.swap_remove(position);
        }
    }

    fn check_items_on_screen_now(&mut self) {
        while let Some(index) = self.items_to_check.pop() {
            let item = self.items.get_mut(index);
            item.check_on_screen = false;
            if on_screen::update_on_screen(item) {
                self.table.schedule_rebuild();
            } else if item.on_screen {
                self.table.update_item(item);
            }
        }
    }

    /// Write the affine matrices and sprite slots that changed since the last commit.
    pub fn commit(&mut self, target: &mut dyn OamTarget, use_dma: bool) {
        let mut extra_range = None;
        if let Some(commit_data) = self.affine_mats.retrieve_commit_data() {
            for id in commit_data.offset..(commit_data.offset + commit_data.count) {
                let affine_mat = AffineMatId::from_index(id);
                if self.affine_mats.contains(affine_mat) {
                    let registers = self.affine_mats.registers(affine_mat);
                    self.table
                        .set_affine_mat_registers(affine_mat.first_slot(), &registers);
                }
            }
            let first = commit_data.offset * AFFINE_MAT_SLOTS;
            let last = ((commit_data.offset + commit_data.count) * AFFINE_MAT_SLOTS) - 1;
            extra_range = Some((first, last));
        }
        self.table.commit(extra_range, target, use_dma);
    }

    /// Read access to the OAM mirror, mainly for diagnostics.
    pub fn handles(&self) -> &[hw_attributes::HwSpriteHandle; OAM_SLOTS] {
        return self.table.handles();
    }
}
