use super::affine_mats::AffineMatId;
use super::hw_sprite::SpriteShapeSize;
use super::item::SpriteDoubleSizeMode;
use super::resources::{SpritePalettePtr, SpriteTilesPtr};
use crate::camera::CameraPtr;
use crate::shared_constants::MAX_BG_PRIORITY;
use crate::shared_types::FixedPoint;

/// Collects the properties of a sprite before creating it with
/// `SpritesManager::create_from_builder()`.
///
/// ```ignore
/// let handle = manager.create_from_builder(
///     SpriteBuilder::new(SpriteShapeSize::SIXTEEN_BY_SIXTEEN, tiles, palette)
///         .with_position(FixedPoint::from_ints(-40, 12))
///         .with_z_order(-2)
///         .with_horizontal_flip(true),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SpriteBuilder {
    pub(crate) shape_size: SpriteShapeSize,
    pub(crate) tiles: SpriteTilesPtr,
    pub(crate) palette: SpritePalettePtr,
    pub(crate) position: FixedPoint,
    pub(crate) bg_priority: i32,
    pub(crate) z_order: i32,
    pub(crate) horizontal_flip: bool,
    pub(crate) vertical_flip: bool,
    pub(crate) mosaic_enabled: bool,
    pub(crate) blending_enabled: bool,
    pub(crate) window_enabled: bool,
    pub(crate) visible: bool,
    pub(crate) affine_mat: Option<AffineMatId>,
    pub(crate) double_size_mode: SpriteDoubleSizeMode,
    pub(crate) camera: Option<CameraPtr>,
    pub(crate) remove_affine_mat_when_not_needed: bool,
}

impl SpriteBuilder {
    pub fn new(
        shape_size: SpriteShapeSize,
        tiles: SpriteTilesPtr,
        palette: SpritePalettePtr,
    ) -> SpriteBuilder {
        return SpriteBuilder {
            shape_size,
            tiles,
            palette,
            position: FixedPoint::default(),
            bg_priority: MAX_BG_PRIORITY,
            z_order: 0,
            horizontal_flip: false,
            vertical_flip: false,
            mosaic_enabled: false,
            blending_enabled: false,
            window_enabled: false,
            visible: true,
            affine_mat: None,
            double_size_mode: SpriteDoubleSizeMode::Auto,
            camera: None,
            remove_affine_mat_when_not_needed: true,
        };
    }

    pub fn with_position(mut self, position: FixedPoint) -> SpriteBuilder {
        self.position = position;
        return self;
    }

    pub fn with_bg_priority(mut self, bg_priority: i32) -> SpriteBuilder {
        self.bg_priority = bg_priority;
        return self;
    }

    pub fn with_z_order(mut self, z_order: i32) -> SpriteBuilder {
        self.z_order = z_order;
        return self;
    }

    pub fn with_horizontal_flip(mut self, horizontal_flip: bool) -> SpriteBuilder {
        self.horizontal_flip = horizontal_flip;
        return self;
    }

    pub fn with_vertical_flip(mut self, vertical_flip: bool) -> SpriteBuilder {
        self.vertical_flip = vertical_flip;
        return self;
    }

    pub fn with_mosaic_enabled(mut self, mosaic_enabled: bool) -> SpriteBuilder {
        self.mosaic_enabled = mosaic_enabled;
        return self;
    }

    pub fn with_blending_enabled(mut self, blending_enabled: bool) -> SpriteBuilder {
        self.blending_enabled = blending_enabled;
        return self;
    }

    pub fn with_window_enabled(mut self, window_enabled: bool) -> SpriteBuilder {
        self.window_enabled = window_enabled;
        return self;
    }

    pub fn with_visible(mut self, visible: bool) -> SpriteBuilder {
        self.visible = visible;
        return self;
    }

    /// Draw the sprite through an existing affine matrix.
    /// The created sprite takes its own usage of the matrix.
    pub fn with_affine_mat(mut self, affine_mat: AffineMatId) -> SpriteBuilder {
        self.affine_mat = Some(affine_mat);
        return self;
    }

    pub fn with_double_size_mode(mut self, double_size_mode: SpriteDoubleSizeMode) -> SpriteBuilder {
        self.double_size_mode = double_size_mode;
        return self;
    }

    pub fn with_camera(mut self, camera: CameraPtr) -> SpriteBuilder {
        self.camera = Some(camera);
        return self;
    }

    pub fn with_remove_affine_mat_when_not_needed(mut self, remove: bool) -> SpriteBuilder {
        self.remove_affine_mat_when_not_needed = remove;
        return self;
    }
}
