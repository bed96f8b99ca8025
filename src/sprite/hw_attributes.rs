//! Packing and unpacking of the hardware sprite attribute words.
//!
//! Every function here is pure: it either builds a word from logical properties,
//! reads a field back out of one, or rewrites a single field in place.
//! Arguments are expected to be validated by the caller.
//!
//! Layout of an OAM slot:
//!
//! | word    | bits    | meaning                                                 |
//! |---------|---------|---------------------------------------------------------|
//! | `attr0` | 0-7     | Y position                                              |
//! |         | 8-9     | view mode (regular, affine, hidden, affine double size) |
//! |         | 10      | blending                                                |
//! |         | 11      | window                                                  |
//! |         | 12      | mosaic                                                  |
//! |         | 13      | 8bpp                                                    |
//! |         | 14-15   | shape                                                   |
//! | `attr1` | 0-8     | X position                                              |
//! |         | 9-13    | affine matrix id (affine sprites)                       |
//! |         | 12, 13  | horizontal / vertical flip (regular sprites)            |
//! |         | 14-15   | size                                                    |
//! | `attr2` | 0-9     | tile id                                                 |
//! |         | 10-11   | background priority                                     |
//! |         | 12-15   | palette bank                                            |
//! | `fill`  | 0-15    | one affine matrix register, see `AffineMatsManager`     |

use super::hw_sprite::{BppMode, SpriteShape, SpriteShapeSize, SpriteSize};

const ATTR0_Y_MASK: u16 = 0x00FF;
const ATTR0_MODE_MASK: u16 = 0x0300;
const ATTR0_MODE_SHIFT: u32 = 8;
const ATTR0_BLEND: u16 = 1 << 10;
const ATTR0_WINDOW: u16 = 1 << 11;
const ATTR0_MOSAIC: u16 = 1 << 12;
const ATTR0_8BPP: u16 = 1 << 13;
const ATTR0_SHAPE_MASK: u16 = 0xC000;
const ATTR0_SHAPE_SHIFT: u32 = 14;

const ATTR1_X_MASK: u16 = 0x01FF;
const ATTR1_AFFINE_ID_MASK: u16 = 0x3E00;
const ATTR1_AFFINE_ID_SHIFT: u32 = 9;
const ATTR1_HFLIP: u16 = 1 << 12;
const ATTR1_VFLIP: u16 = 1 << 13;
const ATTR1_SIZE_MASK: u16 = 0xC000;
const ATTR1_SIZE_SHIFT: u32 = 14;

const ATTR2_TILE_ID_MASK: u16 = 0x03FF;
const ATTR2_PRIORITY_MASK: u16 = 0x0C00;
const ATTR2_PRIORITY_SHIFT: u32 = 10;
const ATTR2_PALETTE_MASK: u16 = 0xF000;
const ATTR2_PALETTE_SHIFT: u32 = 12;

/// Base sprite dimensions in pixels, indexed by shape and size.
const OBJ_SIZES: [[(i32, i32); 4]; 3] = [
    [(8, 8), (16, 16), (32, 32), (64, 64)],
    [(16, 8), (32, 8), (32, 16), (64, 32)],
    [(8, 16), (8, 32), (16, 32), (32, 64)],
];

/// How the hardware renders a sprite slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Regular,
    Affine,
    /// The slot is not rendered at all.
    Hidden,
    /// Affine, with the rendering area doubled in both directions.
    AffineDoubleSize,
}

impl ViewMode {
    pub fn bits(self) -> u16 {
        use ViewMode::*;
        match self {
            Regular => 0,
            Affine => 1,
            Hidden => 2,
            AffineDoubleSize => 3,
        }
    }

    pub fn from_bits(bits: u16) -> ViewMode {
        use ViewMode::*;
        match bits & 3 {
            0 => Regular,
            1 => Affine,
            2 => Hidden,
            _ => AffineDoubleSize,
        }
    }
}

/// One OAM slot, laid out exactly like the hardware expects it.
/// Aligned so a run of slots can be copied as 32-bit words.
#[repr(C, align(4))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HwSpriteHandle {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
    pub fill: u16,
}

impl HwSpriteHandle {
    /// A slot which isn't rendered.
    pub const HIDDEN: HwSpriteHandle = HwSpriteHandle {
        attr0: hidden_first_attributes(),
        attr1: 0,
        attr2: 0,
        fill: 0,
    };
}

#[inline]
fn get_field(word: u16, mask: u16, shift: u32) -> u16 {
    return (word & mask) >> shift;
}

#[inline]
fn set_field(word: &mut u16, value: u16, mask: u16, shift: u32) {
    *word = (*word & !mask) | ((value << shift) & mask);
}

#[inline]
fn set_flag(word: &mut u16, flag: u16, enabled: bool) {
    if enabled {
        *word |= flag;
    } else {
        *word &= !flag;
    }
}

/// First attributes word which disables the slot.
#[inline]
pub const fn hidden_first_attributes() -> u16 {
    return 2 << ATTR0_MODE_SHIFT;
}

/// Pack the first attributes word.
///
/// The hardware blend bit is inverted while the blend-fade effect is active:
/// sprites with blending disabled then take part in the fade, and the other way around.
pub fn first_attributes(
    y: i32,
    shape: SpriteShape,
    bpp: BppMode,
    view_mode: ViewMode,
    mosaic_enabled: bool,
    blending_enabled: bool,
    window_enabled: bool,
    fade_enabled: bool,
) -> u16 {
    let blend_bit = blending_enabled != fade_enabled;
    let mut attr0 = (y & 255) as u16;
    attr0 |= view_mode.bits() << ATTR0_MODE_SHIFT;
    set_flag(&mut attr0, ATTR0_BLEND, blend_bit);
    set_flag(&mut attr0, ATTR0_WINDOW, window_enabled);
    set_flag(&mut attr0, ATTR0_MOSAIC, mosaic_enabled);
    set_flag(&mut attr0, ATTR0_8BPP, bpp == BppMode::Bpp8);
    attr0 |= shape.bits() << ATTR0_SHAPE_SHIFT;
    return attr0;
}

/// Pack the second attributes word of a regular sprite.
pub fn regular_second_attributes(
    x: i32,
    size: SpriteSize,
    horizontal_flip: bool,
    vertical_flip: bool,
) -> u16 {
    let mut attr1 = (x & 511) as u16;
    set_flag(&mut attr1, ATTR1_HFLIP, horizontal_flip);
    set_flag(&mut attr1, ATTR1_VFLIP, vertical_flip);
    attr1 |= size.bits() << ATTR1_SIZE_SHIFT;
    return attr1;
}

/// Pack the second attributes word of an affine sprite.
/// Flipping is expressed through the matrix, so there are no flip bits here.
pub fn affine_second_attributes(x: i32, size: SpriteSize, affine_mat_id: usize) -> u16 {
    let mut attr1 = (x & 511) as u16;
    set_field(&mut attr1, affine_mat_id as u16, ATTR1_AFFINE_ID_MASK, ATTR1_AFFINE_ID_SHIFT);
    attr1 |= size.bits() << ATTR1_SIZE_SHIFT;
    return attr1;
}

/// Pack the third attributes word.
pub fn third_attributes(tiles_id: u16, palette_id: u8, bg_priority: i32) -> u16 {
    let mut attr2 = tiles_id & ATTR2_TILE_ID_MASK;
    set_field(&mut attr2, bg_priority as u16, ATTR2_PRIORITY_MASK, ATTR2_PRIORITY_SHIFT);
    set_field(&mut attr2, u16::from(palette_id), ATTR2_PALETTE_MASK, ATTR2_PALETTE_SHIFT);
    return attr2;
}

pub fn copy_handle(from: &HwSpriteHandle, to: &mut HwSpriteHandle) {
    to.attr0 = from.attr0;
    to.attr1 = from.attr1;
    to.attr2 = from.attr2;
}

// First attributes word.

pub fn y(attr0: u16) -> i32 {
    return i32::from(attr0 & ATTR0_Y_MASK);
}

pub fn set_y(y: i32, attr0: &mut u16) {
    set_field(attr0, (y & 255) as u16, ATTR0_Y_MASK, 0);
}

pub fn view_mode(attr0: u16) -> ViewMode {
    return ViewMode::from_bits(get_field(attr0, ATTR0_MODE_MASK, ATTR0_MODE_SHIFT));
}

pub fn set_view_mode(view_mode: ViewMode, attr0: &mut u16) {
    set_field(attr0, view_mode.bits(), ATTR0_MODE_MASK, ATTR0_MODE_SHIFT);
}

pub fn show_regular(attr0: &mut u16) {
    set_view_mode(ViewMode::Regular, attr0);
}

pub fn show_affine(double_size: bool, attr0: &mut u16) {
    let mode = if double_size {
        ViewMode::AffineDoubleSize
    } else {
        ViewMode::Affine
    };
    set_view_mode(mode, attr0);
}

pub fn hide(attr0: &mut u16) {
    set_view_mode(ViewMode::Hidden, attr0);
}

/// Hide the slot and forget everything else the first word held.
pub fn hide_and_destroy(attr0: &mut u16) {
    *attr0 = hidden_first_attributes();
}

/// Raw value of the hardware blend bit, without taking the fade inversion into account.
pub fn hw_blending_bit(attr0: u16) -> bool {
    return attr0 & ATTR0_BLEND != 0;
}

/// Logical blending flag, undoing the inversion applied while the blend-fade effect is active.
pub fn blending_enabled(attr0: u16, fade_enabled: bool) -> bool {
    return hw_blending_bit(attr0) != fade_enabled;
}

pub fn set_blending_enabled(blending_enabled: bool, fade_enabled: bool, attr0: &mut u16) {
    set_flag(attr0, ATTR0_BLEND, blending_enabled != fade_enabled);
}

pub fn window_enabled(attr0: u16) -> bool {
    return attr0 & ATTR0_WINDOW != 0;
}

pub fn set_window_enabled(window_enabled: bool, attr0: &mut u16) {
    set_flag(attr0, ATTR0_WINDOW, window_enabled);
}

pub fn mosaic_enabled(attr0: u16) -> bool {
    return attr0 & ATTR0_MOSAIC != 0;
}

pub fn set_mosaic_enabled(mosaic_enabled: bool, attr0: &mut u16) {
    set_flag(attr0, ATTR0_MOSAIC, mosaic_enabled);
}

pub fn bpp(attr0: u16) -> BppMode {
    if attr0 & ATTR0_8BPP != 0 {
        return BppMode::Bpp8;
    }
    return BppMode::Bpp4;
}

pub fn set_bpp(bpp: BppMode, attr0: &mut u16) {
    set_flag(attr0, ATTR0_8BPP, bpp == BppMode::Bpp8);
}

pub fn shape(attr0: u16) -> SpriteShape {
    return SpriteShape::from_bits(get_field(attr0, ATTR0_SHAPE_MASK, ATTR0_SHAPE_SHIFT));
}

// Second attributes word.

pub fn x(attr1: u16) -> i32 {
    return i32::from(attr1 & ATTR1_X_MASK);
}

pub fn set_x(x: i32, attr1: &mut u16) {
    set_field(attr1, (x & 511) as u16, ATTR1_X_MASK, 0);
}

pub fn affine_mat_id(attr1: u16) -> usize {
    return usize::from(get_field(attr1, ATTR1_AFFINE_ID_MASK, ATTR1_AFFINE_ID_SHIFT));
}

pub fn set_affine_mat_id(affine_mat_id: usize, attr1: &mut u16) {
    set_field(attr1, affine_mat_id as u16, ATTR1_AFFINE_ID_MASK, ATTR1_AFFINE_ID_SHIFT);
}

pub fn horizontal_flip(attr1: u16) -> bool {
    return attr1 & ATTR1_HFLIP != 0;
}

pub fn set_horizontal_flip(horizontal_flip: bool, attr1: &mut u16) {
    set_flag(attr1, ATTR1_HFLIP, horizontal_flip);
}

pub fn vertical_flip(attr1: u16) -> bool {
    return attr1 & ATTR1_VFLIP != 0;
}

pub fn set_vertical_flip(vertical_flip: bool, attr1: &mut u16) {
    set_flag(attr1, ATTR1_VFLIP, vertical_flip);
}

pub fn size(attr1: u16) -> SpriteSize {
    return SpriteSize::from_bits(get_field(attr1, ATTR1_SIZE_MASK, ATTR1_SIZE_SHIFT));
}

// Third attributes word.

pub fn tiles_id(attr2: u16) -> u16 {
    return attr2 & ATTR2_TILE_ID_MASK;
}

pub fn set_tiles_id(tiles_id: u16, attr2: &mut u16) {
    set_field(attr2, tiles_id, ATTR2_TILE_ID_MASK, 0);
}

pub fn bg_priority(attr2: u16) -> i32 {
    return i32::from(get_field(attr2, ATTR2_PRIORITY_MASK, ATTR2_PRIORITY_SHIFT));
}

pub fn set_bg_priority(bg_priority: i32, attr2: &mut u16) {
    set_field(attr2, bg_priority as u16, ATTR2_PRIORITY_MASK, ATTR2_PRIORITY_SHIFT);
}

pub fn palette_id(attr2: u16) -> u8 {
    return get_field(attr2, ATTR2_PALETTE_MASK, ATTR2_PALETTE_SHIFT) as u8;
}

pub fn set_palette_id(palette_id: u8, attr2: &mut u16) {
    set_field(attr2, u16::from(palette_id), ATTR2_PALETTE_MASK, ATTR2_PALETTE_SHIFT);
}

// Whole slot.

pub fn shape_size(handle: &HwSpriteHandle) -> SpriteShapeSize {
    return SpriteShapeSize::new(shape(handle.attr0), size(handle.attr1));
}

pub fn set_shape_size(shape_size: SpriteShapeSize, handle: &mut HwSpriteHandle) {
    set_field(
        &mut handle.attr0,
        shape_size.shape().bits(),
        ATTR0_SHAPE_MASK,
        ATTR0_SHAPE_SHIFT,
    );
    set_field(
        &mut handle.attr1,
        shape_size.size().bits(),
        ATTR1_SIZE_MASK,
        ATTR1_SIZE_SHIFT,
    );
}

/// Width and height in pixels of a sprite with the given shape and size.
pub fn base_dimensions(shape: SpriteShape, size: SpriteSize) -> (i32, i32) {
    return OBJ_SIZES[usize::from(shape.bits())][usize::from(size.bits())];
}

/// Dimensions of the area a sprite occupies on screen, which doubles in
/// both directions for affine sprites in double size mode.
pub fn dimensions(handle: &HwSpriteHandle, double_size: bool) -> (i32, i32) {
    let (width, height) = base_dimensions(shape(handle.attr0), size(handle.attr1));
    if double_size {
        return (width * 2, height * 2);
    }
    return (width, height);
}
