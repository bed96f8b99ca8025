//! Constants used in multiple modules.

/// Screen height in pixels
pub const SCREEN_HEIGHT: i32 = 160;
/// Screen width in pixels
pub const SCREEN_WIDTH: i32 = 240;
/// Number of visible scanlines, and therefore of values an H-Blank effect provides per frame.
pub const SCREEN_LINES: usize = SCREEN_HEIGHT as usize;

/// Address at which OAM starts.
pub const OAM_BASE_ADDR: usize = 0x700_0000;
/// Number of hardware sprite slots in OAM.
pub const OAM_SLOTS: usize = 128;
/// Number of u32's that make up a single OAM slot.
pub const OAM_SLOT_NUM_U32S: usize = 2;

/// Number of affine matrices the hardware provides for sprites.
pub const AFFINE_MATS_COUNT: usize = 32;
/// Each affine matrix is spread over the fill words of this many consecutive OAM slots.
pub const AFFINE_MAT_SLOTS: usize = OAM_SLOTS / AFFINE_MATS_COUNT;

/// Upper bound for the sprite item pool, whatever the configuration asks for.
pub const MAX_SPRITE_ITEMS: usize = 128;
/// Upper bound for the number of distinct sort layers alive at the same time.
pub const MAX_SORT_LAYERS: usize = 32;

/// Largest background priority a sprite can be drawn with (0 is drawn on top).
pub const MAX_BG_PRIORITY: i32 = 3;
/// Smallest accepted z order.
pub const MIN_Z_ORDER: i32 = -32767;
/// Largest accepted z order.
pub const MAX_Z_ORDER: i32 = 32767;
