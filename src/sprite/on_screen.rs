//! Culling of sprites outside of the screen.

use super::hw_attributes;
use super::item::SpriteItem;
use crate::shared_constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::shared_types::Point;

/// Whether a sprite whose top-left corner is at `hw_position` overlaps the screen by at least one pixel.
pub fn is_on_screen(hw_position: Point, half_width: i32, half_height: i32) -> bool {
    let x = hw_position.x;
    if x + (half_width * 2) <= 0 || x >= SCREEN_WIDTH {
        return false;
    }
    let y = hw_position.y;
    if y + (half_height * 2) <= 0 || y >= SCREEN_HEIGHT {
        return false;
    }
    return true;
}

/// Recompute whether an item is on screen, showing or hiding its mirror on a transition.
///
/// Returns whether the on screen state changed, in which case the handle table
/// has to be rebuilt.
pub(crate) fn update_on_screen(item: &mut SpriteItem) -> bool {
    let on_screen =
        item.visible && is_on_screen(item.hw_position, item.half_width, item.half_height);
    if on_screen == item.on_screen {
        return false;
    }
    item.on_screen = on_screen;
    if on_screen {
        item.show();
    } else {
        hw_attributes::hide(&mut item.handle.attr0);
    }
    return true;
}
