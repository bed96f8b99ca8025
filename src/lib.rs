//! Sprite management for the Game Boy Advance.
//!
//! The hardware can draw 128 sprites, described by 128 OAM slots. This crate lets a game
//! keep more sprites than that alive, and takes care of deciding which of them get a slot
//! each frame: sprites outside of the screen are culled, the rest are written in drawing
//! order, and only the slots that changed are copied to OAM.
//!
//! ```ignore
//! let mut sprites = SpritesManager::init(SpritesConfig::default())?;
//! let player = sprites.create(position, SpriteShapeSize::SIXTEEN_BY_SIXTEEN, tiles, palette);
//! loop {
//!     sprites.set_position(player, next_position());
//!     sprites.update();
//!     wait_for_vblank();
//!     sprites.commit(&mut HardwareOam, true);
//! }
//! ```
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod debug_log;
pub mod camera;
pub mod config;
pub mod shared_constants;
pub mod shared_types;
pub mod sprite;

#[cfg(test)]
mod test;

pub use camera::CameraPtr;
pub use config::{ConfigError, SpritesConfig};
pub use shared_types::{Fixed, FixedPoint, Point};
pub use sprite::*;
