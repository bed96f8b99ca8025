mod affine_mats;
mod attributes;
mod builder;
mod error;
mod handles;
mod hblank;
mod hw_attributes;
mod hw_sprite;
mod item;
mod item_pool;
mod oam;
mod on_screen;
mod resources;
mod sorted_sprites;
#[cfg(target_arch = "arm")]
mod sprite_dma;
mod sprites_manager;

pub use affine_mats::{AffineMatAttributes, AffineMatId, AffineMatsManager};
pub use attributes::{
    SpriteAffineSecondAttributes, SpriteFirstAttributes, SpriteRegularSecondAttributes,
    SpriteThirdAttributes,
};
pub use builder::SpriteBuilder;
pub use error::SpriteError;
pub use handles::CommitRange;
pub use hw_attributes::{HwSpriteHandle, ViewMode};
pub use hw_sprite::{BppMode, SpriteShape, SpriteShapeSize, SpriteSize};
pub use item::SpriteDoubleSizeMode;
pub use item_pool::SpriteHandle;
pub use oam::{OamImage, OamTarget, OamTransfer};
pub use on_screen::is_on_screen;
pub use resources::{SpritePalettePtr, SpriteTilesPtr};
pub use sorted_sprites::SortKey;
#[cfg(target_arch = "arm")]
pub use sprite_dma::HardwareOam;
pub use sprites_manager::SpritesManager;

#[cfg(test)]
mod affine_mats_test;
#[cfg(test)]
mod hblank_test;
#[cfg(test)]
mod hw_attributes_test;
