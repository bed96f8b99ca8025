use alloc::vec::Vec;
use core::convert::TryInto;

use super::affine_mats::AffineMatAttributes;
use super::attributes::{
    SpriteAffineSecondAttributes, SpriteFirstAttributes, SpriteRegularSecondAttributes,
    SpriteThirdAttributes,
};
use super::hw_attributes::{self, ViewMode};
use super::hw_sprite::{BppMode, SpriteShape, SpriteShapeSize, SpriteSize};
use super::resources::{SpritePalettePtr, SpriteTilesPtr};
use crate::shared_constants::SCREEN_LINES;
use crate::shared_types::{Fixed, ZERO};
use crate::test::{manager, palette, sprite_at};

#[test]
fn horizontal_positions_keep_the_rest_of_the_word() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    manager.set_vertical_flip(handle, true);
    let mut positions = [ZERO; SCREEN_LINES];
    for (line, position) in positions.iter_mut().enumerate() {
        *position = Fixed::from_num(line as i32) + Fixed::from_num(0.75);
    }
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_horizontal_positions(handle, &positions, &mut dest);

    for (line, attr1) in dest.iter().enumerate() {
        assert_eq!(hw_attributes::x(*attr1), (line as i32 + 112) & 511);
        assert_eq!(hw_attributes::size(*attr1), SpriteSize::Normal);
        assert!(hw_attributes::vertical_flip(*attr1));
    }
}

#[test]
fn vertical_positions_wrap_like_the_hardware() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let mut positions = [ZERO; SCREEN_LINES];
    for (line, position) in positions.iter_mut().enumerate() {
        *position = Fixed::from_num(-(line as i32));
    }
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_vertical_positions(handle, &positions, &mut dest);

    assert_eq!(hw_attributes::y(dest[0]), 72);
    assert_eq!(hw_attributes::y(dest[100]), 228);
    assert_eq!(hw_attributes::shape(dest[100]), SpriteShape::Square);
}

#[test]
fn invisible_lines_are_hidden() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let mut attributes = [SpriteFirstAttributes::new(Fixed::from_num(5), true, false, false, true); SCREEN_LINES];
    for line_attributes in attributes.iter_mut().skip(1).step_by(2) {
        line_attributes.visible = false;
    }
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_first_attributes(handle, &attributes, &mut dest);

    assert_eq!(hw_attributes::y(dest[0]), 77);
    assert!(hw_attributes::mosaic_enabled(dest[0]));
    assert_eq!(hw_attributes::view_mode(dest[0]), ViewMode::Regular);
    assert_eq!(dest[1], hw_attributes::hidden_first_attributes());
    assert_eq!(hw_attributes::view_mode(dest[2]), ViewMode::Regular);
}

#[test]
fn first_attributes_follow_the_blend_fade() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    manager.set_blending_fade_enabled(true);
    let attributes = [SpriteFirstAttributes::new(ZERO, false, true, false, true); SCREEN_LINES];
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_first_attributes(handle, &attributes, &mut dest);
    assert!(!hw_attributes::hw_blending_bit(dest[0]));
    assert!(hw_attributes::blending_enabled(dest[0], true));
}

#[test]
fn regular_second_attributes_per_line() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let mut attributes = [SpriteRegularSecondAttributes::new(Fixed::from_num(3), false, false); SCREEN_LINES];
    attributes[10].horizontal_flip = true;
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_regular_second_attributes(handle, &attributes, &mut dest);

    assert_eq!(hw_attributes::x(dest[0]), 115);
    assert!(!hw_attributes::horizontal_flip(dest[0]));
    assert!(hw_attributes::horizontal_flip(dest[10]));
    assert_eq!(hw_attributes::size(dest[10]), SpriteSize::Normal);
}

#[test]
#[should_panic]
fn regular_second_attributes_of_affine_sprite_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let mut affine_attributes = AffineMatAttributes::identity();
    affine_attributes.set_rotation_angle(Fixed::from_num(20));
    manager.set_new_affine_mat(handle, affine_attributes);
    let attributes = [SpriteRegularSecondAttributes::new(ZERO, false, false); SCREEN_LINES];
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_regular_second_attributes(handle, &attributes, &mut dest);
}

#[test]
fn affine_second_attributes_per_line() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let mut affine_attributes = AffineMatAttributes::identity();
    affine_attributes.set_scale(Fixed::from_num(0.5));
    manager.set_new_affine_mat(handle, affine_attributes);
    let affine_mat = manager.affine_mat(handle).unwrap();
    let other_affine_mat = manager.affine_mats_mut().create(AffineMatAttributes::identity());

    let mut attributes = [SpriteAffineSecondAttributes::new(Fixed::from_num(-2), affine_mat); SCREEN_LINES];
    attributes[159].affine_mat = other_affine_mat;
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_affine_second_attributes(handle, &attributes, &mut dest);

    assert_eq!(hw_attributes::x(dest[0]), 110);
    assert_eq!(hw_attributes::affine_mat_id(dest[0]), affine_mat.id());
    assert_eq!(hw_attributes::affine_mat_id(dest[159]), other_affine_mat.id());
}

#[test]
#[should_panic]
fn affine_second_attributes_of_regular_sprite_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let affine_mat = manager.affine_mats_mut().create(AffineMatAttributes::identity());
    let attributes = [SpriteAffineSecondAttributes::new(ZERO, affine_mat); SCREEN_LINES];
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_affine_second_attributes(handle, &attributes, &mut dest);
}

fn third_attributes_lines(tiles: &SpriteTilesPtr, palette: &SpritePalettePtr) -> [SpriteThirdAttributes; SCREEN_LINES] {
    let lines: Vec<SpriteThirdAttributes> = (0..SCREEN_LINES)
        .map(|line| SpriteThirdAttributes::new(tiles.clone(), palette.clone(), (line % 4) as i32))
        .collect();
    return lines.try_into().unwrap();
}

#[test]
fn third_attributes_per_line() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let tiles = SpriteTilesPtr::new(32, SpriteShapeSize::SIXTEEN_BY_SIXTEEN.tiles_count(BppMode::Bpp4));
    let attributes = third_attributes_lines(&tiles, &palette());
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_third_attributes(handle, &attributes, &mut dest);

    assert_eq!(hw_attributes::tiles_id(dest[0]), 32);
    assert_eq!(hw_attributes::palette_id(dest[0]), 1);
    assert_eq!(hw_attributes::bg_priority(dest[0]), 0);
    assert_eq!(hw_attributes::bg_priority(dest[3]), 3);
}

#[test]
#[should_panic]
fn third_attributes_with_wrong_tiles_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let tiles = SpriteTilesPtr::new(32, 1);
    let attributes = third_attributes_lines(&tiles, &palette());
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_third_attributes(handle, &attributes, &mut dest);
}

#[test]
#[should_panic]
fn third_attributes_with_invalid_bg_priority_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let tiles = SpriteTilesPtr::new(32, SpriteShapeSize::SIXTEEN_BY_SIXTEEN.tiles_count(BppMode::Bpp4));
    let mut attributes = third_attributes_lines(&tiles, &palette());
    attributes[80].bg_priority = 5;
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_third_attributes(handle, &attributes, &mut dest);
}

#[test]
#[should_panic]
fn third_attributes_with_other_bpp_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let tiles = SpriteTilesPtr::new(32, SpriteShapeSize::SIXTEEN_BY_SIXTEEN.tiles_count(BppMode::Bpp8));
    let attributes = third_attributes_lines(&tiles, &SpritePalettePtr::new(2, BppMode::Bpp8));
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_third_attributes(handle, &attributes, &mut dest);
}

#[test]
#[should_panic]
fn first_attributes_with_blending_and_window_panic() {
    let mut manager = manager();
    let handle = sprite_at(&mut manager, 0, 0);
    let attributes = [SpriteFirstAttributes::new(ZERO, false, true, true, true); SCREEN_LINES];
    let mut dest = [0; SCREEN_LINES];
    manager.fill_hblank_first_attributes(handle, &attributes, &mut dest);
}
