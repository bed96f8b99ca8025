use super::hw_attributes::{self, HwSpriteHandle, ViewMode};
use super::hw_sprite::{BppMode, SpriteShape, SpriteShapeSize, SpriteSize};

#[test]
fn first_attributes_fields_read_back() {
    let attr0 = hw_attributes::first_attributes(
        -3,
        SpriteShape::Wide,
        BppMode::Bpp8,
        ViewMode::AffineDoubleSize,
        true,
        false,
        true,
        false,
    );
    // Negative positions wrap around the 8 bit field
    assert_eq!(hw_attributes::y(attr0), 253);
    assert_eq!(hw_attributes::shape(attr0), SpriteShape::Wide);
    assert_eq!(hw_attributes::bpp(attr0), BppMode::Bpp8);
    assert_eq!(hw_attributes::view_mode(attr0), ViewMode::AffineDoubleSize);
    assert!(hw_attributes::mosaic_enabled(attr0));
    assert!(!hw_attributes::blending_enabled(attr0, false));
    assert!(hw_attributes::window_enabled(attr0));
}

#[test]
fn blend_bit_is_inverted_while_fading() {
    let mut attr0 = hw_attributes::first_attributes(
        0,
        SpriteShape::Square,
        BppMode::Bpp4,
        ViewMode::Regular,
        false,
        true,
        false,
        true,
    );
    assert!(!hw_attributes::hw_blending_bit(attr0));
    assert!(hw_attributes::blending_enabled(attr0, true));

    hw_attributes::set_blending_enabled(false, true, &mut attr0);
    assert!(hw_attributes::hw_blending_bit(attr0));
    assert!(!hw_attributes::blending_enabled(attr0, true));

    hw_attributes::set_blending_enabled(true, false, &mut attr0);
    assert!(hw_attributes::hw_blending_bit(attr0));
}

#[test]
fn second_attributes_fields_read_back() {
    let attr1 = hw_attributes::regular_second_attributes(-1, SpriteSize::Big, true, false);
    assert_eq!(hw_attributes::x(attr1), 511);
    assert_eq!(hw_attributes::size(attr1), SpriteSize::Big);
    assert!(hw_attributes::horizontal_flip(attr1));
    assert!(!hw_attributes::vertical_flip(attr1));

    let attr1 = hw_attributes::affine_second_attributes(100, SpriteSize::Huge, 31);
    assert_eq!(hw_attributes::x(attr1), 100);
    assert_eq!(hw_attributes::size(attr1), SpriteSize::Huge);
    assert_eq!(hw_attributes::affine_mat_id(attr1), 31);
}

#[test]
fn third_attributes_fields_read_back() {
    let mut attr2 = hw_attributes::third_attributes(1023, 15, 2);
    assert_eq!(hw_attributes::tiles_id(attr2), 1023);
    assert_eq!(hw_attributes::palette_id(attr2), 15);
    assert_eq!(hw_attributes::bg_priority(attr2), 2);

    hw_attributes::set_bg_priority(0, &mut attr2);
    hw_attributes::set_tiles_id(4, &mut attr2);
    assert_eq!(hw_attributes::tiles_id(attr2), 4);
    assert_eq!(hw_attributes::palette_id(attr2), 15);
    assert_eq!(hw_attributes::bg_priority(attr2), 0);
}

#[test]
fn setters_only_touch_their_field() {
    let mut handle = HwSpriteHandle::default();
    handle.attr0 = hw_attributes::first_attributes(
        40,
        SpriteShape::Tall,
        BppMode::Bpp4,
        ViewMode::Regular,
        true,
        true,
        false,
        false,
    );
    handle.attr1 = hw_attributes::regular_second_attributes(200, SpriteSize::Small, false, true);
    let before = handle;

    hw_attributes::hide(&mut handle.attr0);
    assert_eq!(hw_attributes::view_mode(handle.attr0), ViewMode::Hidden);
    hw_attributes::show_regular(&mut handle.attr0);
    assert_eq!(handle, before);

    hw_attributes::set_x(12, &mut handle.attr1);
    assert_eq!(hw_attributes::x(handle.attr1), 12);
    assert!(hw_attributes::vertical_flip(handle.attr1));
    assert_eq!(hw_attributes::size(handle.attr1), SpriteSize::Small);

    hw_attributes::set_shape_size(SpriteShapeSize::THIRTY_TWO_BY_SIXTEEN, &mut handle);
    assert_eq!(hw_attributes::shape_size(&handle), SpriteShapeSize::THIRTY_TWO_BY_SIXTEEN);
    assert_eq!(hw_attributes::y(handle.attr0), 40);
    assert!(hw_attributes::mosaic_enabled(handle.attr0));
}

#[test]
fn hide_and_destroy_leaves_only_the_hidden_pattern() {
    let mut attr0 = hw_attributes::first_attributes(
        40,
        SpriteShape::Tall,
        BppMode::Bpp8,
        ViewMode::Affine,
        true,
        true,
        false,
        false,
    );
    hw_attributes::hide_and_destroy(&mut attr0);
    assert_eq!(attr0, hw_attributes::hidden_first_attributes());
    assert_eq!(HwSpriteHandle::HIDDEN.attr0, hw_attributes::hidden_first_attributes());
}

#[test]
fn double_size_doubles_dimensions() {
    let mut handle = HwSpriteHandle::default();
    hw_attributes::set_shape_size(SpriteShapeSize::SIXTY_FOUR_BY_THIRTY_TWO, &mut handle);
    assert_eq!(hw_attributes::dimensions(&handle, false), (64, 32));
    assert_eq!(hw_attributes::dimensions(&handle, true), (128, 64));
    assert_eq!(SpriteShapeSize::EIGHT_BY_THIRTY_TWO.tiles_count(BppMode::Bpp4), 4);
    assert_eq!(SpriteShapeSize::EIGHT_BY_THIRTY_TWO.tiles_count(BppMode::Bpp8), 8);
}
