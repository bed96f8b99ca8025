use super::affine_mats::{AffineMatAttributes, AffineMatsCommitData, AffineMatsManager};
use super::hw_sprite::SpriteShapeSize;
use crate::shared_types::Fixed;

#[test]
fn identity_registers() {
    let attributes = AffineMatAttributes::identity();
    assert_eq!(attributes.registers(), [256, 0, 0, 256]);
    assert!(attributes.is_identity());
    assert!(attributes.is_flipped_identity());
}

#[test]
fn flips_negate_the_diagonal() {
    let attributes = AffineMatAttributes::flipped_identity(true, false);
    assert_eq!(attributes.registers(), [-256, 0, 0, 256]);
    assert!(!attributes.is_identity());
    assert!(attributes.is_flipped_identity());

    let attributes = AffineMatAttributes::flipped_identity(true, true);
    assert_eq!(attributes.pa_register_value(), -256);
    assert_eq!(attributes.pd_register_value(), -256);
}

#[test]
fn quarter_turn_registers() {
    let mut attributes = AffineMatAttributes::identity();
    attributes.set_rotation_angle(Fixed::from_num(90));
    assert_eq!(attributes.registers(), [0, -256, 256, 0]);
    assert!(!attributes.is_flipped_identity());

    attributes.set_rotation_angle(Fixed::from_num(180));
    assert_eq!(attributes.registers(), [-256, 0, 0, -256]);

    // Angles wrap around
    attributes.set_rotation_angle(Fixed::from_num(-90));
    assert_eq!(attributes.rotation_angle(), Fixed::from_num(270));
    assert_eq!(attributes.registers(), [0, 256, -256, 0]);
}

#[test]
fn scale_registers_are_inverted() {
    let mut attributes = AffineMatAttributes::identity();
    attributes.set_scale(Fixed::from_num(2));
    assert_eq!(attributes.registers(), [128, 0, 0, 128]);

    attributes.set_scales(Fixed::from_num(0.5), Fixed::from_num(1));
    assert_eq!(attributes.pa_register_value(), 512);
    assert_eq!(attributes.pd_register_value(), 256);
}

#[test]
fn shear_goes_to_the_off_diagonal() {
    let mut attributes = AffineMatAttributes::identity();
    attributes.set_horizontal_shear(Fixed::from_num(1));
    assert_eq!(attributes.pb_register_value(), 256);
    assert_eq!(attributes.pc_register_value(), 0);
    attributes.set_vertical_shear(Fixed::from_num(-0.5));
    assert_eq!(attributes.pc_register_value(), -128);
}

#[test]
#[should_panic]
fn zero_scale_is_rejected() {
    let mut attributes = AffineMatAttributes::identity();
    attributes.set_horizontal_scale(Fixed::from_num(0));
}

#[test]
fn double_size_follows_the_covered_area() {
    let mut mats = AffineMatsManager::new(8);
    let id = mats.create(AffineMatAttributes::identity());
    let shape_size = SpriteShapeSize::SIXTEEN_BY_SIXTEEN;
    assert!(!mats.sprite_double_size(id, shape_size));

    mats.set_rotation_angle(id, Fixed::from_num(45));
    assert!(mats.sprite_double_size(id, shape_size));

    mats.set_rotation_angle(id, Fixed::from_num(0));
    mats.set_scale(id, Fixed::from_num(2));
    assert!(mats.sprite_double_size(id, shape_size));

    mats.set_scale(id, Fixed::from_num(0.5));
    assert!(!mats.sprite_double_size(id, shape_size));
}

#[test]
fn matrices_are_released_with_their_last_usage() {
    let mut mats = AffineMatsManager::new(8);
    let id = mats.create(AffineMatAttributes::identity());
    assert_eq!(mats.used_count(), 1);
    mats.increase_usages(id);
    assert_eq!(mats.usages(id), 2);
    mats.decrease_usages(id);
    assert!(mats.contains(id));
    mats.decrease_usages(id);
    assert!(!mats.contains(id));
    assert_eq!(mats.available_count(), 32);
}

#[test]
fn create_optional_returns_none_when_full() {
    let mut mats = AffineMatsManager::new(8);
    for _ in 0..32 {
        assert!(mats.create_optional(AffineMatAttributes::identity()).is_some());
    }
    assert!(mats.create_optional(AffineMatAttributes::identity()).is_none());
}

#[test]
fn attached_sprites_keep_attachment_order() {
    let mut mats = AffineMatsManager::new(8);
    let id = mats.create(AffineMatAttributes::identity());
    mats.attach_sprite(id, 3);
    mats.attach_sprite(id, 1);
    mats.attach_sprite(id, 6);
    assert_eq!(mats.attached_sprites(id).as_slice(), &[3, 1, 6]);
    mats.dettach_sprite(id, 1);
    assert_eq!(mats.attached_sprites(id).as_slice(), &[3, 6]);
    mats.dettach_sprite(id, 3);
    mats.dettach_sprite(id, 6);
    assert!(mats.attached_sprites(id).is_empty());
}

#[test]
fn update_reports_changes_once() {
    let mut mats = AffineMatsManager::new(8);
    let id = mats.create(AffineMatAttributes::identity());
    mats.attach_sprite(id, 0);
    let bit = 1 << id.id();

    mats.set_rotation_angle(id, Fixed::from_num(30));
    let update = mats.update();
    assert_eq!(update.registers_changed, bit);
    assert_eq!(update.remove_if_not_needed, 0);

    // Back to a plain flip with a sprite attached
    mats.set_rotation_angle(id, Fixed::from_num(0));
    let update = mats.update();
    assert_eq!(update.registers_changed, bit);
    assert_eq!(update.remove_if_not_needed, bit);

    assert_eq!(mats.update(), Default::default());
}

#[test]
fn commit_data_covers_changed_matrices() {
    let mut mats = AffineMatsManager::new(8);
    let first = mats.create(AffineMatAttributes::identity());
    let second = mats.create(AffineMatAttributes::identity());
    assert_eq!(first.id(), 0);
    assert_eq!(second.id(), 1);
    assert_eq!(
        mats.retrieve_commit_data(),
        Some(AffineMatsCommitData {
            offset: 0,
            count: 2
        })
    );
    assert_eq!(mats.retrieve_commit_data(), None);

    mats.set_shear(second, Fixed::from_num(0.25));
    assert_eq!(
        mats.retrieve_commit_data(),
        Some(AffineMatsCommitData {
            offset: 1,
            count: 1
        })
    );
}

#[test]
fn new_matrices_avoid_reserved_handles() {
    let mut mats = AffineMatsManager::new(8);
    mats.reserve_sprite_handles(5);
    let id = mats.create(AffineMatAttributes::identity());
    assert_eq!(id.id(), 2);
    assert_eq!(id.first_slot(), 8);
}

#[test]
#[should_panic]
fn reserving_handles_of_a_used_matrix_panics() {
    let mut mats = AffineMatsManager::new(8);
    mats.create(AffineMatAttributes::identity());
    mats.reserve_sprite_handles(1);
}
