//! Affine transformation matrices for sprites.
//!
//! The hardware has 32 of them, interleaved with the sprite attributes: the four registers
//! of matrix `n` are the fill words of OAM slots `4n..4n+3`. The manager keeps the logical
//! attributes of each matrix, which sprites use it, and which matrices need committing.

use alloc::boxed::Box;
use alloc::vec::Vec;

use arrayvec::ArrayVec;
use fixed::{consts::PI, types::extra::U32, FixedI64};

use super::error::SpriteError;
use super::handles::CommitRange;
use super::hw_sprite::{SpriteShape, SpriteShapeSize, SpriteSize};
use crate::debug_log::Subsystems;
use crate::shared_constants::{AFFINE_MATS_COUNT, AFFINE_MAT_SLOTS, MAX_SPRITE_ITEMS};
use crate::shared_types::{Fixed, ZERO};

type Wide = FixedI64<U32>;

/// Inverse scale used for scales at or below `1 / MIN_INV_SCALE`.
const MIN_INV_SCALE: i32 = 128;
/// 1.0 in the 8.8 format of the matrix registers.
const REGISTER_ONE: i32 = 256;

/// Identifies one of the hardware matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffineMatId(u8);

impl AffineMatId {
    pub(crate) fn from_index(id: usize) -> AffineMatId {
        return AffineMatId(id as u8);
    }

    pub fn id(&self) -> usize {
        return usize::from(self.0);
    }

    /// Index of the first OAM slot holding this matrix's registers.
    pub fn first_slot(&self) -> usize {
        return self.id() * AFFINE_MAT_SLOTS;
    }
}

/// Sine and cosine of an angle in degrees, as 12 bit fixed-point raw values.
fn degrees_sin_cos(degrees: Fixed) -> (i32, i32) {
    let full_turn = Fixed::from_num(360);
    let mut angle = degrees % full_turn;
    if angle < ZERO {
        angle += full_turn;
    }
    let quarter_turn = Fixed::from_num(90);
    let quadrant = (angle / quarter_turn).to_num::<i32>() & 3;
    let remainder = angle - quarter_turn * quadrant;

    let (sin, cos) = if remainder == ZERO {
        (0, 4096)
    } else {
        let radians = Wide::from_num(remainder) * Wide::from_num(PI) / Wide::from_num(180);
        (round_to_12_bits(taylor_sin(radians)), round_to_12_bits(taylor_cos(radians)))
    };
    return match quadrant {
        0 => (sin, cos),
        1 => (cos, -sin),
        2 => (-sin, -cos),
        _ => (-cos, sin),
    };
}

fn taylor_sin(x: Wide) -> Wide {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    for n in 1..7 {
        term = -term * x2 / Wide::from_num((2 * n) * (2 * n + 1));
        sum += term;
    }
    return sum;
}

fn taylor_cos(x: Wide) -> Wide {
    let x2 = x * x;
    let mut term = Wide::from_num(1);
    let mut sum = term;
    for n in 1..7 {
        term = -term * x2 / Wide::from_num((2 * n - 1) * (2 * n));
        sum += term;
    }
    return sum;
}

fn round_to_12_bits(value: Wide) -> i32 {
    return ((value.to_bits() + (1 << 19)) >> 20) as i32;
}

/// Inverse of a scale, in the 8.8 format of the matrix registers.
fn output_scale(scale: Fixed) -> i32 {
    if scale == Fixed::from_num(1) {
        return REGISTER_ONE;
    }
    let scale_8 = scale.to_bits() >> 4;
    if scale_8 <= REGISTER_ONE / MIN_INV_SCALE {
        return REGISTER_ONE * MIN_INV_SCALE;
    }
    return (REGISTER_ONE * REGISTER_ONE) / scale_8;
}

/// Rotation, scale, shear and flips of an affine matrix, together with the
/// register values they produce.
#[derive(Debug, Clone, Copy)]
pub struct AffineMatAttributes {
    rotation_angle: Fixed,
    horizontal_scale: Fixed,
    vertical_scale: Fixed,
    horizontal_shear: Fixed,
    vertical_shear: Fixed,
    horizontal_flip: bool,
    vertical_flip: bool,
    sin: i32,
    cos: i32,
    sx: i32,
    sy: i32,
    registers: [i16; 4],
}

impl PartialEq for AffineMatAttributes {
    fn eq(&self, other: &AffineMatAttributes) -> bool {
        return self.rotation_angle == other.rotation_angle
            && self.horizontal_scale == other.horizontal_scale
            && self.vertical_scale == other.vertical_scale
            && self.horizontal_shear == other.horizontal_shear
            && self.vertical_shear == other.vertical_shear
            && self.horizontal_flip == other.horizontal_flip
            && self.vertical_flip == other.vertical_flip;
    }
}

impl Default for AffineMatAttributes {
    fn default() -> Self {
        return AffineMatAttributes::identity();
    }
}

impl AffineMatAttributes {
    /// No rotation, scale, shear or flips.
    pub fn identity() -> AffineMatAttributes {
        let one = Fixed::from_num(1);
        return AffineMatAttributes {
            rotation_angle: ZERO,
            horizontal_scale: one,
            vertical_scale: one,
            horizontal_shear: ZERO,
            vertical_shear: ZERO,
            horizontal_flip: false,
            vertical_flip: false,
            sin: 0,
            cos: 4096,
            sx: REGISTER_ONE,
            sy: REGISTER_ONE,
            registers: [REGISTER_ONE as i16, 0, 0, REGISTER_ONE as i16],
        };
    }

    /// Identity, except for the given flips.
    pub fn flipped_identity(horizontal_flip: bool, vertical_flip: bool) -> AffineMatAttributes {
        let mut result = AffineMatAttributes::identity();
        result.set_horizontal_flip(horizontal_flip);
        result.set_vertical_flip(vertical_flip);
        return result;
    }

    /// Rotation angle in degrees.
    pub fn rotation_angle(&self) -> Fixed {
        return self.rotation_angle;
    }

    /// Set the rotation angle in degrees. Any angle is accepted and wrapped into `[0, 360)`.
    pub fn set_rotation_angle(&mut self, rotation_angle: Fixed) {
        let full_turn = Fixed::from_num(360);
        let mut angle = rotation_angle % full_turn;
        if angle < ZERO {
            angle += full_turn;
        }
        self.rotation_angle = angle;
        let (sin, cos) = degrees_sin_cos(angle);
        self.sin = sin;
        self.cos = cos;
        self.update_registers();
    }

    pub fn horizontal_scale(&self) -> Fixed {
        return self.horizontal_scale;
    }

    /// Panics if the scale isn't positive.
    pub fn set_horizontal_scale(&mut self, horizontal_scale: Fixed) {
        assert_scale(horizontal_scale);
        self.horizontal_scale = horizontal_scale;
        self.sx = output_scale(horizontal_scale);
        self.update_registers();
    }

    pub fn vertical_scale(&self) -> Fixed {
        return self.vertical_scale;
    }

    /// Panics if the scale isn't positive.
    pub fn set_vertical_scale(&mut self, vertical_scale: Fixed) {
        assert_scale(vertical_scale);
        self.vertical_scale = vertical_scale;
        self.sy = output_scale(vertical_scale);
        self.update_registers();
    }

    /// Set both scales at once. Panics if the scale isn't positive.
    pub fn set_scale(&mut self, scale: Fixed) {
        self.set_scales(scale, scale);
    }

    pub fn set_scales(&mut self, horizontal_scale: Fixed, vertical_scale: Fixed) {
        assert_scale(horizontal_scale);
        assert_scale(vertical_scale);
        self.horizontal_scale = horizontal_scale;
        self.vertical_scale = vertical_scale;
        self.sx = output_scale(horizontal_scale);
        self.sy = output_scale(vertical_scale);
        self.update_registers();
    }

    pub fn horizontal_shear(&self) -> Fixed {
        return self.horizontal_shear;
    }

    pub fn set_horizontal_shear(&mut self, horizontal_shear: Fixed) {
        self.horizontal_shear = horizontal_shear;
        self.update_registers();
    }

    pub fn vertical_shear(&self) -> Fixed {
        return self.vertical_shear;
    }

    pub fn set_vertical_shear(&mut self, vertical_shear: Fixed) {
        self.vertical_shear = vertical_shear;
        self.update_registers();
    }

    pub fn set_shear(&mut self, shear: Fixed) {
        self.horizontal_shear = shear;
        self.vertical_shear = shear;
        self.update_registers();
    }

    pub fn horizontal_flip(&self) -> bool {
        return self.horizontal_flip;
    }

    pub fn set_horizontal_flip(&mut self, horizontal_flip: bool) {
        self.horizontal_flip = horizontal_flip;
        self.update_registers();
    }

    pub fn vertical_flip(&self) -> bool {
        return self.vertical_flip;
    }

    pub fn set_vertical_flip(&mut self, vertical_flip: bool) {
        self.vertical_flip = vertical_flip;
        self.update_registers();
    }

    /// Whether the matrix leaves sprites untouched.
    pub fn is_identity(&self) -> bool {
        return self.is_flipped_identity() && !self.horizontal_flip && !self.vertical_flip;
    }

    /// Whether the matrix does nothing a regular sprite's flip bits couldn't do.
    pub fn is_flipped_identity(&self) -> bool {
        let one = Fixed::from_num(1);
        return self.rotation_angle == ZERO
            && self.horizontal_scale == one
            && self.vertical_scale == one
            && self.horizontal_shear == ZERO
            && self.vertical_shear == ZERO;
    }

    pub fn pa_register_value(&self) -> i16 {
        return self.registers[0];
    }

    pub fn pb_register_value(&self) -> i16 {
        return self.registers[1];
    }

    pub fn pc_register_value(&self) -> i16 {
        return self.registers[2];
    }

    pub fn pd_register_value(&self) -> i16 {
        return self.registers[3];
    }

    /// pa, pb, pc and pd, in that order.
    pub fn registers(&self) -> [i16; 4] {
        return self.registers;
    }

    fn update_registers(&mut self) {
        let hflip = if self.horizontal_flip { -1 } else { 1 };
        let vflip = if self.vertical_flip { -1 } else { 1 };
        let sx = self.sx * hflip;
        let sy = self.sy * vflip;
        let horizontal_shear = self.horizontal_shear.to_bits() >> 4;
        let vertical_shear = self.vertical_shear.to_bits() >> 4;
        self.registers = [
            ((self.cos * sx) >> 12) as i16,
            (((-self.sin * sx) >> 12) + horizontal_shear) as i16,
            (((self.sin * sy) >> 12) + vertical_shear) as i16,
            ((self.cos * sy) >> 12) as i16,
        ];
    }
}

fn assert_scale(scale: Fixed) {
    if scale <= ZERO {
        panic!("{} ({})", SpriteError::InvalidScale, scale);
    }
}

/// Whether the corners of a sprite with the given half dimensions map outside of its
/// non-doubled area through the inverse matrix `pa pb pc pd / divisor`.
fn corners_out_of_bounds(
    half_width: i32,
    half_height: i32,
    pa: i32,
    pb: i32,
    pc: i32,
    pd: i32,
    divisor: i32,
) -> bool {
    if pb != 0 || pd != 0 {
        let ix1 = ((-256 * half_height * pb) - (256 * half_width * pd) + (256 * pb)) / divisor;
        if ix1 < -half_width || ix1 >= half_width {
            return true;
        }
        let ix2 = ((-256 * half_height * pb) + (256 * half_width * pd) + (256 * pb) - (256 * pd))
            / divisor;
        if ix2 < -half_width || ix2 >= half_width {
            return true;
        }
    }
    let iy1 = (256 * ((half_height * pa) + (half_width * pc) - pa)) / divisor;
    if iy1 < -half_height || iy1 >= half_height {
        return true;
    }
    let iy2 = (256 * ((half_height * pa) - (half_width * pc) - pa + pc)) / divisor;
    return iy2 < -half_height || iy2 >= half_height;
}

/// Per-frame summary of what happened to the matrices since the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffineMatsUpdate {
    /// Bit `n` is set if the registers of matrix `n` changed, so sprites deciding
    /// their double size automatically have to reconsider it.
    pub registers_changed: u32,
    /// Bit `n` is set if matrix `n` became a flipped identity while sprites were attached,
    /// so those sprites may drop it.
    pub remove_if_not_needed: u32,
}

/// Range of matrices to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineMatsCommitData {
    pub offset: usize,
    pub count: usize,
}

struct AffineMatItem {
    attributes: AffineMatAttributes,
    usages: u32,
    flipped_identity: bool,
    remove_if_not_needed: bool,
    attached_head: Option<u16>,
    attached_tail: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default)]
struct AttachNode {
    prev: Option<u16>,
    next: Option<u16>,
}

/// Owner of the 32 hardware affine matrices.
pub struct AffineMatsManager {
    items: Box<[Option<AffineMatItem>]>,
    free_ids: ArrayVec<u8, AFFINE_MATS_COUNT>,
    /// Links between the sprites attached to the same matrix, indexed by sprite item slot.
    attach_nodes: Box<[AttachNode]>,
    reserved_sprite_handles_count: usize,
    to_commit: CommitRange,
    registers_changed: u32,
    remove_if_not_needed: u32,
}

impl AffineMatsManager {
    /// Create a manager for sprites living in item slots `0..sprite_items_count`.
    pub fn new(sprite_items_count: usize) -> AffineMatsManager {
        let mut items = Vec::with_capacity(AFFINE_MATS_COUNT);
        let mut free_ids = ArrayVec::new();
        for id in 0..AFFINE_MATS_COUNT {
            items.push(None);
            free_ids.push((AFFINE_MATS_COUNT - 1 - id) as u8);
        }
        let mut attach_nodes = Vec::with_capacity(sprite_items_count);
        attach_nodes.resize(sprite_items_count, AttachNode::default());
        return AffineMatsManager {
            items: items.into_boxed_slice(),
            free_ids,
            attach_nodes: attach_nodes.into_boxed_slice(),
            reserved_sprite_handles_count: 0,
            to_commit: CommitRange::empty(AFFINE_MATS_COUNT),
            registers_changed: 0,
            remove_if_not_needed: 0,
        };
    }

    pub fn used_count(&self) -> usize {
        return AFFINE_MATS_COUNT - self.free_ids.len();
    }

    pub fn available_count(&self) -> usize {
        return self.free_ids.len();
    }

    /// Create a matrix with the given attributes and one usage.
    ///
    /// Panics if every matrix is in use.
    pub fn create(&mut self, attributes: AffineMatAttributes) -> AffineMatId {
        match self.try_create(attributes) {
            Ok(id) => return id,
            Err(err) => panic!("{}", err),
        }
    }

    /// Like `create()`, but returns `None` if every matrix is in use.
    pub fn create_optional(&mut self, attributes: AffineMatAttributes) -> Option<AffineMatId> {
        match self.try_create(attributes) {
            Ok(id) => return Some(id),
            Err(_) => {
                debug_log!(Subsystems::AffineMats, "No more affine mats available");
                return None;
            }
        }
    }

    fn try_create(&mut self, attributes: AffineMatAttributes) -> Result<AffineMatId, SpriteError> {
        let id = self.new_id().ok_or(SpriteError::AffineMatsFull)?;
        self.items[usize::from(id)] = Some(AffineMatItem {
            attributes,
            usages: 1,
            flipped_identity: attributes.is_flipped_identity(),
            remove_if_not_needed: false,
            attached_head: None,
            attached_tail: None,
        });
        self.to_commit.include(usize::from(id));
        debug_log!(
            Subsystems::AffineMats,
            "Created affine mat {} ({} in use)",
            id,
            self.used_count()
        );
        return Ok(AffineMatId(id));
    }

    /// Pick a free matrix whose registers don't live in reserved OAM slots.
    fn new_id(&mut self) -> Option<u8> {
        let reserved = self.reserved_sprite_handles_count;
        let position = self
            .free_ids
            .iter()
            .rposition(|id| usize::from(*id) * AFFINE_MAT_SLOTS >= reserved)?;
        return Some(self.free_ids.remove(position));
    }

    pub fn usages(&self, id: AffineMatId) -> u32 {
        return self.item(id).usages;
    }

    pub fn increase_usages(&mut self, id: AffineMatId) {
        self.item_mut(id).usages += 1;
    }

    /// Drop a usage, releasing the matrix when none are left.
    pub fn decrease_usages(&mut self, id: AffineMatId) {
        let item = self.item_mut(id);
        item.usages -= 1;
        if item.usages == 0 {
            self.items[id.id()] = None;
            self.free_ids.push(id.0);
            self.remove_if_not_needed &= !(1 << id.0);
            self.registers_changed &= !(1 << id.0);
            debug_log!(
                Subsystems::AffineMats,
                "Released affine mat {} ({} in use)",
                id.id(),
                self.used_count()
            );
        }
    }

    /// Whether `id` refers to a matrix in use.
    pub fn contains(&self, id: AffineMatId) -> bool {
        return self.items.get(id.id()).map_or(false, |item| item.is_some());
    }

    pub fn attributes(&self, id: AffineMatId) -> &AffineMatAttributes {
        return &self.item(id).attributes;
    }

    pub fn set_attributes(&mut self, id: AffineMatId, attributes: AffineMatAttributes) {
        self.modify(id, |current| *current = attributes);
    }

    pub fn set_rotation_angle(&mut self, id: AffineMatId, rotation_angle: Fixed) {
        self.modify(id, |attributes| attributes.set_rotation_angle(rotation_angle));
    }

    pub fn set_horizontal_scale(&mut self, id: AffineMatId, horizontal_scale: Fixed) {
        self.modify(id, |attributes| attributes.set_horizontal_scale(horizontal_scale));
    }

    pub fn set_vertical_scale(&mut self, id: AffineMatId, vertical_scale: Fixed) {
        self.modify(id, |attributes| attributes.set_vertical_scale(vertical_scale));
    }

    pub fn set_scale(&mut self, id: AffineMatId, scale: Fixed) {
        self.modify(id, |attributes| attributes.set_scale(scale));
    }

    pub fn set_horizontal_shear(&mut self, id: AffineMatId, horizontal_shear: Fixed) {
        self.modify(id, |attributes| attributes.set_horizontal_shear(horizontal_shear));
    }

    pub fn set_vertical_shear(&mut self, id: AffineMatId, vertical_shear: Fixed) {
        self.modify(id, |attributes| attributes.set_vertical_shear(vertical_shear));
    }

    pub fn set_shear(&mut self, id: AffineMatId, shear: Fixed) {
        self.modify(id, |attributes| attributes.set_shear(shear));
    }

    pub fn horizontal_flip(&self, id: AffineMatId) -> bool {
        return self.item(id).attributes.horizontal_flip();
    }

    /// Flips don't change the area a sprite covers, so sprites aren't told about them.
    pub fn set_horizontal_flip(&mut self, id: AffineMatId, horizontal_flip: bool) {
        let item = self.item_mut(id);
        if item.attributes.horizontal_flip() != horizontal_flip {
            item.attributes.set_horizontal_flip(horizontal_flip);
            self.to_commit.include(id.id());
        }
    }

    pub fn vertical_flip(&self, id: AffineMatId) -> bool {
        return self.item(id).attributes.vertical_flip();
    }

    pub fn set_vertical_flip(&mut self, id: AffineMatId, vertical_flip: bool) {
        let item = self.item_mut(id);
        if item.attributes.vertical_flip() != vertical_flip {
            item.attributes.set_vertical_flip(vertical_flip);
            self.to_commit.include(id.id());
        }
    }

    pub fn is_identity(&self, id: AffineMatId) -> bool {
        return self.item(id).attributes.is_identity();
    }

    pub fn is_flipped_identity(&self, id: AffineMatId) -> bool {
        return self.item(id).flipped_identity;
    }

    /// Register values of a matrix: pa, pb, pc and pd.
    pub fn registers(&self, id: AffineMatId) -> [i16; 4] {
        return self.item(id).attributes.registers();
    }

    /// Apply a change to a matrix's attributes, and keep track of its consequences.
    fn modify<F: FnOnce(&mut AffineMatAttributes)>(&mut self, id: AffineMatId, change: F) {
        let item = self.item_mut(id);
        let old_registers = item.attributes.registers();
        change(&mut item.attributes);

        if item.attributes.is_flipped_identity() {
            if !item.flipped_identity {
                item.flipped_identity = true;
                if item.attached_head.is_some() {
                    item.remove_if_not_needed = true;
                    self.remove_if_not_needed |= 1 << id.0;
                }
            }
        } else {
            item.flipped_identity = false;
            item.remove_if_not_needed = false;
            self.remove_if_not_needed &= !(1 << id.0);
        }

        if self.item(id).attributes.registers() != old_registers {
            self.to_commit.include(id.id());
            self.registers_changed |= 1 << id.0;
        }
    }

    /// Add a sprite item to the list of sprites using a matrix.
    pub fn attach_sprite(&mut self, id: AffineMatId, sprite_item: u16) {
        let old_tail = self.item(id).attached_tail;
        self.attach_nodes[usize::from(sprite_item)] = AttachNode {
            prev: old_tail,
            next: None,
        };
        match old_tail {
            Some(tail) => self.attach_nodes[usize::from(tail)].next = Some(sprite_item),
            None => self.item_mut(id).attached_head = Some(sprite_item),
        }
        self.item_mut(id).attached_tail = Some(sprite_item);
    }

    /// Remove a sprite item from the list of sprites using a matrix.
    pub fn dettach_sprite(&mut self, id: AffineMatId, sprite_item: u16) {
        let node = self.attach_nodes[usize::from(sprite_item)];
        match node.prev {
            Some(prev) => self.attach_nodes[usize::from(prev)].next = node.next,
            None => self.item_mut(id).attached_head = node.next,
        }
        match node.next {
            Some(next) => self.attach_nodes[usize::from(next)].prev = node.prev,
            None => self.item_mut(id).attached_tail = node.prev,
        }
        self.attach_nodes[usize::from(sprite_item)] = AttachNode::default();
    }

    /// Sprite items attached to a matrix, in attachment order.
    pub fn attached_sprites(&self, id: AffineMatId) -> ArrayVec<u16, MAX_SPRITE_ITEMS> {
        let mut result = ArrayVec::new();
        let mut next = self.item(id).attached_head;
        while let Some(sprite_item) = next {
            result.push(sprite_item);
            next = self.attach_nodes[usize::from(sprite_item)].next;
        }
        return result;
    }

    /// Whether a sprite of the given size needs double size mode to be drawn
    /// without clipping through this matrix.
    pub fn sprite_double_size(&self, id: AffineMatId, shape_size: SpriteShapeSize) -> bool {
        let item = self.item(id);
        if item.flipped_identity {
            return false;
        }
        let [pa, pb, pc, pd] = item.attributes.registers();
        let (pa, pb, pc, pd) = (i32::from(pa), i32::from(pb), i32::from(pc), i32::from(pd));
        let divisor = (pa * pd) - (pb * pc);
        if divisor == 0 {
            return true;
        }
        let (half_width, half_height) = match (shape_size.shape(), shape_size.size()) {
            (SpriteShape::Square, _) => (32, 32),
            (SpriteShape::Wide, SpriteSize::Normal) => (32, 8),
            (SpriteShape::Wide, _) => (32, 16),
            (SpriteShape::Tall, SpriteSize::Normal) => (8, 32),
            (SpriteShape::Tall, _) => (16, 32),
        };
        return corners_out_of_bounds(half_width, half_height, pa, pb, pc, pd, divisor);
    }

    /// Keep new matrices away from the OAM slots reserved for other subsystems.
    ///
    /// Panics if a matrix in use already lives in one of those slots.
    pub fn reserve_sprite_handles(&mut self, sprite_handles_count: usize) {
        let first_free_id = (sprite_handles_count + AFFINE_MAT_SLOTS - 1) / AFFINE_MAT_SLOTS;
        if let Some(used_id) = (0..first_free_id.min(AFFINE_MATS_COUNT))
            .find(|id| self.items[*id].is_some())
        {
            panic!(
                "Reserved sprite handles used by affine mats: {} - {}",
                sprite_handles_count, used_id
            );
        }
        self.reserved_sprite_handles_count = sprite_handles_count;
        if let Some((first, last)) = self.to_commit.get() {
            self.to_commit.set(first.max(first_free_id), last);
        }
    }

    /// Commit a matrix again even if it didn't change.
    pub fn reload(&mut self, id: AffineMatId) {
        self.to_commit.include(id.id());
    }

    /// Collect the changes sprites have to react to since the last update.
    pub fn update(&mut self) -> AffineMatsUpdate {
        let result = AffineMatsUpdate {
            registers_changed: self.registers_changed,
            remove_if_not_needed: self.remove_if_not_needed,
        };
        self.registers_changed = 0;
        self.remove_if_not_needed = 0;
        let mut pending = result.remove_if_not_needed;
        while pending != 0 {
            let id = pending.trailing_zeros() as usize;
            pending &= pending - 1;
            if let Some(item) = self.items[id].as_mut() {
                item.remove_if_not_needed = false;
            }
        }
        return result;
    }

    /// Range of matrices to commit, resetting it.
    pub fn retrieve_commit_data(&mut self) -> Option<AffineMatsCommitData> {
        let result = self.to_commit.get().map(|(first, last)| AffineMatsCommitData {
            offset: first,
            count: last - first + 1,
        });
        self.to_commit.reset();
        return result;
    }

    fn item(&self, id: AffineMatId) -> &AffineMatItem {
        match self.items.get(id.id()).and_then(|item| item.as_ref()) {
            Some(item) => return item,
            None => panic!("{}", SpriteError::InvalidAffineMat(id.id())),
        }
    }

    fn item_mut(&mut self, id: AffineMatId) -> &mut AffineMatItem {
        match self.items.get_mut(id.id()).and_then(|item| item.as_mut()) {
            Some(item) => return item,
            None => panic!("{}", SpriteError::InvalidAffineMat(id.id())),
        }
    }
}
