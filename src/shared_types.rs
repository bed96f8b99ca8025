//! This module contains types that don't really belong into other modules,
//! yet are used by several of them.

use core::ops::{Add, Sub};

use fixed::{types::extra::U12, FixedI32};

/// A fixed-point number is used for positions because the GBA has no FPU.
/// It has 19 bits of precision before and 12 after the comma.
pub type Fixed = FixedI32<U12>;
/// The zero value for a `Fixed`.
pub const ZERO: Fixed = Fixed::from_bits(0);

/// Integer part of a fixed-point value, rounded towards negative infinity.
#[inline]
pub fn floor_int(value: Fixed) -> i32 {
    return value.to_bits() >> 12;
}

/// A sub-pixel position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedPoint {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedPoint {
    pub const fn new(x: Fixed, y: Fixed) -> FixedPoint {
        return FixedPoint { x, y };
    }

    /// Create a position from whole pixels.
    pub fn from_ints(x: i32, y: i32) -> FixedPoint {
        return FixedPoint {
            x: Fixed::from_num(x),
            y: Fixed::from_num(y),
        };
    }

    /// Position rounded down to whole pixels.
    pub fn floor(&self) -> Point {
        return Point::new(floor_int(self.x), floor_int(self.y));
    }
}

/// A whole-pixel position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        return Point { x, y };
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        return Point::new(self.x + other.x, self.y + other.y);
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        return Point::new(self.x - other.x, self.y - other.y);
    }
}

/// Global display state the sprite subsystem has to take into account.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// While the blend-fade effect is active, the meaning of the hardware blend bit is inverted.
    pub blending_fade_enabled: bool,
}
