use super::hw_attributes;

/// Aspect ratio of a hardware sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteShape {
    Square,
    Wide,
    Tall,
}

impl SpriteShape {
    /// Value of the shape bits in the first attributes word.
    pub fn bits(self) -> u16 {
        use SpriteShape::*;
        match self {
            Square => 0,
            Wide => 1,
            Tall => 2,
        }
    }

    pub fn from_bits(bits: u16) -> SpriteShape {
        use SpriteShape::*;
        match bits {
            0 => Square,
            1 => Wide,
            2 => Tall,
            _ => panic!("Invalid sprite shape bits: {}", bits),
        }
    }
}

/// Size class of a hardware sprite. Its meaning in pixels depends on the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteSize {
    Small,
    Normal,
    Big,
    Huge,
}

impl SpriteSize {
    /// Value of the size bits in the second attributes word.
    pub fn bits(self) -> u16 {
        use SpriteSize::*;
        match self {
            Small => 0,
            Normal => 1,
            Big => 2,
            Huge => 3,
        }
    }

    pub fn from_bits(bits: u16) -> SpriteSize {
        use SpriteSize::*;
        match bits & 3 {
            0 => Small,
            1 => Normal,
            2 => Big,
            _ => Huge,
        }
    }
}

/// Colour depth of sprite tiles and palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BppMode {
    /// 16 colours per sprite, palette selected by bank.
    Bpp4,
    /// 256 colours per sprite, the whole palette is used.
    Bpp8,
}

/// The sizes of sprite that the hardware supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteShapeSize {
    shape: SpriteShape,
    size: SpriteSize,
}

impl SpriteShapeSize {
    pub const EIGHT_BY_EIGHT: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Square, SpriteSize::Small);
    pub const SIXTEEN_BY_SIXTEEN: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Square, SpriteSize::Normal);
    pub const THIRTY_TWO_BY_THIRTY_TWO: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Square, SpriteSize::Big);
    pub const SIXTY_FOUR_BY_SIXTY_FOUR: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Square, SpriteSize::Huge);

    pub const SIXTEEN_BY_EIGHT: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Wide, SpriteSize::Small);
    pub const THIRTY_TWO_BY_EIGHT: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Wide, SpriteSize::Normal);
    pub const THIRTY_TWO_BY_SIXTEEN: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Wide, SpriteSize::Big);
    pub const SIXTY_FOUR_BY_THIRTY_TWO: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Wide, SpriteSize::Huge);

    pub const EIGHT_BY_SIXTEEN: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Tall, SpriteSize::Small);
    pub const EIGHT_BY_THIRTY_TWO: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Tall, SpriteSize::Normal);
    pub const SIXTEEN_BY_THIRTY_TWO: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Tall, SpriteSize::Big);
    pub const THIRTY_TWO_BY_SIXTY_FOUR: SpriteShapeSize = SpriteShapeSize::new(SpriteShape::Tall, SpriteSize::Huge);

    pub const fn new(shape: SpriteShape, size: SpriteSize) -> SpriteShapeSize {
        return SpriteShapeSize { shape, size };
    }

    pub fn shape(&self) -> SpriteShape {
        return self.shape;
    }

    pub fn size(&self) -> SpriteSize {
        return self.size;
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        return hw_attributes::base_dimensions(self.shape, self.size).0;
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        return hw_attributes::base_dimensions(self.shape, self.size).1;
    }

    /// Number of 8x8 tiles a sprite of this size occupies with the given colour depth.
    /// 8bpp tiles take twice the space of 4bpp ones, so they count double.
    pub fn tiles_count(&self, bpp: BppMode) -> usize {
        let count = ((self.width() / 8) * (self.height() / 8)) as usize;
        return match bpp {
            BppMode::Bpp4 => count,
            BppMode::Bpp8 => count * 2,
        };
    }
}
