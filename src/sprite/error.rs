use crate::config::ConfigError;

/// The error returned in sprite management failure cases.
///
/// Most of these are programmer errors: the public operations panic with the message of the
/// error instead of returning it, except for the `*_optional` creation paths.
#[derive(Clone, Debug, PartialEq)]
pub enum SpriteError {
    ItemsPoolFull,
    SortLayersFull,
    TooManyOnScreen,
    InvalidHandle,
    InvalidTilesCount { expected: usize, actual: usize },
    BppMismatch,
    InvalidBgPriority(i32),
    InvalidZOrder(i32),
    BlendingAndWindow,
    NotRegular,
    NotAffine,
    InvalidReservedHandlesCount(usize),
    AffineMatsFull,
    InvalidAffineMat(usize),
    InvalidScale,
    Config(ConfigError),
}

impl core::fmt::Display for SpriteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use SpriteError::*;
        match self {
            ItemsPoolFull => write!(f, "SpriteError: No more sprite items available"),
            SortLayersFull => write!(f, "SpriteError: No more sprite sort layers available"),
            TooManyOnScreen => write!(
                f,
                "SpriteError: Too many sprites on screen for the available OAM slots"
            ),
            InvalidHandle => write!(
                f,
                "SpriteError: Sprite handle refers to a sprite that no longer exists"
            ),
            InvalidTilesCount { expected, actual } => write!(
                f,
                "SpriteError: Invalid tiles count: {} - {}",
                actual, expected
            ),
            BppMismatch => write!(f, "SpriteError: Different palette BPP mode"),
            InvalidBgPriority(bg_priority) => {
                write!(f, "SpriteError: Invalid BG priority: {}", bg_priority)
            }
            InvalidZOrder(z_order) => write!(f, "SpriteError: Invalid z order: {}", z_order),
            BlendingAndWindow => write!(
                f,
                "SpriteError: Blending and window can't be enabled at the same time"
            ),
            NotRegular => write!(f, "SpriteError: Sprite is not regular"),
            NotAffine => write!(f, "SpriteError: Sprite is not affine"),
            InvalidReservedHandlesCount(count) => write!(
                f,
                "SpriteError: Invalid reserved handles count: {}",
                count
            ),
            AffineMatsFull => write!(f, "SpriteError: No more sprite affine mats available"),
            InvalidAffineMat(id) => write!(
                f,
                "SpriteError: Affine mat {} is not in use",
                id
            ),
            InvalidScale => write!(f, "SpriteError: Affine mat scales must be greater than zero"),
            Config(config_err) => write!(f, "SpriteError: Invalid configuration: {}", config_err),
        }
    }
}

impl From<ConfigError> for SpriteError {
    fn from(err: ConfigError) -> SpriteError {
        return SpriteError::Config(err);
    }
}
