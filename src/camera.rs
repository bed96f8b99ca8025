//! Cameras shift every sprite attached to them.
//!
//! A camera is shared between the code moving it and any number of sprites,
//! so it's a reference-counted cell rather than something the sprites manager owns.

use alloc::rc::Rc;
use core::cell::Cell;

use crate::shared_types::{FixedPoint, Point};

/// A shared handle to a camera.
///
/// Two handles are equal if they refer to the same camera.
#[derive(Clone, Debug)]
pub struct CameraPtr {
    position: Rc<Cell<FixedPoint>>,
}

impl CameraPtr {
    pub fn new(position: FixedPoint) -> CameraPtr {
        return CameraPtr {
            position: Rc::new(Cell::new(position)),
        };
    }

    pub fn position(&self) -> FixedPoint {
        return self.position.get();
    }

    /// Move the camera.
    ///
    /// Sprites attached to it only pick up the new position on the next
    /// `SpritesManager::update_cameras()` call.
    pub fn set_position(&self, position: FixedPoint) {
        self.position.set(position);
    }

    /// Whole-pixel offset subtracted from the position of attached sprites.
    pub(crate) fn offset(&self) -> Point {
        return self.position.get().floor();
    }
}

impl PartialEq for CameraPtr {
    fn eq(&self, other: &CameraPtr) -> bool {
        return Rc::ptr_eq(&self.position, &other.position);
    }
}

impl Eq for CameraPtr {}
