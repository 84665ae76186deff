//! Layout data types
//!
//! All coordinates are millimeters with the origin at the top-left corner
//! of the page and y growing downward. Conversion to PDF user space
//! happens in the renderer.

use crate::decode::DecodedImage;

/// A rectangular area in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where one slot of the layout sits on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlacement {
    /// Index of the slot, equal to the index of the image placed in it
    pub slot_index: usize,
    /// Target area on the page
    pub rect: Rect,
    /// Rotation to apply in degrees (0.0 or 180.0)
    pub rotation_degrees: f32,
}

impl SlotPlacement {
    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees.abs() > 0.1
    }
}

/// One image ready to be drawn on the page
///
/// Produced in input order and consumed exactly once by the renderer.
#[derive(Debug, Clone)]
pub struct PlacementCommand {
    /// Bitmap to embed (already resampled for strip layouts)
    pub image: DecodedImage,
    pub slot: SlotPlacement,
}
