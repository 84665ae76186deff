//! Strip layout geometry
//!
//! Strips are fixed-size horizontal bands. A mirrored layout puts two
//! strips at the same height against the left and right margins; a
//! stacked layout centers a single column of strips and grows it upward
//! from the bottom offset.

use crate::constants::{GEOMETRY_EPSILON, STACKED_TOP_MARGIN_MM};
use crate::options::{StripAnchor, StripGeometry};

use super::{Rect, SlotPlacement};

/// Slots for up to `limit` strips
pub fn strip_slots(
    strip: &StripGeometry,
    page_width: f32,
    page_height: f32,
    limit: usize,
) -> Vec<SlotPlacement> {
    let rotation_degrees = if strip.rotate_180 { 180.0 } else { 0.0 };

    let origins: Vec<(f32, f32)> = match strip.anchor {
        StripAnchor::Mirrored { top_offset_mm } => {
            let left_x = strip.side_margin_mm;
            let right_x = page_width - strip.side_margin_mm - strip.strip_width_mm;
            [left_x, right_x]
                .into_iter()
                .take(limit)
                .map(|x| (x, top_offset_mm))
                .collect()
        }
        StripAnchor::Stacked {
            bottom_offset_mm,
            gap_mm,
        } => {
            let x = stacked_x_mm(strip, page_width);
            let first_y = page_height - bottom_offset_mm - strip.strip_height_mm;
            let step = strip.strip_height_mm + gap_mm;
            let count = stacked_fit_count(strip, page_height).min(limit);
            (0..count)
                .map(|i| (x, first_y - i as f32 * step))
                .collect()
        }
    };

    origins
        .into_iter()
        .enumerate()
        .map(|(slot_index, (x, y))| SlotPlacement {
            slot_index,
            rect: Rect::new(x, y, strip.strip_width_mm, strip.strip_height_mm),
            rotation_degrees,
        })
        .collect()
}

/// Horizontal position of a stacked strip (centered between the margins)
pub fn stacked_x_mm(strip: &StripGeometry, page_width: f32) -> f32 {
    strip.side_margin_mm
        + (page_width - 2.0 * strip.side_margin_mm - strip.strip_width_mm) / 2.0
}

/// Number of strips that fit before the stack would cross the top margin.
///
/// Mirrored layouts always have two positions.
pub fn stacked_fit_count(strip: &StripGeometry, page_height: f32) -> usize {
    let (bottom_offset_mm, gap_mm) = match strip.anchor {
        StripAnchor::Mirrored { .. } => return 2,
        StripAnchor::Stacked {
            bottom_offset_mm,
            gap_mm,
        } => (bottom_offset_mm, gap_mm),
    };

    let first_y = page_height - bottom_offset_mm - strip.strip_height_mm;
    if first_y + GEOMETRY_EPSILON < STACKED_TOP_MARGIN_MM {
        return 0;
    }

    let step = strip.strip_height_mm + gap_mm;
    if !(step.is_finite() && step > 0.0) {
        return 1;
    }

    ((first_y - STACKED_TOP_MARGIN_MM + GEOMETRY_EPSILON) / step).floor() as usize + 1
}
