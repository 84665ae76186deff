//! Column layout geometry
//!
//! The usable page width is split into `column_count` equal columns
//! separated by `column_gap`. Each image is a square cell anchored to
//! the bottom offset and centered horizontally within its column.

use crate::options::ColumnGeometry;

use super::{Rect, SlotPlacement};

/// Width of a single column
pub fn column_width_mm(columns: &ColumnGeometry, page_width: f32) -> f32 {
    if columns.column_count == 0 {
        return 0.0;
    }
    let count = columns.column_count as f32;
    (page_width - 2.0 * columns.side_margin_mm - (count - 1.0) * columns.column_gap_mm) / count
}

/// Left edge of column `index`
pub fn column_left_mm(columns: &ColumnGeometry, page_width: f32, index: usize) -> f32 {
    let width = column_width_mm(columns, page_width);
    columns.side_margin_mm + index as f32 * (width + columns.column_gap_mm)
}

/// Slots for up to `limit` cells, one per column
pub fn column_slots(
    columns: &ColumnGeometry,
    page_width: f32,
    page_height: f32,
    limit: usize,
) -> Vec<SlotPlacement> {
    let width = column_width_mm(columns, page_width);
    let y = page_height - columns.bottom_offset_mm - columns.cell_size_mm;

    (0..limit.min(columns.column_count))
        .map(|slot_index| {
            let left = column_left_mm(columns, page_width, slot_index);
            let x = left + (width - columns.cell_size_mm) / 2.0;
            SlotPlacement {
                slot_index,
                rect: Rect::new(x, y, columns.cell_size_mm, columns.cell_size_mm),
                rotation_degrees: 0.0,
            }
        })
        .collect()
}
