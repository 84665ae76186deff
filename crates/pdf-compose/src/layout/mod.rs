//! Layout calculation for page composition
//!
//! This module turns a [`LayoutConfig`](crate::LayoutConfig) into placements:
//! - Strip geometry (mirrored pair or stacked column of bands)
//! - Column geometry (equal columns, bottom-anchored square cells)
//! - Command planning (pairing slots with decoded images, resampling strips)

mod columns;
mod plan;
mod strip;
mod types;

pub use columns::*;
pub use plan::*;
pub use strip::*;
pub use types::*;

use crate::options::{LayoutConfig, LayoutStrategy};

/// Compute the slots that `image_count` images occupy on the page.
///
/// Never returns more slots than the layout's capacity or than the
/// strategy can fill. Fewer images simply produce fewer slots.
pub fn compute_slots(config: &LayoutConfig, image_count: usize) -> Vec<SlotPlacement> {
    let (page_width, page_height) = config.page_dimensions_mm();
    let limit = image_count.min(config.capacity);

    match &config.strategy {
        LayoutStrategy::Strip(strip) => strip_slots(strip, page_width, page_height, limit),
        LayoutStrategy::Columns(columns) => column_slots(columns, page_width, page_height, limit),
    }
}
