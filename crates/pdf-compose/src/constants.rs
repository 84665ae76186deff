//! Shared constants for page composition
//!
//! This module centralizes magic numbers used throughout layout,
//! decoding and rendering.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Layout
// =============================================================================

/// Linear supersampling factor for strip bitmaps (pixels per millimeter)
pub const STRIP_SUPERSAMPLE: f32 = 4.0;

/// Stacked strips never start above this distance from the top edge (mm)
pub const STACKED_TOP_MARGIN_MM: f32 = 10.0;

/// Tolerance for floating point geometry checks (mm)
pub const GEOMETRY_EPSILON: f32 = 1e-3;

// =============================================================================
// Rasterization
// =============================================================================

/// Scale factor applied to page 1 of a PDF input when rasterizing
pub const RASTERIZE_SCALE: f32 = 2.0;

// =============================================================================
// Placeholder Bitmap
// =============================================================================

pub const PLACEHOLDER_WIDTH: u32 = 400;
pub const PLACEHOLDER_HEIGHT: u32 = 300;

/// Neutral background (#f0f0f0)
pub const PLACEHOLDER_BACKGROUND: [u8; 3] = [0xf0, 0xf0, 0xf0];

/// Caption and glyph color (#666666)
pub const PLACEHOLDER_INK: [u8; 3] = [0x66, 0x66, 0x66];

pub const PLACEHOLDER_CAPTION: &str = "PDF CONVERSION FAILED";

// =============================================================================
// Output
// =============================================================================

/// Stem of every generated file name
pub const OUTPUT_STEM: &str = "finaloutput";

/// Default file holding the sequence counter, relative to the output directory
pub const DEFAULT_COUNTER_FILE: &str = ".pdf-file-counter";

/// Counter value used when nothing valid is stored
pub const DEFAULT_COUNTER: u32 = 1;
