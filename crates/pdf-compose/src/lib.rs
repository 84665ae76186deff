pub mod constants;
mod counter;
pub mod decode;
mod generate;
pub mod layout;
mod options;
pub mod render;
mod selection;
mod types;

pub use counter::*;
pub use decode::{DecodedImage, NoRasterizer, RasterizeError, Rasterizer, default_rasterizer};
pub use generate::*;
pub use layout::{PlacementCommand, Rect, SlotPlacement, compute_slots, plan_page};
pub use options::*;
pub use selection::*;
pub use types::*;

#[cfg(feature = "pdfium")]
pub use decode::PdfiumRasterizer;
