//! PDF rendering for page composition
//!
//! This module handles all PDF-specific operations:
//! - Embedding bitmaps as Image XObjects
//! - Building the single output page
//! - Generating placement transformation matrices

mod page;
mod xobject;

pub use page::*;
pub use xobject::create_image_xobject;
