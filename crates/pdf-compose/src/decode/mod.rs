//! Turning input files into bitmaps
//!
//! Images are decoded directly. PDFs are rasterized (page 1 only) through
//! a [`Rasterizer`]; a failed rasterization is replaced by a placeholder
//! bitmap so that one bad PDF never aborts the batch.

mod placeholder;
mod rasterize;

pub use placeholder::placeholder_image;
pub use rasterize::*;

use crate::types::*;
use image::DynamicImage;
use std::sync::{Arc, Mutex};

/// An in-memory bitmap derived from an [`InputFile`]
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Name of the input file this bitmap came from
    pub source_name: String,
    pub image: DynamicImage,
    /// True when this is the fallback for a failed rasterization
    pub placeholder: bool,
}

impl DecodedImage {
    pub fn new(source_name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            source_name: source_name.into(),
            image,
            placeholder: false,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode a batch of files, preserving input order.
///
/// Every file is decoded on the blocking pool at once; results are
/// awaited in input order, so the output order never depends on which
/// decode finishes first. PDFs are rasterized one at a time when the
/// rasterizer does not support parallel calls.
pub async fn decode_batch(
    files: &[InputFile],
    rasterizer: Arc<dyn Rasterizer>,
) -> Result<Vec<DecodedImage>> {
    let rasterize_lock = (!rasterizer.supports_parallel()).then(|| Arc::new(Mutex::new(())));

    let handles: Vec<_> = files
        .iter()
        .cloned()
        .map(|file| {
            let rasterizer = Arc::clone(&rasterizer);
            let lock = rasterize_lock.clone().filter(|_| file.is_pdf());
            tokio::task::spawn_blocking(move || {
                let _guard = lock
                    .as_ref()
                    .map(|lock| lock.lock().unwrap_or_else(|e| e.into_inner()));
                decode_file(&file, rasterizer.as_ref())
            })
        })
        .collect();

    let mut decoded = Vec::with_capacity(handles.len());
    for handle in handles {
        decoded.push(handle.await??);
    }
    Ok(decoded)
}

/// Decode a single file
pub fn decode_file(file: &InputFile, rasterizer: &dyn Rasterizer) -> Result<DecodedImage> {
    match file.kind {
        MediaKind::Image => {
            let image =
                image::load_from_memory(&file.bytes).map_err(|source| ComposeError::Decode {
                    name: file.name.clone(),
                    source,
                })?;
            log::debug!(
                "Decoded '{}' ({}x{})",
                file.name,
                image.width(),
                image.height()
            );
            Ok(DecodedImage::new(file.name.clone(), image))
        }
        MediaKind::Pdf => match rasterizer.rasterize_first_page(&file.bytes) {
            Ok(image) => {
                log::debug!(
                    "Rasterized '{}' ({}x{})",
                    file.name,
                    image.width(),
                    image.height()
                );
                Ok(DecodedImage::new(file.name.clone(), image))
            }
            Err(e) => {
                log::warn!("PDF conversion failed for '{}': {}", file.name, e);
                Ok(DecodedImage {
                    source_name: file.name.clone(),
                    image: placeholder_image(),
                    placeholder: true,
                })
            }
        },
    }
}
