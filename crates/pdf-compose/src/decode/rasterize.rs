use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(feature = "pdfium")]
use std::sync::Mutex;
use thiserror::Error;

#[cfg(feature = "pdfium")]
use crate::constants::RASTERIZE_SCALE;
#[cfg(feature = "pdfium")]
use pdfium_render::prelude::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rasterization failed: {0}")]
pub struct RasterizeError(pub String);

/// Renders page 1 of a PDF into a bitmap
pub trait Rasterizer: Send + Sync {
    fn rasterize_first_page(&self, pdf_bytes: &[u8]) -> Result<DynamicImage, RasterizeError>;

    /// Whether several calls may run at the same time on different threads
    fn supports_parallel(&self) -> bool {
        true
    }
}

/// A rasterizer that always fails, so every PDF becomes a placeholder
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRasterizer;

impl Rasterizer for NoRasterizer {
    fn rasterize_first_page(&self, _pdf_bytes: &[u8]) -> Result<DynamicImage, RasterizeError> {
        Err(RasterizeError(
            "PDF rasterization is not available".to_string(),
        ))
    }
}

/// The best rasterizer this build supports
pub fn default_rasterizer(library_dir: Option<PathBuf>) -> Arc<dyn Rasterizer> {
    #[cfg(feature = "pdfium")]
    {
        Arc::new(PdfiumRasterizer::new(library_dir))
    }
    #[cfg(not(feature = "pdfium"))]
    {
        if library_dir.is_some() {
            log::warn!("Built without pdfium support; ignoring pdfium library directory");
        }
        Arc::new(NoRasterizer)
    }
}

/// pdfium is bound, initialized and destroyed per call. The library is
/// process-global and not thread-safe, so only one call may hold it.
#[cfg(feature = "pdfium")]
static PDFIUM_LOCK: Mutex<()> = Mutex::new(());

/// Rasterizer backed by the pdfium library
#[cfg(feature = "pdfium")]
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

#[cfg(feature = "pdfium")]
impl PdfiumRasterizer {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }

    /// Bind pdfium, trying the configured directory, then the vendored
    /// library, then the system library
    fn init_pdfium(&self) -> Result<Pdfium, PdfiumError> {
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        for dir in self.library_dir.iter().chain(vendor_path.iter()) {
            match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
                Ok(binding) => return Ok(Pdfium::new(binding)),
                Err(e) => log::debug!("No pdfium at {}: {}", dir.display(), e),
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }
}

#[cfg(feature = "pdfium")]
impl Rasterizer for PdfiumRasterizer {
    fn rasterize_first_page(&self, pdf_bytes: &[u8]) -> Result<DynamicImage, RasterizeError> {
        let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let pdfium = self
            .init_pdfium()
            .map_err(|e| RasterizeError(format!("pdfium unavailable: {}", e)))?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| RasterizeError(format!("failed to load PDF: {}", e)))?;
        let page = document
            .pages()
            .get(0)
            .map_err(|e| RasterizeError(format!("failed to open page 1: {}", e)))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(RASTERIZE_SCALE);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RasterizeError(format!("failed to render page 1: {}", e)))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba_data = bitmap.as_rgba_bytes().to_vec();

        image::RgbaImage::from_raw(width, height, rgba_data)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| RasterizeError("rendered bitmap has an unexpected size".to_string()))
    }

    fn supports_parallel(&self) -> bool {
        false
    }
}
