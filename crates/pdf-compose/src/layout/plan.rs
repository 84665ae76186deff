//! Pairing decoded images with layout slots

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::constants::STRIP_SUPERSAMPLE;
use crate::decode::DecodedImage;
use crate::options::{LayoutConfig, LayoutStrategy, StripGeometry};

use super::{PlacementCommand, compute_slots};

/// Plan the page: one placement command per image, in input order.
///
/// Strip layouts stretch every bitmap to the strip size at 4x linear
/// resolution on a white background. Column layouts keep the bitmap as
/// decoded. Images beyond the available slots are dropped.
pub fn plan_page(images: Vec<DecodedImage>, config: &LayoutConfig) -> Vec<PlacementCommand> {
    let slots = compute_slots(config, images.len());

    if slots.len() < images.len() {
        log::warn!(
            "Layout '{}' has {} slots; dropping {} image(s)",
            config.name,
            slots.len(),
            images.len() - slots.len()
        );
    }

    images
        .into_iter()
        .zip(slots)
        .map(|(image, slot)| {
            let image = match &config.strategy {
                LayoutStrategy::Strip(strip) => resample_for_strip(&image, strip),
                LayoutStrategy::Columns(_) => image,
            };
            log::debug!(
                "Slot {}: '{}' at ({:.2}, {:.2}) {:.2}x{:.2}mm, {}°",
                slot.slot_index,
                image.source_name,
                slot.rect.x,
                slot.rect.y,
                slot.rect.width,
                slot.rect.height,
                slot.rotation_degrees
            );
            PlacementCommand { image, slot }
        })
        .collect()
}

/// Pixel size a strip bitmap is rendered at
pub fn strip_pixel_size(strip: &StripGeometry) -> (u32, u32) {
    let width = (strip.strip_width_mm * STRIP_SUPERSAMPLE).round().max(1.0) as u32;
    let height = (strip.strip_height_mm * STRIP_SUPERSAMPLE).round().max(1.0) as u32;
    (width, height)
}

/// Stretch an image to the strip's supersampled pixel size, flattened on white
pub fn resample_for_strip(image: &DecodedImage, strip: &StripGeometry) -> DecodedImage {
    let (width, height) = strip_pixel_size(strip);
    log::debug!(
        "Resampling '{}' from {}x{} to {}x{}",
        image.source_name,
        image.pixel_width(),
        image.pixel_height(),
        width,
        height
    );

    let stretched = image
        .image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8();

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut canvas, &stretched, 0, 0);

    DecodedImage {
        source_name: image.source_name.clone(),
        image: DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
        placeholder: image.placeholder,
    }
}
