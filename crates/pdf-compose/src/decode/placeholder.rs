//! Fallback bitmap for PDFs that could not be rasterized

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::constants::{
    PLACEHOLDER_BACKGROUND, PLACEHOLDER_CAPTION, PLACEHOLDER_HEIGHT, PLACEHOLDER_INK,
    PLACEHOLDER_WIDTH,
};

/// Pixel size of one font cell
const FONT_SCALE: u32 = 3;
const GLYPH_COLUMNS: u32 = 5;
const GLYPH_ROWS: usize = 7;
/// Horizontal advance per character, in font cells
const GLYPH_ADVANCE: u32 = GLYPH_COLUMNS + 1;

const ICON_SIZE: u32 = 60;
const ICON_TOP: u32 = 70;
const CAPTION_TOP: u32 = 170;
const BORDER_INSET: u32 = 8;

/// Build the placeholder: neutral background, a crossed-box error glyph
/// and a short caption.
pub fn placeholder_image() -> DynamicImage {
    let background = Rgb(PLACEHOLDER_BACKGROUND);
    let ink = Rgb(PLACEHOLDER_INK);

    let mut canvas = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, background);

    draw_hollow_rect_mut(
        &mut canvas,
        Rect::at(BORDER_INSET as i32, BORDER_INSET as i32).of_size(
            PLACEHOLDER_WIDTH - 2 * BORDER_INSET,
            PLACEHOLDER_HEIGHT - 2 * BORDER_INSET,
        ),
        ink,
    );

    let icon_left = (PLACEHOLDER_WIDTH - ICON_SIZE) / 2;
    draw_hollow_rect_mut(
        &mut canvas,
        Rect::at(icon_left as i32, ICON_TOP as i32).of_size(ICON_SIZE, ICON_SIZE),
        ink,
    );
    let (left, top) = (icon_left as f32, ICON_TOP as f32);
    let (right, bottom) = (left + ICON_SIZE as f32 - 1.0, top + ICON_SIZE as f32 - 1.0);
    draw_line_segment_mut(&mut canvas, (left, top), (right, bottom), ink);
    draw_line_segment_mut(&mut canvas, (left, bottom), (right, top), ink);

    draw_caption(&mut canvas, PLACEHOLDER_CAPTION, CAPTION_TOP, ink);

    DynamicImage::ImageRgb8(canvas)
}

/// Draw `text` horizontally centered with the built-in pixel font
fn draw_caption(canvas: &mut RgbImage, text: &str, top: u32, ink: Rgb<u8>) {
    let chars = text.chars().count() as u32;
    let text_width = (chars * GLYPH_ADVANCE).saturating_sub(1) * FONT_SCALE;
    let left = canvas.width().saturating_sub(text_width) / 2;

    for (index, ch) in text.chars().enumerate() {
        let origin_x = left + index as u32 * GLYPH_ADVANCE * FONT_SCALE;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_COLUMNS {
                if bits & (1 << (GLYPH_COLUMNS - 1 - col)) != 0 {
                    let x = origin_x + col * FONT_SCALE;
                    let y = top + row as u32 * FONT_SCALE;
                    draw_filled_rect_mut(
                        canvas,
                        Rect::at(x as i32, y as i32).of_size(FONT_SCALE, FONT_SCALE),
                        ink,
                    );
                }
            }
        }
    }
}

/// 5x7 bitmaps for the characters the caption uses; anything else is blank
fn glyph(ch: char) -> [u8; GLYPH_ROWS] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        _ => [0; GLYPH_ROWS],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions() {
        let image = placeholder_image();
        assert_eq!(image.width(), PLACEHOLDER_WIDTH);
        assert_eq!(image.height(), PLACEHOLDER_HEIGHT);
    }

    #[test]
    fn test_placeholder_background_and_ink() {
        let image = placeholder_image().to_rgb8();

        assert_eq!(image.get_pixel(0, 0), &Rgb(PLACEHOLDER_BACKGROUND));
        assert_eq!(
            image.get_pixel(BORDER_INSET, BORDER_INSET),
            &Rgb(PLACEHOLDER_INK)
        );

        let ink_pixels = image
            .pixels()
            .filter(|p| **p == Rgb(PLACEHOLDER_INK))
            .count();
        assert!(ink_pixels > 500, "only {} ink pixels", ink_pixels);
    }

    #[test]
    fn test_caption_fits() {
        let chars = PLACEHOLDER_CAPTION.chars().count() as u32;
        let text_width = (chars * GLYPH_ADVANCE - 1) * FONT_SCALE;
        assert!(text_width < PLACEHOLDER_WIDTH - 2 * BORDER_INSET);
    }
}
