//! Output page rendering
//!
//! [`PageCanvas`] is the page-composition primitive: create a page of a
//! fixed physical size, place bitmaps on it in order, then serialize the
//! one-page document.

use crate::constants::mm_to_pt;
use crate::layout::{PlacementCommand, Rect, SlotPlacement};
use crate::types::{ComposeError, Orientation, Result};
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, Stream};

use super::xobject::create_image_xobject;

// =============================================================================
// Public API
// =============================================================================

/// A single PDF page under construction
pub struct PageCanvas {
    output: Document,
    width_pt: f32,
    height_pt: f32,
    content_ops: Vec<String>,
    xobjects: Dictionary,
    placed: usize,
}

impl PageCanvas {
    /// Create an empty page. The orientation decides which side is longer.
    pub fn new(width_mm: f32, height_mm: f32, orientation: Orientation) -> Self {
        let (width_mm, height_mm) = orientation.apply(width_mm, height_mm);
        Self {
            output: Document::with_version("1.7"),
            width_pt: mm_to_pt(width_mm),
            height_pt: mm_to_pt(height_mm),
            content_ops: Vec::new(),
            xobjects: Dictionary::new(),
            placed: 0,
        }
    }

    /// Page size in points
    pub fn size_pt(&self) -> (f32, f32) {
        (self.width_pt, self.height_pt)
    }

    /// Number of images placed so far
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    /// Draw `image` into the slot's rectangle (millimeters, top-left origin)
    pub fn place(&mut self, image: &DynamicImage, slot: &SlotPlacement) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ComposeError::Encoding(format!(
                "Slot {} has an empty bitmap",
                slot.slot_index
            )));
        }
        let rect = self.to_user_space(&slot.rect)?;

        let xobject_name = format!("Im{}", self.placed);
        let xobject_id = create_image_xobject(&mut self.output, image);
        self.xobjects
            .set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        self.content_ops.push(generate_placement_command(
            &xobject_name,
            &rect,
            slot.rotation_degrees,
        ));
        self.placed += 1;
        Ok(())
    }

    /// Finish the document and return the PDF bytes
    pub fn serialize(self) -> Result<Vec<u8>> {
        let PageCanvas {
            mut output,
            width_pt,
            height_pt,
            content_ops,
            xobjects,
            ..
        } = self;

        let pages_id = output.new_object_id();

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let content = content_ops.join("");
        let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));
        let page_id = output.add_object(page_dict);

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages_dict.set("Count", Object::Integer(1));
        output.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = output.add_object(catalog);
        output.trailer.set("Root", Object::Reference(catalog_id));

        output.compress();

        let mut writer = Vec::new();
        output.save_to(&mut writer)?;
        Ok(writer)
    }

    /// Convert a top-left millimeter rect into a bottom-left point rect
    fn to_user_space(&self, rect: &Rect) -> Result<Rect> {
        let values = [rect.x, rect.y, rect.width, rect.height];
        if values.iter().any(|v| !v.is_finite()) || rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(ComposeError::Encoding(format!(
                "Invalid placement rectangle {:?}",
                rect
            )));
        }

        Ok(Rect::new(
            mm_to_pt(rect.x),
            self.height_pt - mm_to_pt(rect.bottom()),
            mm_to_pt(rect.width),
            mm_to_pt(rect.height),
        ))
    }
}

/// Create a page and apply `commands` to it in order
pub fn compose_page(
    width_mm: f32,
    height_mm: f32,
    orientation: Orientation,
    commands: &[PlacementCommand],
) -> Result<Vec<u8>> {
    let mut canvas = PageCanvas::new(width_mm, height_mm, orientation);
    for command in commands {
        canvas.place(&command.image.image, &command.slot)?;
    }
    log::debug!("Composed page with {} image(s)", canvas.placed_count());
    canvas.serialize()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Generate the content stream command that draws an image XObject.
///
/// Images occupy the unit square, so the matrix scales it to the target
/// size. A 180° rotation flips both axes around the far corner.
fn generate_placement_command(xobject_name: &str, rect: &Rect, rotation_degrees: f32) -> String {
    if rotation_degrees.abs() > 0.1 {
        format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            -rect.width,
            -rect.height,
            rect.x + rect.width,
            rect.y + rect.height,
            xobject_name
        )
    } else {
        format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, xobject_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn slot(x: f32, y: f32, width: f32, height: f32, rotation_degrees: f32) -> SlotPlacement {
        SlotPlacement {
            slot_index: 0,
            rect: Rect::new(x, y, width, height),
            rotation_degrees,
        }
    }

    #[test]
    fn test_placement_command_upright() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            generate_placement_command("Im0", &rect, 0.0),
            "q 30 0 0 40 10 20 cm /Im0 Do Q\n"
        );
    }

    #[test]
    fn test_placement_command_rotated() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            generate_placement_command("Im1", &rect, 180.0),
            "q -30 0 0 -40 40 60 cm /Im1 Do Q\n"
        );
    }

    #[test]
    fn test_user_space_flips_y() {
        let canvas = PageCanvas::new(100.0, 50.0, Orientation::Landscape);
        let rect = canvas
            .to_user_space(&Rect::new(0.0, 10.0, 20.0, 15.0))
            .unwrap();

        // Bottom edge at 25mm from the top is 25mm from the bottom
        assert!((rect.y - mm_to_pt(25.0)).abs() < 1e-3);
        assert!((rect.height - mm_to_pt(15.0)).abs() < 1e-3);
    }

    #[test]
    fn test_orientation_swaps_page() {
        let canvas = PageCanvas::new(148.0, 210.0, Orientation::Landscape);
        let (width, height) = canvas.size_pt();
        assert!(width > height);
    }

    #[test]
    fn test_rejects_degenerate_rect() {
        let mut canvas = PageCanvas::new(210.0, 148.0, Orientation::Landscape);
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])));

        let result = canvas.place(&image, &slot(0.0, 0.0, 0.0, 10.0, 0.0));
        assert!(matches!(result, Err(ComposeError::Encoding(_))));

        let result = canvas.place(&image, &slot(f32::NAN, 0.0, 10.0, 10.0, 0.0));
        assert!(matches!(result, Err(ComposeError::Encoding(_))));
        assert_eq!(canvas.placed_count(), 0);
    }

    #[test]
    fn test_serialize_single_page() {
        let mut canvas = PageCanvas::new(210.0, 148.0, Orientation::Landscape);
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([200, 0, 0])));
        canvas
            .place(&image, &slot(16.0, 33.0, 73.0, 10.0, 180.0))
            .unwrap();
        canvas
            .place(&image, &slot(121.0, 33.0, 73.0, 10.0, 180.0))
            .unwrap();

        let bytes = canvas.serialize().unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
