//! Image XObject creation
//!
//! Bitmaps are embedded as raw 8-bit `DeviceRGB` samples. Transparency
//! is carried in a separate `DeviceGray` soft mask. Streams are left
//! uncompressed here and compressed when the document is serialized.

use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Embed a bitmap in the output document and return its object ID
pub fn create_image_xobject(output: &mut Document, image: &DynamicImage) -> ObjectId {
    let width = image.width() as i64;
    let height = image.height() as i64;

    let mut image_dict = image_dictionary(width, height, b"DeviceRGB");

    if let Some(alpha) = alpha_channel(image) {
        let mask_dict = image_dictionary(width, height, b"DeviceGray");
        let mask_id = output.add_object(Stream::new(mask_dict, alpha));
        image_dict.set("SMask", Object::Reference(mask_id));
    }

    let samples = image.to_rgb8().into_raw();
    output.add_object(Stream::new(image_dict, samples))
}

fn image_dictionary(width: i64, height: i64, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width));
    dict.set("Height", Object::Integer(height));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

/// Alpha samples, or `None` when the image is fully opaque
fn alpha_channel(image: &DynamicImage) -> Option<Vec<u8>> {
    if !image.color().has_alpha() {
        return None;
    }

    let alpha: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
    if alpha.iter().all(|&a| a == u8::MAX) {
        None
    } else {
        Some(alpha)
    }
}
