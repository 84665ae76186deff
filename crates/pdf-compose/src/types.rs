use std::sync::Arc;
use thiserror::Error;

use crate::selection::SelectionError;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("No files selected")]
    EmptySelection,
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to decode image '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode PDF: {0}")]
    Encoding(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height >= width
    Portrait,
    /// Landscape: width >= height
    #[default]
    Landscape,
}

impl Orientation {
    /// Orient a (width, height) pair, swapping the sides if needed
    pub fn apply(self, width_mm: f32, height_mm: f32) -> (f32, f32) {
        let (short, long) = if width_mm <= height_mm {
            (width_mm, height_mm)
        } else {
            (height_mm, width_mm)
        };
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

/// What kind of source a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Pdf,
}

impl MediaKind {
    /// Classify a declared media type. Anything that is neither an image
    /// nor a PDF is unsupported.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let media_type = media_type.trim().to_ascii_lowercase();
        if media_type == "application/pdf" {
            Some(MediaKind::Pdf)
        } else if media_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// Guess the media type of a file from its extension
    pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some("application/pdf"),
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "bmp" => Some("image/bmp"),
            "webp" => Some("image/webp"),
            "tif" | "tiff" => Some("image/tiff"),
            _ => None,
        }
    }
}

/// One user-supplied source file
///
/// Immutable once created. Cloning is cheap since the payload is shared.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub kind: MediaKind,
    pub bytes: Arc<[u8]>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, kind: MediaKind, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes: bytes.into(),
        }
    }

    /// Build an input file from a declared media type.
    ///
    /// Returns `None` for unsupported media types; such files are
    /// dropped at acquisition.
    pub fn from_media_type(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        media_type: &str,
    ) -> Option<Self> {
        let kind = MediaKind::from_media_type(media_type)?;
        Some(Self::new(name, kind, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.kind == MediaKind::Pdf
    }
}
