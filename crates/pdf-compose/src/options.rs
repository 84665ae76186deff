use crate::constants::GEOMETRY_EPSILON;
use crate::layout::{column_width_mm, stacked_fit_count};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How PDF inputs are queued relative to the layout capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PdfQueue {
    /// PDFs and images share the same capacity-limited queue
    #[default]
    Shared,
    /// PDFs go to a separate attachment queue without a capacity limit
    Separate,
}

/// Where strips are anchored on the page
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StripAnchor {
    /// Two strips at the same height, one against each side margin
    Mirrored { top_offset_mm: f32 },
    /// A single centered column of strips, stacked upward from the bottom
    Stacked { bottom_offset_mm: f32, gap_mm: f32 },
}

/// Geometry of the strip strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StripGeometry {
    pub strip_width_mm: f32,
    pub strip_height_mm: f32,
    pub side_margin_mm: f32,
    /// Rotate every strip by 180° (e.g. for a physically rotated output tray)
    pub rotate_180: bool,
    pub anchor: StripAnchor,
}

/// Geometry of the columns strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnGeometry {
    /// Edge length of the square cell each image is drawn into
    pub cell_size_mm: f32,
    pub bottom_offset_mm: f32,
    pub side_margin_mm: f32,
    pub column_gap_mm: f32,
    pub column_count: usize,
}

/// Layout strategy with its strategy-specific geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayoutStrategy {
    Strip(StripGeometry),
    Columns(ColumnGeometry),
}

/// A named, fixed page layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutConfig {
    /// Short identifier used on the command line
    pub name: String,
    pub display_name: String,
    /// Exact number of images the layout accepts
    pub capacity: usize,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub orientation: Orientation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pdf_queue: PdfQueue,
    pub strategy: LayoutStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::strip()
    }
}

impl LayoutConfig {
    /// Two mirrored 73mm x 10mm strips on an A5 landscape page, rotated 180°
    pub fn strip() -> Self {
        Self {
            name: "strip".to_string(),
            display_name: "Strip Layout (73mm x 10mm)".to_string(),
            capacity: 2,
            page_width_mm: 210.0,
            page_height_mm: 148.0,
            orientation: Orientation::Landscape,
            pdf_queue: PdfQueue::Shared,
            strategy: LayoutStrategy::Strip(StripGeometry {
                strip_width_mm: 73.0,
                strip_height_mm: 10.0,
                side_margin_mm: 16.0,
                rotate_180: true,
                anchor: StripAnchor::Mirrored {
                    top_offset_mm: 33.0,
                },
            }),
        }
    }

    /// Four 73mm x 10mm strips stacked up from the bottom of the page
    pub fn stacked() -> Self {
        Self {
            name: "stacked".to_string(),
            display_name: "Stacked Strips (73mm x 10mm)".to_string(),
            capacity: 4,
            page_width_mm: 210.0,
            page_height_mm: 148.0,
            orientation: Orientation::Landscape,
            pdf_queue: PdfQueue::Shared,
            strategy: LayoutStrategy::Strip(StripGeometry {
                strip_width_mm: 73.0,
                strip_height_mm: 10.0,
                side_margin_mm: 16.0,
                rotate_180: false,
                anchor: StripAnchor::Stacked {
                    bottom_offset_mm: 20.0,
                    gap_mm: 5.0,
                },
            }),
        }
    }

    /// Three equal columns with a 50mm square image anchored to the bottom
    pub fn columns() -> Self {
        Self {
            name: "columns".to_string(),
            display_name: "Three Columns (50mm)".to_string(),
            capacity: 3,
            page_width_mm: 210.0,
            page_height_mm: 148.0,
            orientation: Orientation::Landscape,
            pdf_queue: PdfQueue::Shared,
            strategy: LayoutStrategy::Columns(ColumnGeometry {
                cell_size_mm: 50.0,
                bottom_offset_mm: 20.0,
                side_margin_mm: 10.0,
                column_gap_mm: 10.0,
                column_count: 3,
            }),
        }
    }

    /// All built-in layouts
    pub fn presets() -> Vec<Self> {
        vec![Self::strip(), Self::stacked(), Self::columns()]
    }

    /// Look up a built-in layout by name
    pub fn preset(name: &str) -> Option<Self> {
        Self::presets().into_iter().find(|p| p.name == name)
    }

    /// Page dimensions with orientation applied
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        self.orientation
            .apply(self.page_width_mm, self.page_height_mm)
    }

    /// Number of placement slots the strategy can fill
    pub fn slot_count(&self) -> usize {
        match &self.strategy {
            LayoutStrategy::Strip(strip) => match strip.anchor {
                StripAnchor::Mirrored { .. } => 2.min(self.capacity),
                StripAnchor::Stacked { .. } => {
                    let (_, page_height) = self.page_dimensions_mm();
                    stacked_fit_count(strip, page_height).min(self.capacity)
                }
            },
            LayoutStrategy::Columns(columns) => columns.column_count,
        }
    }

    /// Load a layout from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse layout: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the layout to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize layout: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the layout
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ComposeError::Config(
                "Capacity must be at least 1".to_string(),
            ));
        }

        let (page_width, page_height) = self.page_dimensions_mm();
        require_positive("page width", page_width)?;
        require_positive("page height", page_height)?;

        match &self.strategy {
            LayoutStrategy::Strip(strip) => validate_strip(strip, page_width, page_height)?,
            LayoutStrategy::Columns(columns) => {
                validate_columns(columns, page_width, page_height)?
            }
        }

        let slots = self.slot_count();
        if slots != self.capacity {
            return Err(ComposeError::Config(format!(
                "Layout '{}' has capacity {} but {} placement slots",
                self.name, self.capacity, slots
            )));
        }

        Ok(())
    }
}

fn require_positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ComposeError::Config(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

fn require_non_negative(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ComposeError::Config(format!(
            "{} must not be negative, got {}",
            what, value
        )))
    }
}

fn validate_strip(strip: &StripGeometry, page_width: f32, page_height: f32) -> Result<()> {
    require_positive("strip width", strip.strip_width_mm)?;
    require_positive("strip height", strip.strip_height_mm)?;
    require_non_negative("side margin", strip.side_margin_mm)?;

    match strip.anchor {
        StripAnchor::Mirrored { top_offset_mm } => {
            require_non_negative("top offset", top_offset_mm)?;
            // Left and right strips must not overlap
            let used = 2.0 * strip.side_margin_mm + 2.0 * strip.strip_width_mm;
            if used > page_width + GEOMETRY_EPSILON {
                return Err(ComposeError::Config(format!(
                    "Two {}mm strips with {}mm side margins do not fit a {}mm wide page",
                    strip.strip_width_mm, strip.side_margin_mm, page_width
                )));
            }
            if top_offset_mm + strip.strip_height_mm > page_height + GEOMETRY_EPSILON {
                return Err(ComposeError::Config(
                    "Strip extends below the bottom of the page".to_string(),
                ));
            }
        }
        StripAnchor::Stacked {
            bottom_offset_mm,
            gap_mm,
        } => {
            require_non_negative("bottom offset", bottom_offset_mm)?;
            require_non_negative("strip gap", gap_mm)?;
            let used = 2.0 * strip.side_margin_mm + strip.strip_width_mm;
            if used > page_width + GEOMETRY_EPSILON {
                return Err(ComposeError::Config(format!(
                    "A {}mm strip with {}mm side margins does not fit a {}mm wide page",
                    strip.strip_width_mm, strip.side_margin_mm, page_width
                )));
            }
        }
    }

    Ok(())
}

fn validate_columns(columns: &ColumnGeometry, page_width: f32, page_height: f32) -> Result<()> {
    if columns.column_count == 0 {
        return Err(ComposeError::Config(
            "Column count must be at least 1".to_string(),
        ));
    }
    require_positive("cell size", columns.cell_size_mm)?;
    require_non_negative("side margin", columns.side_margin_mm)?;
    require_non_negative("column gap", columns.column_gap_mm)?;
    require_non_negative("bottom offset", columns.bottom_offset_mm)?;

    let column_width = column_width_mm(columns, page_width);
    if column_width <= 0.0 {
        return Err(ComposeError::Config(format!(
            "{} columns do not fit a {}mm wide page",
            columns.column_count, page_width
        )));
    }
    if columns.cell_size_mm > column_width + GEOMETRY_EPSILON {
        return Err(ComposeError::Config(format!(
            "Cell size {}mm is wider than the {:.3}mm column",
            columns.cell_size_mm, column_width
        )));
    }
    if columns.bottom_offset_mm + columns.cell_size_mm > page_height + GEOMETRY_EPSILON {
        return Err(ComposeError::Config(
            "Cells extend above the top of the page".to_string(),
        ));
    }

    Ok(())
}
