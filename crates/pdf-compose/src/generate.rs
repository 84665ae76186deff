//! The generate action
//!
//! Turns the current selection into one composed page:
//! - Numbering from the persisted counter
//! - Decoding every input (barrier before layout)
//! - Planning and composing the page off the async executor
//! - Clearing the selection once the document exists

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::counter::{CounterStore, output_file_name};
use crate::decode::{Rasterizer, decode_batch};
use crate::layout::{SlotPlacement, compute_slots, plan_page};
use crate::options::LayoutConfig;
use crate::render::compose_page;
use crate::selection::{CapacityMode, Selection, SelectionError};
use crate::types::*;

/// When the counter increment is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterCommit {
    /// Before decoding; a failed generate still consumes its number
    #[default]
    Reserve,
    /// Only after the document has been encoded
    AfterSuccess,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub counter_commit: CounterCommit,
}

/// Where one input ended up on the page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSummary {
    pub source_name: String,
    pub slot: SlotPlacement,
    /// True when a placeholder was drawn instead of the input
    pub placeholder: bool,
}

/// A composed document held in memory
#[derive(Debug, Clone)]
pub struct GeneratedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Counter value the document was numbered with
    pub sequence: u32,
    pub placements: Vec<PlacementSummary>,
}

impl GeneratedPdf {
    pub fn placeholder_count(&self) -> usize {
        self.placements.iter().filter(|p| p.placeholder).count()
    }
}

/// Compose the selection into a single page and number it.
///
/// On success the selection is cleared. On failure it is left as it was,
/// except that with [`CounterCommit::Reserve`] the number is already spent.
pub async fn generate<C: CounterStore>(
    selection: &mut Selection,
    config: &LayoutConfig,
    counter: &C,
    rasterizer: Arc<dyn Rasterizer>,
    options: GenerateOptions,
) -> Result<GeneratedPdf> {
    if selection.mode() == CapacityMode::PickerRequired {
        return Err(SelectionError::PickerActive.into());
    }
    if selection.is_empty() {
        return Err(ComposeError::EmptySelection);
    }
    config.validate()?;

    let sequence = counter.read().await;
    let file_name = output_file_name(sequence);
    if options.counter_commit == CounterCommit::Reserve {
        counter.write(next_sequence(sequence)).await?;
    }

    let inputs = selection.layout_inputs();
    log::debug!(
        "Generating {} from {} file(s) with layout '{}'",
        file_name,
        inputs.len(),
        config.name
    );

    let images = decode_batch(&inputs, rasterizer).await?;

    let layout = config.clone();
    let (bytes, placements) = tokio::task::spawn_blocking(move || {
        let commands = plan_page(images, &layout);
        let placements: Vec<PlacementSummary> = commands
            .iter()
            .map(|c| PlacementSummary {
                source_name: c.image.source_name.clone(),
                slot: c.slot,
                placeholder: c.image.placeholder,
            })
            .collect();
        let (width_mm, height_mm) = layout.page_dimensions_mm();
        compose_page(width_mm, height_mm, layout.orientation, &commands)
            .map(|bytes| (bytes, placements))
    })
    .await?
    .map_err(|e| match e {
        ComposeError::Encoding(_) => e,
        other => ComposeError::Encoding(other.to_string()),
    })?;

    if options.counter_commit == CounterCommit::AfterSuccess {
        counter.write(next_sequence(sequence)).await?;
    }

    selection.clear_all();

    log::info!(
        "Generated {} ({} bytes, {} image(s))",
        file_name,
        bytes.len(),
        placements.len()
    );

    Ok(GeneratedPdf {
        file_name,
        bytes,
        sequence,
        placements,
    })
}

/// Where the selection would be placed, without decoding or writing anything
pub fn preview_placements(selection: &Selection, config: &LayoutConfig) -> Vec<PlacementSummary> {
    let inputs = selection.layout_inputs();
    compute_slots(config, inputs.len())
        .into_iter()
        .zip(inputs)
        .map(|(slot, file)| PlacementSummary {
            source_name: file.name,
            slot,
            placeholder: false,
        })
        .collect()
}

/// Write a generated document into `dir` under its own file name
pub async fn save_pdf(pdf: &GeneratedPdf, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(&pdf.file_name);
    tokio::fs::write(&path, &pdf.bytes).await?;
    log::info!("Saved {}", path.display());
    Ok(path)
}

fn next_sequence(sequence: u32) -> u32 {
    sequence.saturating_add(1)
}
