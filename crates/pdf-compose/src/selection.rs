//! Selection management
//!
//! Keeps the ordered list of files that will be composed, enforces the
//! layout's capacity and runs the picker sub-mode that is entered when a
//! batch is larger than the layout can hold.

use thiserror::Error;

use crate::options::{LayoutConfig, PdfQueue};
use crate::types::InputFile;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("A pick is in progress; confirm or cancel it first")]
    PickerActive,
    #[error("No pick is in progress")]
    NotPicking,
    #[error("Select exactly {capacity} file(s) (currently {selected})")]
    IncompletePick { selected: usize, capacity: usize },
    #[error("No candidate at index {0}")]
    NoSuchCandidate(usize),
}

/// Whether new files are queued directly or the user must pick a subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityMode {
    #[default]
    Direct,
    PickerRequired,
}

/// Result of [`Selection::ingest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Files were appended to the pending list
    Queued { accepted: usize, dropped: usize },
    /// The batch exceeded capacity; the picker holds `candidates` files
    PickerRequired { candidates: usize },
}

/// Result of toggling a file in picker mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The file was not selected and the selection is already full
    AtCapacity,
}

/// The files currently selected for composition
#[derive(Debug, Clone)]
pub struct Selection {
    pending: Vec<InputFile>,
    attachments: Vec<InputFile>,
    candidates: Vec<InputFile>,
    mode: CapacityMode,
    capacity: usize,
    pdf_queue: PdfQueue,
}

impl Selection {
    pub fn new(capacity: usize, pdf_queue: PdfQueue) -> Self {
        Self {
            pending: Vec::new(),
            attachments: Vec::new(),
            candidates: Vec::new(),
            mode: CapacityMode::Direct,
            capacity,
            pdf_queue,
        }
    }

    /// An empty selection sized for `config`
    pub fn for_layout(config: &LayoutConfig) -> Self {
        Self::new(config.capacity, config.pdf_queue)
    }

    /// Add a batch of files.
    ///
    /// Images come before PDFs within the batch, each group keeping its own
    /// order. A batch larger than the capacity switches to picker mode and
    /// discards what was pending.
    pub fn ingest(
        &mut self,
        files: impl IntoIterator<Item = InputFile>,
    ) -> Result<IngestOutcome, SelectionError> {
        if self.mode == CapacityMode::PickerRequired {
            return Err(SelectionError::PickerActive);
        }

        let (images, pdfs): (Vec<_>, Vec<_>) = files.into_iter().partition(|f| !f.is_pdf());

        let batch = match self.pdf_queue {
            PdfQueue::Shared => {
                let mut batch = images;
                batch.extend(pdfs);
                batch
            }
            PdfQueue::Separate => {
                if !pdfs.is_empty() {
                    log::debug!("Attached {} PDF(s) outside the capacity", pdfs.len());
                }
                self.attachments.extend(pdfs);
                images
            }
        };

        if batch.len() > self.capacity {
            log::debug!(
                "Batch of {} exceeds capacity {}; entering picker",
                batch.len(),
                self.capacity
            );
            self.pending.clear();
            self.candidates = batch;
            self.mode = CapacityMode::PickerRequired;
            return Ok(IngestOutcome::PickerRequired {
                candidates: self.candidates.len(),
            });
        }

        let room = self.capacity.saturating_sub(self.pending.len());
        let accepted = batch.len().min(room);
        let dropped = batch.len() - accepted;
        self.pending.extend(batch.into_iter().take(accepted));

        if dropped > 0 {
            log::warn!("Selection full; dropped {} file(s)", dropped);
        }

        Ok(IngestOutcome::Queued { accepted, dropped })
    }

    /// Add or remove a file from the picked set, matching by name
    pub fn toggle_pick(&mut self, file: &InputFile) -> Result<ToggleOutcome, SelectionError> {
        if self.mode != CapacityMode::PickerRequired {
            return Err(SelectionError::NotPicking);
        }

        if let Some(index) = self.pending.iter().position(|f| f.name == file.name) {
            self.pending.remove(index);
            Ok(ToggleOutcome::Removed)
        } else if self.pending.len() < self.capacity {
            self.pending.push(file.clone());
            Ok(ToggleOutcome::Added)
        } else {
            Ok(ToggleOutcome::AtCapacity)
        }
    }

    /// Toggle the candidate at `index`
    pub fn toggle_candidate(&mut self, index: usize) -> Result<ToggleOutcome, SelectionError> {
        if self.mode != CapacityMode::PickerRequired {
            return Err(SelectionError::NotPicking);
        }
        let file = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(SelectionError::NoSuchCandidate(index))?;
        self.toggle_pick(&file)
    }

    /// Accept the picked files and leave picker mode
    pub fn confirm_pick(&mut self) -> Result<(), SelectionError> {
        if self.mode != CapacityMode::PickerRequired {
            return Err(SelectionError::NotPicking);
        }
        if self.pending.len() != self.capacity {
            return Err(SelectionError::IncompletePick {
                selected: self.pending.len(),
                capacity: self.capacity,
            });
        }

        self.candidates.clear();
        self.mode = CapacityMode::Direct;
        Ok(())
    }

    /// Leave picker mode without keeping anything that was picked
    pub fn cancel_pick(&mut self) -> Result<(), SelectionError> {
        if self.mode != CapacityMode::PickerRequired {
            return Err(SelectionError::NotPicking);
        }

        self.candidates.clear();
        self.pending.clear();
        self.mode = CapacityMode::Direct;
        Ok(())
    }

    /// Remove the pending file at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<InputFile> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// Drop every pending file and attachment
    pub fn clear_all(&mut self) {
        self.pending.clear();
        self.attachments.clear();
    }

    pub fn pending(&self) -> &[InputFile] {
        &self.pending
    }

    pub fn attachments(&self) -> &[InputFile] {
        &self.attachments
    }

    pub fn candidates(&self) -> &[InputFile] {
        &self.candidates
    }

    pub fn mode(&self) -> CapacityMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pdf_queue(&self) -> PdfQueue {
        self.pdf_queue
    }

    /// Whether a file with the same name is currently selected
    pub fn is_picked(&self, file: &InputFile) -> bool {
        self.pending.iter().any(|f| f.name == file.name)
    }

    /// True when nothing would be composed
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.attachments.is_empty()
    }

    /// Files to compose, in page order: pending files, then attachments
    pub fn layout_inputs(&self) -> Vec<InputFile> {
        self.pending
            .iter()
            .chain(self.attachments.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;

    fn image(name: &str) -> InputFile {
        InputFile::new(name, MediaKind::Image, vec![0u8])
    }

    fn pdf(name: &str) -> InputFile {
        InputFile::new(name, MediaKind::Pdf, vec![0u8])
    }

    fn names(files: &[InputFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_images_before_pdfs() {
        let mut selection = Selection::new(3, PdfQueue::Shared);
        selection
            .ingest(vec![pdf("a.pdf"), image("b.png"), image("c.png")])
            .unwrap();
        assert_eq!(names(selection.pending()), ["b.png", "c.png", "a.pdf"]);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut selection = Selection::new(2, PdfQueue::Shared);
        let outcome = selection.ingest(Vec::new()).unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::Queued {
                accepted: 0,
                dropped: 0
            }
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut selection = Selection::new(2, PdfQueue::Shared);
        selection.ingest(vec![image("a.png")]).unwrap();
        assert!(selection.remove(5).is_none());
        assert_eq!(selection.pending().len(), 1);
        assert_eq!(selection.remove(0).unwrap().name, "a.png");
        assert!(selection.is_empty());
    }
}
