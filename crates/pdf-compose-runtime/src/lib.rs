use std::path::PathBuf;

mod worker;

pub use worker::worker_task;

// Re-export types from the library crate
pub use pdf_compose::{
    CapacityMode, GenerateOptions, GeneratedPdf, InputFile, LayoutConfig, PlacementSummary,
    Selection,
};

/// Commands sent from a front end to the session worker
#[derive(Debug)]
pub enum SessionCommand {
    Ingest {
        files: Vec<InputFile>,
    },
    /// Toggle the picker candidate at `index`
    TogglePick {
        index: usize,
    },
    ConfirmPick,
    CancelPick,
    Remove {
        index: usize,
    },
    ClearAll,
    /// Switch layouts; the selection starts over empty
    SetLayout {
        config: LayoutConfig,
    },
    /// Compose the selection, saving into `output_dir` when given
    Generate {
        output_dir: Option<PathBuf>,
    },
    Shutdown,
}

/// Updates sent from the session worker to the front end
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    SelectionChanged {
        snapshot: SelectionSnapshot,
    },
    PickerRequired {
        candidates: Vec<String>,
        capacity: usize,
    },
    Generated {
        pdf: GeneratedPdf,
        path: Option<PathBuf>,
    },
    Error {
        message: String,
    },
}

/// What the front end needs to show the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub layout: String,
    pub pending: Vec<String>,
    pub attachments: Vec<String>,
    pub mode: CapacityMode,
    pub capacity: usize,
}

impl SelectionSnapshot {
    pub fn capture(selection: &Selection, config: &LayoutConfig) -> Self {
        Self {
            layout: config.name.clone(),
            pending: selection.pending().iter().map(|f| f.name.clone()).collect(),
            attachments: selection
                .attachments()
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            mode: selection.mode(),
            capacity: selection.capacity(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() == self.capacity
    }
}
