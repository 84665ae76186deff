//! Output sequence counter
//!
//! Each generated document takes the next number from a persisted counter
//! and is named `finaloutput.NNN.pdf`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::constants::{DEFAULT_COUNTER, DEFAULT_COUNTER_FILE, OUTPUT_STEM};
use crate::types::Result;

/// Persistent storage for the output counter
pub trait CounterStore: Send + Sync {
    /// Current value; [`DEFAULT_COUNTER`] when nothing valid is stored
    fn read(&self) -> impl Future<Output = u32> + Send;

    fn write(&self, value: u32) -> impl Future<Output = Result<()>> + Send;
}

/// File name for the document numbered `counter`
///
/// Zero-padded to three digits; larger numbers use as many as they need.
pub fn output_file_name(counter: u32) -> String {
    format!("{}.{:03}.pdf", OUTPUT_STEM, counter)
}

/// Counter stored as a decimal number in a text file
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store using the default counter file inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_COUNTER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterStore for FileCounterStore {
    async fn read(&self) -> u32 {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                log::debug!(
                    "No counter at {} ({}); starting at {}",
                    self.path.display(),
                    e,
                    DEFAULT_COUNTER
                );
                return DEFAULT_COUNTER;
            }
        };

        match parse_counter(&contents) {
            Some(value) => value,
            None => {
                log::warn!(
                    "Ignoring invalid counter in {}: {:?}",
                    self.path.display(),
                    contents.trim()
                );
                DEFAULT_COUNTER
            }
        }
    }

    async fn write(&self, value: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, format!("{}\n", value)).await?;
        log::debug!("Counter at {} set to {}", self.path.display(), value);
        Ok(())
    }
}

/// In-process counter
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    value: Mutex<Option<u32>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self {
            value: Mutex::new(Some(value)),
        }
    }

    /// The stored value, without the default applied
    pub fn stored(&self) -> Option<u32> {
        self.value.lock().ok().and_then(|v| *v)
    }
}

impl CounterStore for MemoryCounterStore {
    async fn read(&self) -> u32 {
        self.stored()
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_COUNTER)
    }

    async fn write(&self, value: u32) -> Result<()> {
        match self.value.lock() {
            Ok(mut stored) => *stored = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
        Ok(())
    }
}

/// Parse a stored counter; zero and non-numbers are invalid
fn parse_counter(contents: &str) -> Option<u32> {
    contents.trim().parse::<u32>().ok().filter(|&v| v > 0)
}
