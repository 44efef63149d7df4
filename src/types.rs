//! Shared types passed between the input adapter, the batch, and output.
//!
//! All of them live for exactly one batch run.

use crate::imaging::OutputFormat;
use serde::Serialize;
use std::fmt;

/// A file as handed over by the host: name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedItem {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// An uploaded file with its ordering key.
///
/// The index comes from the filename's last digit run, or from fallback
/// numbering for files without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedItem {
    pub index: u64,
    pub name: String,
    pub bytes: Vec<u8>,
    /// Whether `index` was assigned by fallback numbering.
    pub fallback: bool,
}

/// An indexed item picked by the range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    /// 1-based rank in the sorted batch.
    pub position: usize,
    pub item: IndexedItem,
}

/// One produced image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    /// Archive entry name.
    pub name: String,
    /// Uploaded filename this was produced from.
    pub source: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub size_kb: u64,
    pub within_budget: bool,
}

/// Something the user should hear about after a batch that still produced an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureNote {
    /// The item could not be processed and is missing from the archive.
    Errored { name: String, detail: String },
    /// The item is in the archive but larger than the budget.
    OverBudget { output_name: String },
}

impl fmt::Display for FailureNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureNote::Errored { name, detail } => write!(f, "{name} (error: {detail})"),
            FailureNote::OverBudget { output_name } => f.write_str(output_name),
        }
    }
}

impl Serialize for FailureNote {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Machine-readable summary of a finished batch, written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<'a> {
    pub archive_kb: u64,
    pub selected: usize,
    pub artifacts: &'a [OutputArtifact],
    pub failures: &'a [FailureNote],
}
