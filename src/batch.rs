//! Batch orchestration: uploads in, zip archive out.
//!
//! ## Steps
//!
//! 1. **Index**: each upload gets the number from its filename
//!    ([`naming::extract_index`]). Files without a number are dropped, or,
//!    with fallback numbering, appended after the highest number in upload
//!    order.
//! 2. **Sort**: stable by index, so files sharing a number keep upload order.
//! 3. **Select**: the range expression picks 1-based *positions* in the
//!    sorted list ([`selection::parse_range_expr`]).
//! 4. **Transform**: every selected item runs through
//!    [`imaging::transform_image`] with the batch's shared parameters.
//! 5. **Archive**: outputs are zipped as `{base}_{label}{ext}`.
//!
//! ## Failure Handling
//!
//! Only an empty batch or an empty selection stops a run. A file that fails
//! to decode or encode becomes a [`FailureNote::Errored`] and the rest of the
//! batch continues; an output over the size budget is kept in the archive and
//! noted as [`FailureNote::OverBudget`].
//!
//! ## Parallel Processing
//!
//! Selected items are transformed in parallel using
//! [rayon](https://docs.rs/rayon). The archive is written afterwards by a
//! single writer in selection order, and per-item events are sent as each
//! entry is stored, so they carry the final (deduplicated) entry name.

use crate::archive::{ArchiveBuilder, ArchiveError};
use crate::config::ToolConfig;
use crate::imaging::{
    BackendError, ImageBackend, RustBackend, Shape, SizeSpec, TargetSize, TransformParams,
    transform_image,
};
use crate::naming::{dimension_label, extract_index, output_name};
use crate::selection::parse_range_expr;
use crate::types::{
    BatchReport, FailureNote, IndexedItem, OutputArtifact, SelectedItem, UploadedItem,
};
use rayon::prelude::*;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Largest width or height a batch may resize to (the JPEG frame limit).
pub const MAX_DIMENSION: u32 = 65_535;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No numbered files found (and fallback numbering disabled or nothing uploaded)")]
    EmptyBatch,
    #[error("Range resulted in an empty selection. Nothing to process.")]
    EmptySelection,
    #[error("Invalid batch settings: {0}")]
    InvalidConfig(String),
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Everything a batch run needs besides the files themselves.
///
/// Built once by the host (CLI flags, config file) and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub size: SizeSpec,
    pub shape: Shape,
    /// Per-image size budget in KB.
    pub max_kb: u32,
    /// Range expression over sorted positions; empty selects everything.
    pub range: String,
    /// Number files without digits after the highest numbered file.
    pub fallback_by_order: bool,
}

impl BatchConfig {
    /// Build a BatchConfig from ToolConfig values.
    pub fn from_tool_config(config: &ToolConfig) -> Self {
        let output = &config.output;
        Self {
            size: SizeSpec {
                unit: output.unit,
                width: output.effective_width(),
                height: output.effective_height(),
                dpi: output.dpi,
                square: output.square,
            },
            shape: output.shape,
            max_kb: output.max_kb,
            range: config.selection.range.clone(),
            fallback_by_order: config.selection.fallback_by_order,
        }
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        let SizeSpec { width, height, dpi, .. } = self.size;
        if !(width.is_finite() && width > 0.0) {
            return Err(BatchError::InvalidConfig(format!(
                "width must be a positive number, got {width}"
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(BatchError::InvalidConfig(format!(
                "height must be a positive number, got {height}"
            )));
        }
        if dpi == 0 {
            return Err(BatchError::InvalidConfig("dpi must be at least 1".into()));
        }
        if self.max_kb == 0 {
            return Err(BatchError::InvalidConfig("max_kb must be at least 1".into()));
        }
        let target = self.target();
        if target.width > MAX_DIMENSION || target.height > MAX_DIMENSION {
            return Err(BatchError::InvalidConfig(format!(
                "target size {}x{}px exceeds the {MAX_DIMENSION}px limit",
                target.width, target.height
            )));
        }
        Ok(())
    }

    /// Pixel dimensions every selected image is resized to.
    pub fn target(&self) -> TargetSize {
        self.size.resolve()
    }

    /// Label used in output names, e.g. `512x512px`.
    pub fn label(&self) -> String {
        dimension_label(&self.size)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_tool_config(&ToolConfig::default())
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Selection is known; processing is about to start.
    BatchStarted {
        selected: usize,
        total: usize,
        target: TargetSize,
    },
    ItemEncoded {
        position: usize,
        source: String,
        output_name: String,
        size_kb: u64,
        within_budget: bool,
    },
    ItemFailed {
        position: usize,
        source: String,
        detail: String,
    },
}

/// Result of one item's pipeline run.
#[derive(Debug)]
pub enum ItemOutcome {
    Produced(OutputArtifact),
    Failed { name: String, error: BackendError },
}

/// Finished batch: archive bytes plus what went into it.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub archive: Vec<u8>,
    pub artifacts: Vec<OutputArtifact>,
    pub failures: Vec<FailureNote>,
    /// Number of items the range selected (produced + errored).
    pub selected: usize,
    /// Dimension label shared by every output name.
    pub label: String,
}

impl BatchResult {
    pub fn archive_kb(&self) -> u64 {
        self.archive.len() as u64 / 1024
    }

    pub fn report(&self) -> BatchReport<'_> {
        BatchReport {
            archive_kb: self.archive_kb(),
            selected: self.selected,
            artifacts: &self.artifacts,
            failures: &self.failures,
        }
    }
}

/// Assign indices to uploads and sort them.
///
/// Numbered files keep their extracted number. Without `fallback_by_order`,
/// unnumbered files are dropped; with it, they are numbered consecutively from
/// `max(index) + 1` in upload order. The result is stably sorted by index.
pub fn index_items(uploads: Vec<UploadedItem>, fallback_by_order: bool) -> Vec<IndexedItem> {
    let mut items = Vec::with_capacity(uploads.len());
    let mut unnumbered = Vec::new();

    for upload in uploads {
        match extract_index(&upload.name) {
            Some(index) => items.push(IndexedItem {
                index,
                name: upload.name,
                bytes: upload.bytes,
                fallback: false,
            }),
            None if fallback_by_order => unnumbered.push(upload),
            None => {}
        }
    }

    let base = items
        .iter()
        .map(|i| i.index)
        .max()
        .unwrap_or(0)
        .saturating_add(1);
    for (offset, upload) in (0u64..).zip(unnumbered) {
        items.push(IndexedItem {
            index: base.saturating_add(offset),
            name: upload.name,
            bytes: upload.bytes,
            fallback: true,
        });
    }

    items.sort_by_key(|item| item.index);
    items
}

/// Index, sort, and select: everything up to (not including) encoding.
pub fn plan_batch(
    uploads: Vec<UploadedItem>,
    config: &BatchConfig,
) -> Result<Vec<SelectedItem>, BatchError> {
    let items = index_items(uploads, config.fallback_by_order);
    if items.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    let positions = parse_range_expr(&config.range, items.len());
    if positions.is_empty() {
        return Err(BatchError::EmptySelection);
    }

    let mut slots: Vec<Option<IndexedItem>> = items.into_iter().map(Some).collect();
    Ok(positions
        .into_iter()
        .filter_map(|position| {
            slots[position - 1]
                .take()
                .map(|item| SelectedItem { position, item })
        })
        .collect())
}

/// Run a batch with the default pure-Rust backend.
pub fn run_batch(
    uploads: Vec<UploadedItem>,
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchResult, BatchError> {
    run_batch_with_backend(&RustBackend::new(), uploads, config, events)
}

/// Run a batch using a specific backend (allows testing with mock).
pub fn run_batch_with_backend(
    backend: &impl ImageBackend,
    uploads: Vec<UploadedItem>,
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchResult, BatchError> {
    config.validate()?;

    let total = uploads.len();
    let selected = plan_batch(uploads, config)?;
    let label = config.label();
    let params = TransformParams {
        target: config.target(),
        shape: config.shape,
        max_kb: config.max_kb,
    };

    if let Some(tx) = &events {
        tx.send(BatchEvent::BatchStarted {
            selected: selected.len(),
            total,
            target: params.target,
        })
        .ok();
    }

    let outcomes: Vec<ItemOutcome> = selected
        .par_iter()
        .map(|selected| process_item(backend, &selected.item, &params, &label))
        .collect();

    let mut archive = ArchiveBuilder::new();
    let mut artifacts = Vec::new();
    let mut failures = Vec::new();
    for (slot, mut outcome) in selected.iter().zip(outcomes) {
        if let ItemOutcome::Produced(artifact) = &mut outcome {
            artifact.name = archive.add(&artifact.name, &artifact.bytes)?;
        }
        if let Some(tx) = &events {
            tx.send(outcome_event(slot.position, &outcome)).ok();
        }
        match outcome {
            ItemOutcome::Produced(artifact) => {
                if !artifact.within_budget {
                    failures.push(FailureNote::OverBudget {
                        output_name: artifact.name.clone(),
                    });
                }
                artifacts.push(artifact);
            }
            ItemOutcome::Failed { name, error } => failures.push(FailureNote::Errored {
                name,
                detail: error.to_string(),
            }),
        }
    }

    Ok(BatchResult {
        archive: archive.finish()?,
        artifacts,
        failures,
        selected: selected.len(),
        label,
    })
}

/// Run the image pipeline for one item, capturing failure as a value.
pub fn process_item(
    backend: &impl ImageBackend,
    item: &IndexedItem,
    params: &TransformParams,
    label: &str,
) -> ItemOutcome {
    match transform_image(backend, &item.bytes, params) {
        Ok(encoded) => ItemOutcome::Produced(OutputArtifact {
            name: output_name(&item.name, label, encoded.format),
            source: item.name.clone(),
            bytes: encoded.bytes,
            format: encoded.format,
            size_kb: encoded.size_kb,
            within_budget: encoded.within_budget,
        }),
        Err(error) => ItemOutcome::Failed {
            name: item.name.clone(),
            error,
        },
    }
}

fn outcome_event(position: usize, outcome: &ItemOutcome) -> BatchEvent {
    match outcome {
        ItemOutcome::Produced(artifact) => BatchEvent::ItemEncoded {
            position,
            source: artifact.source.clone(),
            output_name: artifact.name.clone(),
            size_kb: artifact.size_kb,
            within_budget: artifact.within_budget,
        },
        ItemOutcome::Failed { name, error } => BatchEvent::ItemFailed {
            position,
            source: name.clone(),
            detail: error.to_string(),
        },
    }
}
