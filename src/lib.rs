//! # imagetool
//!
//! Batch image resizer for numbered files. Hand it a pile of images, pick
//! which ones by position, and get back one zip of resized, optionally
//! circle- or ellipse-masked images, each squeezed under a size budget.
//!
//! # Pipeline
//!
//! ```text
//! uploads ─► index ─► sort ─► select ─► decode ─► resize ─► mask ─► encode ─► zip
//!            naming          selection  └──────────── imaging ────────────┘   archive
//!            └──────────────────────── batch ───────────────────────────────────┘
//! ```
//!
//! - **Index**: the last run of digits in a filename is its ordering key
//!   (`IMG_0012.jpg` → 12). Files without digits are either dropped or numbered
//!   after the highest index, in upload order.
//! - **Select**: a range expression like `1-3,7,10-` picks 1-based positions in
//!   the sorted list, not raw indices.
//! - **Transform**: every selected image is stretched to the exact target size.
//!   Circle and ellipse shapes make the outside transparent and are saved as
//!   PNG; rectangles are saved as JPEG at the highest quality that fits the
//!   budget.
//! - **Archive**: outputs are named `{base}_{label}{ext}` and deflated into a
//!   single zip held in memory.
//!
//! One broken file never sinks a batch: it is reported and skipped. Outputs
//! that cannot reach the budget even at the lowest quality are kept and
//! reported too.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`batch`] | Orchestration: index, sort, select, transform in parallel, archive |
//! | [`naming`] | Index extraction, dimension labels, output and archive names |
//! | [`selection`] | Range expression parser |
//! | [`imaging`] | Decode, resize, mask, and budgeted encode |
//! | [`archive`] | In-memory zip writer with unique entry names |
//! | [`config`] | `imagetool.toml` loading, validation, and merging |
//! | [`input`] | Reads files and directories from the command line |
//! | [`types`] | Items passed between stages, failure notes, JSON report |
//! | [`output`] | CLI output formatting |
//!
//! # Library Use
//!
//! ```no_run
//! use imagetool::batch::{BatchConfig, run_batch};
//! use imagetool::types::UploadedItem;
//!
//! let uploads = vec![UploadedItem::new("IMG_0001.jpg", std::fs::read("IMG_0001.jpg")?)];
//! let result = run_batch(uploads, &BatchConfig::default(), None)?;
//! std::fs::write("out.zip", &result.archive)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod batch;
pub mod config;
pub mod imaging;
pub mod input;
pub mod naming;
pub mod output;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
