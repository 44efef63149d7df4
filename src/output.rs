//! CLI output formatting for batch runs.
//!
//! Every item is shown by its 1-based position in the sorted batch, then the
//! uploaded filename, so progress lines line up with what `select` printed.
//!
//! # Output Format
//!
//! ## Select
//!
//! ```text
//! Selected 3 of 5 image(s)
//! 001 #2 photo-2.jpg
//! 002 #7 IMG_0007.jpg
//! 004 #8 cover.png (numbered by order)
//! ```
//!
//! ## Process
//!
//! ```text
//! Processing 3 of 5 image(s) at 512x512 px
//! 001 photo-2.jpg → photo-2_512x512px.jpg (84 KB)
//! 002 IMG_0007.jpg
//!     Error: cannot decode image: ...
//! 004 cover.png → cover_512x512px.jpg (1204 KB, over budget)
//!
//! Processed 3 image(s). ZIP size: 1271 KB
//! Some items may exceed size limit or had errors:
//! - IMG_0007.jpg (error: cannot decode image: ...)
//! - cover_512x512px.jpg
//! Wrote imagetool_batch_512x512px.zip
//! ```
//!
//! Item lines arrive in selection order once every item is encoded, and name
//! each output as it is stored in the archive.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchResult};
use crate::types::{FailureNote, SelectedItem};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Selection
// ============================================================================

/// Format a dry-run selection: one line per selected item.
pub fn format_selection(selected: &[SelectedItem], total: usize) -> Vec<String> {
    let mut lines = vec![format!("Selected {} of {} image(s)", selected.len(), total)];
    for s in selected {
        let mut line = format!(
            "{} #{} {}",
            format_index(s.position),
            s.item.index,
            s.item.name
        );
        if s.item.fallback {
            line.push_str(" (numbered by order)");
        }
        lines.push(line);
    }
    lines
}

/// Print dry-run selection to stdout.
pub fn print_selection(selected: &[SelectedItem], total: usize) {
    for line in format_selection(selected, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::BatchStarted {
            selected,
            total,
            target,
        } => vec![format!(
            "Processing {} of {} image(s) at {}x{} px",
            selected, total, target.width, target.height
        )],
        BatchEvent::ItemEncoded {
            position,
            source,
            output_name,
            size_kb,
            within_budget,
        } => {
            let budget = if *within_budget { "" } else { ", over budget" };
            vec![format!(
                "{} {} → {} ({} KB{})",
                format_index(*position),
                source,
                output_name,
                size_kb,
                budget
            )]
        }
        BatchEvent::ItemFailed {
            position,
            source,
            detail,
        } => vec![
            format!("{} {}", format_index(*position), source),
            format!("    Error: {}", detail),
        ],
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the count/size line shown after a batch.
pub fn format_summary(result: &BatchResult) -> Vec<String> {
    vec![format!(
        "Processed {} image(s). ZIP size: {} KB",
        result.selected,
        result.archive_kb()
    )]
}

/// Format the failure block, empty when nothing needs attention.
pub fn format_failures(failures: &[FailureNote]) -> Vec<String> {
    if failures.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Some items may exceed size limit or had errors:".to_string()];
    lines.extend(failures.iter().map(|note| format!("- {}", note)));
    lines
}

/// Print summary, failures, and the archive location to stdout.
pub fn print_batch_result(result: &BatchResult, archive_path: &Path) {
    println!();
    for line in format_summary(result)
        .into_iter()
        .chain(format_failures(&result.failures))
    {
        println!("{}", line);
    }
    println!("Wrote {}", archive_path.display());
}
