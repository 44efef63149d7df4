//! Filename conventions: index extraction and output naming.
//!
//! ## Index Extraction
//!
//! An uploaded file's ordering key is the **last** run of decimal digits
//! anywhere in its name. Camera-style names carry the frame number near the
//! end, so the last run wins over any date or prefix earlier in the name:
//!
//! - `IMG_0012.jpg` → `12`
//! - `photo-7.png` → `7`
//! - `2024-05-01_shot3.png` → `3`
//! - `cover.png` → no index
//!
//! ## Output Names
//!
//! Every produced image is named `{base}_{label}{ext}`, where `base` is the
//! original filename without its extension and `label` describes the target
//! dimensions (`100x100px` or `5.0x5.0cm@300dpi`).

use crate::imaging::{OutputFormat, SizeSpec, Unit};
use std::path::Path;

/// Extract the last maximal run of decimal digits in `name` as an integer.
///
/// Any Unicode decimal digit counts, so `صورة_٣.jpg` is `3` and fullwidth
/// `１２` is `12`. Returns `None` when the name has no digits. Runs too long
/// for `u64` saturate at `u64::MAX` rather than being dropped.
pub fn extract_index(name: &str) -> Option<u64> {
    let run: Vec<u64> = name
        .chars()
        .rev()
        .skip_while(|c| decimal_value(*c).is_none())
        .map_while(decimal_value)
        .collect();
    if run.is_empty() {
        return None;
    }

    let value = run
        .iter()
        .rev()
        .try_fold(0u64, |acc, &d| acc.checked_mul(10)?.checked_add(d));
    Some(value.unwrap_or(u64::MAX))
}

/// Code points of the digit zero in every Unicode decimal-digit block.
/// Each block holds the digits 0 through 9 contiguously.
const DECIMAL_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Numeric value of a decimal digit in any script.
fn decimal_value(c: char) -> Option<u64> {
    if c.is_ascii() {
        return c.to_digit(10).map(u64::from);
    }
    let cp = u32::from(c);
    let block = DECIMAL_ZEROS.partition_point(|&zero| zero <= cp);
    let zero = DECIMAL_ZEROS[block.checked_sub(1)?];
    let digit = cp - zero;
    (digit < 10).then_some(u64::from(digit))
}

/// Filename without its final extension.
///
/// Leading dots do not start an extension, so `.hidden` stays `.hidden`.
pub fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Human-readable dimension label used in output and archive names.
///
/// - pixel mode: the rounded integer dimensions, `512x512px`
/// - length mode: the entered lengths and dpi, `5.0x2.5cm@300dpi`
pub fn dimension_label(size: &SizeSpec) -> String {
    match size.unit {
        Unit::Px => {
            let target = size.resolve();
            format!("{}x{}px", target.width, target.height)
        }
        Unit::Cm => format!(
            "{}x{}cm@{}dpi",
            format_length(size.width),
            format_length(size.effective_height()),
            size.dpi
        ),
    }
}

/// Name of the produced image for an uploaded file.
pub fn output_name(original: &str, label: &str, format: OutputFormat) -> String {
    format!("{}_{}{}", base_name(original), label, format.extension())
}

/// Default archive filename for a batch.
pub fn archive_name(label: &str) -> String {
    format!("imagetool_batch_{label}.zip")
}

/// Format a length the way users typed it: whole numbers keep one decimal.
fn format_length(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
