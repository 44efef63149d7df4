//! High-level image operations.
//!
//! [`transform_image`] is the whole per-image pipeline:
//!
//! 1. decode the uploaded bytes
//! 2. resize to exactly `width × height` (Lanczos3, aspect ratio not kept)
//! 3. for circle/ellipse, mask everything outside the shape to transparent
//! 4. encode:
//!    - masked output → PNG once, budget is only reported
//!    - rectangle output → JPEG from quality 95 down in steps of 5 until the
//!      result fits `max_kb` or quality 10 has been tried
//!
//! Over-budget output is still returned; the caller decides how to report it.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{quality_schedule, size_kb};
use super::mask::{apply_mask, build_mask};
use super::params::{EncodeParams, OutputFormat, Quality, ResizeParams, Shape, TargetSize};
use image::DynamicImage;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// What to produce from one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    pub target: TargetSize,
    pub shape: Shape,
    /// Size budget in KB, at least 1.
    pub max_kb: u32,
}

/// Encoded output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub size_kb: u64,
    pub within_budget: bool,
    /// Quality of the returned attempt; `None` for lossless output.
    pub quality: Option<Quality>,
}

/// Run the full pipeline for one uploaded image.
pub fn transform_image(
    backend: &impl ImageBackend,
    source: &[u8],
    params: &TransformParams,
) -> Result<EncodedImage> {
    let decoded = backend.decode(source)?;
    let resized = backend.resize(
        &decoded,
        &ResizeParams {
            width: params.target.width,
            height: params.target.height,
        },
    )?;

    match build_mask(params.shape, resized.width(), resized.height()) {
        Some(mask) => {
            let masked = DynamicImage::ImageRgba8(apply_mask(&resized, &mask));
            encode_lossless(backend, &masked, params.max_kb)
        }
        None => compress_to_budget(backend, &resized, params.max_kb),
    }
}

/// Encode once as PNG and report whether it fits.
pub fn encode_lossless(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    max_kb: u32,
) -> Result<EncodedImage> {
    let params = EncodeParams::Png;
    let bytes = backend.encode(image, &params)?;
    let kb = size_kb(bytes.len());
    Ok(EncodedImage {
        bytes,
        format: params.format(),
        size_kb: kb,
        within_budget: kb <= max_kb as u64,
        quality: None,
    })
}

/// Encode as JPEG at decreasing quality until the output fits `max_kb`.
///
/// Returns the first attempt that fits, or the lowest-quality attempt when
/// none does.
pub fn compress_to_budget(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    max_kb: u32,
) -> Result<EncodedImage> {
    let mut last = None;
    for quality in quality_schedule() {
        let params = EncodeParams::Jpeg { quality };
        let bytes = backend.encode(image, &params)?;
        let kb = size_kb(bytes.len());
        let within_budget = kb <= max_kb as u64;
        let attempt = EncodedImage {
            bytes,
            format: params.format(),
            size_kb: kb,
            within_budget,
            quality: Some(quality),
        };
        if within_budget {
            return Ok(attempt);
        }
        last = Some(attempt);
    }
    last.ok_or_else(|| BackendError::ProcessingFailed("no quality levels to try".into()))
}
