//! Shared test utilities for the imagetool test suite.
//!
//! Provides in-memory fixture images (so no binary fixtures live in the repo)
//! and readers for produced zip archives.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let uploads = vec![UploadedItem::new("img1.jpg", jpeg_bytes(64, 48))];
//! let result = run_batch(uploads, &config, None).unwrap();
//! assert_eq!(zip_entry_names(&result.archive), vec!["img1_100x100px.jpg"]);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::{Cursor, Read};

// =========================================================================
// Fixture images
// =========================================================================

/// Smooth RGB gradient; compresses well.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// Deterministic pseudo-random RGB noise; compresses badly.
fn noise(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9E37_79B9;
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        image::Rgb([next(), next(), next()])
    })
}

fn encode_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 95)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// JPEG bytes of a `width × height` gradient.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_jpeg(&gradient(width, height))
}

/// PNG bytes of a `width × height` gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// JPEG bytes of high-entropy noise, too large for tiny budgets at any quality.
pub fn noisy_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_jpeg(&noise(width, height))
}

// =========================================================================
// Archive readers
// =========================================================================

/// All `(name, contents)` pairs of a zip archive, in archive order.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            (entry.name().to_string(), contents)
        })
        .collect()
}

/// Entry names of a zip archive, in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    zip_entries(bytes).into_iter().map(|(name, _)| name).collect()
}
