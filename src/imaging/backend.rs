//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three codec-level operations every
//! backend must support: decode, resize, and encode. Mask construction and the
//! compression loop are backend-independent and live in
//! [`mask`](super::mask) and [`operations`](super::operations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on the
//! `image` crate.

use super::params::{EncodeParams, ResizeParams};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync`: the batch runs items on a rayon pool and
/// shares one backend across workers.
pub trait ImageBackend: Sync {
    /// Decode raw file bytes into an image. Format is sniffed from content.
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Resize to exactly the requested dimensions (stretch, no crop).
    fn resize(
        &self,
        image: &DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode to an in-memory buffer.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
