//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from bytes) |
//! | **Resize** | `resize_exact` + Lanczos3 |
//! | **Mask** | binary ellipse/circle alpha mask |
//! | **Encode** | JPEG quality loop, or PNG at best compression |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension, mask, and quality math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Mask**: Building and applying opacity masks
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The per-image pipeline combining all of the above

pub mod backend;
mod calculations;
pub mod mask;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{MIN_QUALITY, QUALITY_STEP, START_QUALITY, cm_to_px, quality_schedule};
pub use operations::{EncodedImage, TransformParams, transform_image};
pub use params::{
    EncodeParams, OutputFormat, Quality, ResizeParams, Shape, SizeSpec, TargetSize, Unit,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
