//! Opacity masks for circular and elliptical output.
//!
//! The mask is a single-channel image the size of the canvas: 255 inside the
//! shape, 0 outside. Applying it replaces the image's alpha channel, so
//! everything outside the shape becomes fully transparent.

use super::calculations::mask_bounds;
use super::params::Shape;
use image::{DynamicImage, GrayImage, Luma, RgbaImage};

const OPAQUE: u8 = 255;
const TRANSPARENT: u8 = 0;

/// Build the opacity mask for `shape`, or `None` for a rectangle.
pub fn build_mask(shape: Shape, width: u32, height: u32) -> Option<GrayImage> {
    let bounds = mask_bounds(shape, width, height)?;
    Some(GrayImage::from_fn(width, height, |x, y| {
        if bounds.contains(x, y) {
            Luma([OPAQUE])
        } else {
            Luma([TRANSPARENT])
        }
    }))
}

/// Convert `image` to RGBA and use `mask` as its alpha channel.
///
/// The mask must have the same dimensions as the image.
pub fn apply_mask(image: &DynamicImage, mask: &GrayImage) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    debug_assert_eq!(rgba.dimensions(), mask.dimensions());
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        pixel[3] = mask.get_pixel(x, y)[0];
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 100, 50])))
    }

    #[test]
    fn rectangle_builds_no_mask() {
        assert!(build_mask(Shape::Rectangle, 10, 10).is_none());
    }

    #[test]
    fn mask_matches_canvas_size() {
        let mask = build_mask(Shape::Ellipse, 40, 20).unwrap();
        assert_eq!(mask.dimensions(), (40, 20));
    }

    #[test]
    fn mask_is_binary() {
        let mask = build_mask(Shape::Circle, 33, 21).unwrap();
        assert!(mask.pixels().all(|p| p[0] == OPAQUE || p[0] == TRANSPARENT));
    }

    #[test]
    fn circle_mask_is_symmetric() {
        let mask = build_mask(Shape::Circle, 64, 64).unwrap();
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(mask.get_pixel(x, y), mask.get_pixel(63 - x, y));
                assert_eq!(mask.get_pixel(x, y), mask.get_pixel(x, 63 - y));
            }
        }
    }

    #[test]
    fn applied_mask_sets_alpha_and_keeps_color() {
        let image = solid(100, 50);
        let mask = build_mask(Shape::Circle, 100, 50).unwrap();
        let masked = apply_mask(&image, &mask);

        let center = masked.get_pixel(50, 25);
        assert_eq!(center.0, [200, 100, 50, OPAQUE]);

        let corner = masked.get_pixel(0, 0);
        assert_eq!(corner[3], TRANSPARENT);
        let side = masked.get_pixel(5, 25);
        assert_eq!(side[3], TRANSPARENT);
    }

    #[test]
    fn applied_mask_replaces_existing_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            20,
            20,
            image::Rgba([1, 2, 3, 10]),
        ));
        let mask = build_mask(Shape::Ellipse, 20, 20).unwrap();
        let masked = apply_mask(&image, &mask);
        assert_eq!(masked.get_pixel(10, 10)[3], OPAQUE);
        assert_eq!(masked.get_pixel(0, 0)[3], TRANSPARENT);
    }
}
