//! Pure calculation functions for image dimensions, masks, and encoding.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Quality, Shape};

/// Centimeters per inch.
const CM_PER_INCH: f64 = 2.54;

/// First lossy quality tried by the budget loop.
pub const START_QUALITY: u32 = 95;
/// Quality decrement between attempts.
pub const QUALITY_STEP: u32 = 5;
/// Lowest quality the budget loop will try.
pub const MIN_QUALITY: u32 = 10;

/// Round a pixel dimension to the nearest integer, at least 1.
///
/// Halves round to even (`2.5 → 2`, `3.5 → 4`).
pub fn round_px(value: f64) -> u32 {
    (value.round_ties_even() as u32).max(1)
}

/// Convert a physical length to pixels at the given resolution.
///
/// # Examples
/// ```
/// # use imagetool::imaging::cm_to_px;
/// // 5cm at 300dpi = 590.55px
/// assert_eq!(cm_to_px(5.0, 300), 591);
/// ```
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    round_px(cm * dpi as f64 / CM_PER_INCH)
}

/// Qualities tried in order by the lossy budget loop: 95, 90, …, 10.
pub fn quality_schedule() -> impl Iterator<Item = Quality> {
    (MIN_QUALITY..=START_QUALITY)
        .rev()
        .step_by(QUALITY_STEP as usize)
        .map(Quality::new)
}

/// Size of an encoded buffer in whole kilobytes (rounded down).
pub fn size_kb(len: usize) -> u64 {
    len as u64 / 1024
}

/// Axis-aligned bounding box of the visible ellipse on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl EllipseBounds {
    /// Whether the pixel at `(x, y)` is visible.
    ///
    /// A pixel is inside when its center lies on or within the ellipse.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let rx = self.width / 2.0;
        let ry = self.height / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (x as f64 + 0.5 - (self.left + rx)) / rx;
        let dy = (y as f64 + 0.5 - (self.top + ry)) / ry;
        dx * dx + dy * dy <= 1.0
    }
}

/// Bounding box of the mask for `shape` on a `width × height` canvas.
///
/// `None` for [`Shape::Rectangle`], which keeps every pixel.
pub fn mask_bounds(shape: Shape, width: u32, height: u32) -> Option<EllipseBounds> {
    match shape {
        Shape::Rectangle => None,
        Shape::Circle => {
            let side = width.min(height);
            Some(EllipseBounds {
                left: ((width - side) / 2) as f64,
                top: ((height - side) / 2) as f64,
                width: side as f64,
                height: side as f64,
            })
        }
        Shape::Ellipse => Some(EllipseBounds {
            left: 0.0,
            top: 0.0,
            width: width as f64,
            height: height as f64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Dimension conversion
    // =========================================================================

    #[test]
    fn round_px_nearest() {
        assert_eq!(round_px(99.4), 99);
        assert_eq!(round_px(99.6), 100);
    }

    #[test]
    fn round_px_halves_to_even() {
        assert_eq!(round_px(2.5), 2);
        assert_eq!(round_px(3.5), 4);
    }

    #[test]
    fn round_px_never_zero() {
        assert_eq!(round_px(0.0), 1);
        assert_eq!(round_px(-5.0), 1);
        assert_eq!(round_px(f64::NAN), 1);
    }

    #[test]
    fn cm_to_px_at_common_resolutions() {
        assert_eq!(cm_to_px(2.54, 300), 300);
        assert_eq!(cm_to_px(5.0, 300), 591);
        assert_eq!(cm_to_px(10.0, 72), 283);
    }

    #[test]
    fn cm_to_px_tiny_length_is_one_pixel() {
        assert_eq!(cm_to_px(0.001, 1), 1);
    }

    // =========================================================================
    // Quality schedule
    // =========================================================================

    #[test]
    fn schedule_steps_from_95_to_10() {
        let qs: Vec<u32> = quality_schedule().map(Quality::value).collect();
        assert_eq!(qs.first(), Some(&95));
        assert_eq!(qs.last(), Some(&10));
        assert_eq!(qs.len(), 18);
        assert!(qs.windows(2).all(|w| w[0] - w[1] == 5));
    }

    #[test]
    fn size_kb_rounds_down() {
        assert_eq!(size_kb(0), 0);
        assert_eq!(size_kb(1023), 0);
        assert_eq!(size_kb(1024), 1);
        assert_eq!(size_kb(2047), 1);
    }

    // =========================================================================
    // Mask geometry
    // =========================================================================

    #[test]
    fn rectangle_has_no_mask() {
        assert_eq!(mask_bounds(Shape::Rectangle, 100, 50), None);
    }

    #[test]
    fn circle_is_centered_on_short_edge() {
        let b = mask_bounds(Shape::Circle, 200, 100).unwrap();
        assert_eq!(b.left, 50.0);
        assert_eq!(b.top, 0.0);
        assert_eq!(b.width, 100.0);
        assert_eq!(b.height, 100.0);
    }

    #[test]
    fn circle_on_portrait_canvas() {
        let b = mask_bounds(Shape::Circle, 60, 101).unwrap();
        assert_eq!((b.left, b.top), (0.0, 20.0));
        assert_eq!((b.width, b.height), (60.0, 60.0));
    }

    #[test]
    fn ellipse_fills_canvas() {
        let b = mask_bounds(Shape::Ellipse, 200, 100).unwrap();
        assert_eq!((b.left, b.top, b.width, b.height), (0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn circle_contains_center_not_sides() {
        let b = mask_bounds(Shape::Circle, 200, 100).unwrap();
        assert!(b.contains(100, 50));
        assert!(!b.contains(10, 50));
        assert!(!b.contains(190, 50));
        assert!(!b.contains(0, 0));
    }

    #[test]
    fn ellipse_contains_wide_points_not_corners() {
        let b = mask_bounds(Shape::Ellipse, 200, 100).unwrap();
        assert!(b.contains(10, 50));
        assert!(b.contains(100, 2));
        assert!(!b.contains(0, 0));
        assert!(!b.contains(199, 99));
    }

    #[test]
    fn single_pixel_canvas_is_visible() {
        let b = mask_bounds(Shape::Circle, 1, 1).unwrap();
        assert!(b.contains(0, 0));
    }
}
