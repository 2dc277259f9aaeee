// ============================================================
// Layer 3 — DigitSample Domain Type
// ============================================================
// One labelled handwritten digit: a 28x28 single-channel image
// stored row-major as raw u8 intensities (0 = background,
// 255 = ink), plus its class label 0-9.
//
// Samples are immutable once loaded. Augmentation always
// produces a new DigitSample rather than editing the stored one.

use anyhow::{ensure, Result};

/// Image height in pixels
pub const IMAGE_HEIGHT: usize = 28;

/// Image width in pixels
pub const IMAGE_WIDTH: usize = 28;

/// Number of pixels per image
pub const IMAGE_PIXELS: usize = IMAGE_HEIGHT * IMAGE_WIDTH;

/// Number of digit classes (0-9)
pub const NUM_CLASSES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitSample {
    /// Row-major pixel intensities, always IMAGE_PIXELS long
    pixels: Vec<u8>,
    label: u8,
}

impl DigitSample {
    /// Build a sample, checking the image size and label range.
    pub fn new(pixels: Vec<u8>, label: u8) -> Result<Self> {
        ensure!(
            pixels.len() == IMAGE_PIXELS,
            "expected {} pixels, got {}",
            IMAGE_PIXELS,
            pixels.len()
        );
        ensure!(
            (label as usize) < NUM_CLASSES,
            "label {} out of range 0..{}",
            label,
            NUM_CLASSES
        );
        Ok(Self { pixels, label })
    }

    /// An all-background image with the given label
    pub fn blank(label: u8) -> Self {
        Self {
            pixels: vec![0; IMAGE_PIXELS],
            label: label % NUM_CLASSES as u8,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    /// Intensity at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * IMAGE_WIDTH + col]
    }

    /// Same label, new pixels. Used by augmentation to emit a
    /// transformed copy; callers always pass a full-size image.
    pub(crate) fn with_pixels(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), IMAGE_PIXELS);
        Self { pixels, label: self.label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_size() {
        assert!(DigitSample::new(vec![0; 10], 3).is_err());
    }

    #[test]
    fn test_rejects_label_out_of_range() {
        assert!(DigitSample::new(vec![0; IMAGE_PIXELS], 10).is_err());
    }

    #[test]
    fn test_pixel_indexing_is_row_major() {
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        pixels[2 * IMAGE_WIDTH + 5] = 200;
        let s = DigitSample::new(pixels, 7).unwrap();
        assert_eq!(s.pixel(2, 5), 200);
        assert_eq!(s.pixel(5, 2), 0);
        assert_eq!(s.label(), 7);
    }
}
