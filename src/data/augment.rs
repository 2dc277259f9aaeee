// ============================================================
// Layer 4 — Random Affine Augmentation
// ============================================================
// Every time a sample is read, a fresh random affine transform
// is drawn and applied to a copy of its image:
//
//   rotation     uniform in [-15°, +15°]
//   translation  whole pixels, uniform within ±20% of each side
//   scale        uniform in [0.8, 1.2]
//
// The transform is applied about the image centre by inverse
// mapping: for every output pixel we find where it came from
// in the source image and take the nearest pixel there. Pixels
// that map outside the source are background (0).
//
//   src = R(-θ) · (dst - c - t) / s + c
//
// The stored dataset is never touched; the Mapper hands back
// a new DigitSample.
//
// Reference: Burn Book §4 (Dataset transforms / Mapper)
//            rand crate documentation

use std::sync::Mutex;

use burn::data::dataset::transform::Mapper;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::sample::{DigitSample, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};

/// Bounds the random transform is drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineRanges {
    /// Maximum absolute rotation, in degrees
    pub max_degrees: f32,
    /// Maximum shift as a fraction of width / height
    pub max_translate: (f32, f32),
    /// Inclusive scale range
    pub scale: (f32, f32),
}

impl Default for AffineRanges {
    fn default() -> Self {
        Self {
            max_degrees: 15.0,
            max_translate: (0.2, 0.2),
            scale: (0.8, 1.2),
        }
    }
}

/// One concrete transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParams {
    /// Counter-clockwise rotation in degrees
    pub angle_deg: f32,
    /// Shift in whole pixels (dx to the right, dy down)
    pub translate: (i32, i32),
    pub scale: f32,
}

impl AffineParams {
    pub fn identity() -> Self {
        Self { angle_deg: 0.0, translate: (0, 0), scale: 1.0 }
    }

    /// Draw a transform within `ranges`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, ranges: &AffineRanges) -> Self {
        let angle_deg = rng.gen_range(-ranges.max_degrees..=ranges.max_degrees);

        let max_dx = ranges.max_translate.0 * IMAGE_WIDTH as f32;
        let max_dy = ranges.max_translate.1 * IMAGE_HEIGHT as f32;
        let dx = rng.gen_range(-max_dx..=max_dx).round() as i32;
        let dy = rng.gen_range(-max_dy..=max_dy).round() as i32;

        let scale = rng.gen_range(ranges.scale.0..=ranges.scale.1);

        Self { angle_deg, translate: (dx, dy), scale }
    }
}

/// Apply `params` to a copy of `sample`.
pub fn warp(sample: &DigitSample, params: &AffineParams) -> DigitSample {
    let (sin, cos) = params.angle_deg.to_radians().sin_cos();
    let cx = (IMAGE_WIDTH as f32 - 1.0) / 2.0;
    let cy = (IMAGE_HEIGHT as f32 - 1.0) / 2.0;
    let (tx, ty) = (params.translate.0 as f32, params.translate.1 as f32);

    let mut out = vec![0u8; IMAGE_PIXELS];
    for y in 0..IMAGE_HEIGHT {
        for x in 0..IMAGE_WIDTH {
            let u = x as f32 - cx - tx;
            let v = y as f32 - cy - ty;

            let src_x = (cos * u + sin * v) / params.scale + cx;
            let src_y = (-sin * u + cos * v) / params.scale + cy;

            let sx = src_x.round();
            let sy = src_y.round();
            if sx >= 0.0 && sy >= 0.0 && (sx as usize) < IMAGE_WIDTH && (sy as usize) < IMAGE_HEIGHT {
                out[y * IMAGE_WIDTH + x] = sample.pixel(sy as usize, sx as usize);
            }
        }
    }

    sample.with_pixels(out)
}

// ─── RandomAffine ─────────────────────────────────────────────────────────────
/// Burn Mapper that augments each sample as it is read.
///
/// The RNG sits behind a Mutex because `Mapper::map` takes `&self`.
/// With a single-threaded data loader the draws happen in a fixed
/// order, so a seeded RandomAffine is reproducible.
pub struct RandomAffine {
    ranges: AffineRanges,
    rng: Mutex<StdRng>,
}

impl RandomAffine {
    pub fn new(ranges: AffineRanges, seed: u64) -> Self {
        Self { ranges, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    /// Default ranges (±15°, ±20%, 0.8–1.2)
    pub fn with_seed(seed: u64) -> Self {
        Self::new(AffineRanges::default(), seed)
    }

    fn next_params(&self) -> AffineParams {
        // A poisoned lock only means another reader panicked mid-draw;
        // the generator state itself is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        AffineParams::sample(&mut *rng, &self.ranges)
    }
}

impl Mapper<DigitSample, DigitSample> for RandomAffine {
    fn map(&self, item: &DigitSample) -> DigitSample {
        let params = self.next_params();
        warp(item, &params)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A single lit pixel at (row, col)
    fn dot(row: usize, col: usize) -> DigitSample {
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        pixels[row * IMAGE_WIDTH + col] = 255;
        DigitSample::new(pixels, 1).unwrap()
    }

    fn gradient() -> DigitSample {
        let pixels = (0..IMAGE_PIXELS).map(|i| (i % 251) as u8).collect();
        DigitSample::new(pixels, 4).unwrap()
    }

    #[test]
    fn test_identity_leaves_image_unchanged() {
        let s = gradient();
        assert_eq!(warp(&s, &AffineParams::identity()), s);
    }

    #[test]
    fn test_translation_moves_pixels() {
        let s = dot(10, 10);
        let params = AffineParams { translate: (3, -2), ..AffineParams::identity() };
        let out = warp(&s, &params);
        assert_eq!(out.pixel(8, 13), 255);
        assert_eq!(out.pixel(10, 10), 0);
    }

    #[test]
    fn test_half_turn_mirrors_both_axes() {
        let s = gradient();
        let params = AffineParams { angle_deg: 180.0, ..AffineParams::identity() };
        let out = warp(&s, &params);
        for (row, col) in [(0, 0), (3, 17), (27, 5)] {
            assert_eq!(out.pixel(row, col), s.pixel(27 - row, 27 - col));
        }
    }

    #[test]
    fn test_shift_out_of_frame_fills_background() {
        let s = DigitSample::new(vec![200u8; IMAGE_PIXELS], 0).unwrap();
        let params = AffineParams { translate: (5, 0), ..AffineParams::identity() };
        let out = warp(&s, &params);
        assert_eq!(out.pixel(0, 0), 0);
        assert_eq!(out.pixel(0, 4), 0);
        assert_eq!(out.pixel(0, 5), 200);
    }

    #[test]
    fn test_label_survives_augmentation() {
        let aug = RandomAffine::with_seed(1);
        let s = gradient();
        assert_eq!(aug.map(&s).label(), s.label());
    }

    #[test]
    fn test_sampled_params_stay_in_range() {
        let ranges = AffineRanges::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = AffineParams::sample(&mut rng, &ranges);
            assert!(p.angle_deg.abs() <= 15.0);
            assert!(p.translate.0.abs() <= 6 && p.translate.1.abs() <= 6);
            assert!((0.8..=1.2).contains(&p.scale));
        }
    }

    #[test]
    fn test_same_seed_same_augmentations() {
        let a = RandomAffine::with_seed(99);
        let b = RandomAffine::with_seed(99);
        let s = gradient();
        for _ in 0..5 {
            assert_eq!(a.map(&s), b.map(&s));
        }
    }

    #[test]
    fn test_each_access_draws_a_new_transform() {
        let aug = RandomAffine::with_seed(3);
        let s = gradient();
        let first = aug.map(&s);
        let differs = (0..10).any(|_| aug.map(&s) != first);
        assert!(differs);
    }
}
