use burn::data::dataset::{transform::MapperDataset, Dataset};

use crate::data::augment::RandomAffine;
use crate::domain::sample::DigitSample;

/// Training split held in memory; read-only after construction.
pub struct DigitDataset {
    samples: Vec<DigitSample>,
}

/// The training split as the data loader sees it: every `get`
/// returns a freshly augmented copy.
pub type AugmentedDataset = MapperDataset<DigitDataset, RandomAffine, DigitSample>;

impl DigitDataset {
    pub fn new(samples: Vec<DigitSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Wrap this dataset so each access goes through `augmenter`.
    pub fn augmented(self, augmenter: RandomAffine) -> AugmentedDataset {
        MapperDataset::new(self, augmenter)
    }
}

impl Dataset<DigitSample> for DigitDataset {
    fn get(&self, index: usize) -> Option<DigitSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::IMAGE_PIXELS;

    #[test]
    fn test_plain_access_returns_stored_sample() {
        let s = DigitSample::blank(6);
        let dataset = DigitDataset::new(vec![s.clone()]);
        assert_eq!(dataset.get(0), Some(s));
        assert!(dataset.get(1).is_none());
    }

    #[test]
    fn test_augmented_access_keeps_labels_and_length() {
        let pixels: Vec<u8> = (0..IMAGE_PIXELS).map(|i| (i % 200) as u8).collect();
        let samples = vec![
            DigitSample::new(pixels.clone(), 2).unwrap(),
            DigitSample::new(pixels, 8).unwrap(),
        ];
        let augmented = DigitDataset::new(samples).augmented(RandomAffine::with_seed(5));

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented.get(0).map(|s| s.label()), Some(2));
        assert_eq!(augmented.get(1).map(|s| s.label()), Some(8));
        assert!(augmented.get(2).is_none());
    }
}
