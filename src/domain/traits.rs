// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams of the pipeline: where samples come from and
// where trained weights go. The application layer only talks
// to these traits.
//
// Implementations:
//   - MnistLoader        → SampleSource (IDX files, downloaded on demand)
//   - TextWeightExporter → WeightSink   (one flat text file per matrix)

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{sample::DigitSample, weights::ModelWeights};

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can provide the labelled training split.
pub trait SampleSource {
    /// Load every training sample. Failing to obtain the data is fatal
    /// for the run, so implementations return the error rather than
    /// an empty set.
    fn load_all(&self) -> Result<Vec<DigitSample>>;
}

// ─── WeightSink ───────────────────────────────────────────────────────────────
/// Any component that can persist a frozen weight snapshot.
pub trait WeightSink {
    /// Write the weights and return the paths written, in write order.
    fn write(&self, weights: &ModelWeights) -> Result<Vec<PathBuf>>;
}
