// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// All configurable flags for a training run. Every flag has a
// default, so running the binary with no arguments trains the
// standard model and writes the weight files into the current
// directory.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for malformed values
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Args;

use crate::application::train_use_case::TrainConfig;
use crate::data::loader::DEFAULT_MIRROR;

/// All arguments for a training run.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding (or receiving) the MNIST IDX files
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory the weight text files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Base URL the gzipped IDX files are fetched from when missing
    #[arg(long, default_value = DEFAULT_MIRROR)]
    pub mirror_url: String,

    /// Number of full passes over the training split
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Samples per optimiser step
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.002)]
    pub lr: f64,

    /// Seed for initialisation, augmentation and shuffling.
    /// A fresh one is drawn when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append per-epoch loss and accuracy to this CSV file
    #[arg(long = "metrics")]
    pub metrics_path: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:     a.data_dir,
            output_dir:   a.output_dir,
            mirror_url:   a.mirror_url,
            epochs:       a.epochs,
            batch_size:   a.batch_size,
            lr:           a.lr,
            seed:         a.seed,
            metrics_path: a.metrics_path,
        }
    }
}
