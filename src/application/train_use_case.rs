// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Resolve the run seed
//   Step 2: Load (or download) the training split  (Layer 4 - data)
//   Step 3: Build the dataset                      (Layer 4 - data)
//   Step 4: Open the metrics log, if requested     (Layer 6 - infra)
//   Step 5: Run the training loop                  (Layer 5 - ml)
//   Step 6: Export the weights as text             (Layer 6 - infra)
//   Step 7: Save the effective config              (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::{dataset::DigitDataset, loader::{MnistLoader, DEFAULT_MIRROR}};
use crate::domain::traits::{SampleSource, WeightSink};
use crate::infra::{exporter::TextWeightExporter, metrics::MetricsLogger};
use crate::ml::trainer::{run_training, TrainBackend};

/// Name of the run record written next to the exported weights
pub const CONFIG_FILE: &str = "train_config.json";

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run.
// Serialisable so the run that produced a set of weight files can
// be recorded alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:     String,
    pub output_dir:   String,
    pub mirror_url:   String,
    pub epochs:       usize,
    pub batch_size:   usize,
    pub lr:           f64,
    /// None draws a fresh seed per run
    pub seed:         Option<u64>,
    pub metrics_path: Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:     "data".to_string(),
            output_dir:   ".".to_string(),
            mirror_url:   DEFAULT_MIRROR.to_string(),
            epochs:       10,
            batch_size:   64,
            lr:           0.002,
            seed:         None,
            metrics_path: None,
        }
    }
}

impl TrainConfig {
    /// The configured seed, or a freshly drawn one.
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                tracing::info!("No seed given, drew {}", seed);
                seed
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::info!("Run config saved to '{}'", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }
}

/// What a finished run produced
#[derive(Debug)]
pub struct TrainReport {
    pub seed:            u64,
    pub final_loss:      f64,
    pub exported_files:  Vec<PathBuf>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: One seed for init, augmentation and shuffling ────────────
        let seed = cfg.resolve_seed();

        // ── Step 2: Load the training split ──────────────────────────────────
        tracing::info!("Loading MNIST training split from '{}'", cfg.data_dir);
        let loader  = MnistLoader::new(&cfg.data_dir).with_mirror(cfg.mirror_url.as_str());
        let samples = loader.load_all()?;

        // ── Step 3: Build the Burn dataset ───────────────────────────────────
        let dataset = DigitDataset::new(samples);

        // ── Step 4: Optional metrics CSV ─────────────────────────────────────
        let metrics = cfg.metrics_path.as_deref().map(MetricsLogger::new).transpose()?;

        // ── Step 5: Train (Layer 5) ──────────────────────────────────────────
        let device = Default::default();
        let run = run_training::<TrainBackend>(cfg, seed, dataset, &device, metrics.as_ref())?;

        // ── Step 6: Export ───────────────────────────────────────────────────
        let weights  = run.model.weights()?;
        let exporter = TextWeightExporter::new(&cfg.output_dir);
        let exported_files = exporter.write(&weights)?;

        // ── Step 7: Record the effective config ──────────────────────────────
        let effective = TrainConfig { seed: Some(seed), ..cfg.clone() };
        effective.save(&exporter.dir().join(CONFIG_FILE))?;

        let final_loss = run.history.last().map(|m| m.train_loss).unwrap_or(f64::NAN);
        Ok(TrainReport { seed, final_loss, exported_files })
    }
}
