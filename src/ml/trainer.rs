// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fixed-length training with Burn's DataLoader and Adam.
//
// Every epoch walks the whole augmented training split once, in
// a fresh shuffled order. There is no validation split, early
// stopping or learning-rate schedule.
//
// One seed drives the whole run:
//   - backend RNG       → parameter initialisation
//   - RandomAffine      → per-access augmentation
//   - DataLoader        → epoch shuffling
// The loader runs without worker threads so the augmentation RNG
// is consumed in a fixed order.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    augment::RandomAffine,
    batcher::{DigitBatch, DigitBatcher},
    dataset::DigitDataset,
};
use crate::domain::sample::DigitSample;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{DigitCnn, DigitCnnConfig};

#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Result of a finished run: the trained model without autodiff
/// tracking, plus one metrics row per epoch.
pub struct TrainingRun<B: Backend> {
    pub model:   DigitCnn<B>,
    pub history: Vec<EpochMetrics>,
}

/// Single-threaded loader over `dataset`. Each call to `iter()`
/// walks the whole split in a new order drawn from `seed`.
pub fn build_train_loader<B, D>(
    dataset:    D,
    batch_size: usize,
    seed:       u64,
) -> Arc<dyn DataLoader<B, DigitBatch<B>>>
where
    B: Backend,
    D: Dataset<DigitSample> + 'static,
{
    DataLoaderBuilder::new(DigitBatcher::new())
        .batch_size(batch_size)
        .shuffle(seed)
        .build(dataset)
}

pub fn run_training<B: AutodiffBackend>(
    cfg:     &TrainConfig,
    seed:    u64,
    dataset: DigitDataset,
    device:  &B::Device,
    metrics: Option<&MetricsLogger>,
) -> Result<TrainingRun<B::InnerBackend>> {
    ensure!(dataset.sample_count() > 0, "training split is empty");
    ensure!(cfg.batch_size > 0, "batch size must be at least 1");

    B::seed(device, seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = DigitCnnConfig::new();
    let mut model: DigitCnn<B> = model_cfg.init(device);
    tracing::info!(
        "Model ready: {} filters, {} dense inputs, {} classes",
        model_cfg.num_filters,
        model_cfg.dense_inputs(),
        model_cfg.num_classes,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Training data loader ──────────────────────────────────────────────────
    let sample_count = dataset.sample_count();
    let train_loader = build_train_loader::<B, _>(
        dataset.augmented(RandomAffine::with_seed(seed)),
        cfg.batch_size,
        seed,
    );

    tracing::info!(
        "Training on {} samples: {} epochs, batch size {}, lr {}, seed {}",
        sample_count, cfg.epochs, cfg.batch_size, cfg.lr, seed,
    );

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.targets.dims()[0];
            let (loss, output) = model.forward_loss(batch.images, batch.targets.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            // argmax(1) returns [batch, 1], flatten before comparing
            let hits = output
                .argmax(1)
                .flatten::<1>(0, 1)
                .equal(batch.targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            correct += hits as usize;
            seen    += batch_len;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let mean_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let accuracy  = if seen    > 0 { correct as f64 / seen as f64 } else { 0.0 };

        println!("Epoch {}/{} - mean loss: {:.4}", epoch, cfg.epochs, mean_loss);
        tracing::debug!("Epoch {} accuracy {:.2}% over {} batches", epoch, accuracy * 100.0, batches);

        let row = EpochMetrics::new(epoch, mean_loss, accuracy);
        if let Some(logger) = metrics {
            logger.log(&row)?;
        }
        history.push(row);
    }

    tracing::info!("Training complete");
    Ok(TrainingRun { model: model.valid(), history })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::{IMAGE_PIXELS, IMAGE_WIDTH};
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// A vertical bar in column `label * 2 + 4`, so classes differ.
    fn bar(label: u8) -> DigitSample {
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        let col = label as usize * 2 + 4;
        for row in 4..24 {
            pixels[row * IMAGE_WIDTH + col] = 255;
        }
        DigitSample::new(pixels, label).unwrap()
    }

    fn small_dataset() -> DigitDataset {
        DigitDataset::new((0..20).map(|i| bar((i % 10) as u8)).collect())
    }

    fn small_config() -> TrainConfig {
        TrainConfig { epochs: 2, batch_size: 8, ..TrainConfig::default() }
    }

    #[test]
    fn test_losses_are_finite_and_non_negative() {
        let run = run_training::<TestBackend>(
            &small_config(), 3, small_dataset(), &Default::default(), None,
        )
        .unwrap();

        assert_eq!(run.history.len(), 2);
        for m in &run.history {
            assert!(m.train_loss.is_finite() && m.train_loss >= 0.0, "loss {}", m.train_loss);
            assert!((0.0..=1.0).contains(&m.train_acc));
        }
        assert_eq!(run.history[1].epoch, 2);
    }

    #[test]
    fn test_metrics_rows_are_written_per_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().join("m.csv")).unwrap();

        run_training::<TestBackend>(
            &small_config(), 9, small_dataset(), &Default::default(), Some(&logger),
        )
        .unwrap();

        let content = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_order_reshuffled_each_epoch() {
        let samples = (0..10u8).map(DigitSample::blank).collect();
        let loader = build_train_loader::<NdArray, _>(DigitDataset::new(samples), 4, 7);

        let epoch_order = || -> Vec<i64> {
            loader
                .iter()
                .flat_map(|batch| {
                    batch.targets.into_data().convert::<i64>().to_vec::<i64>().unwrap()
                })
                .collect()
        };
        let orders = [epoch_order(), epoch_order(), epoch_order()];

        for order in &orders {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..10).collect::<Vec<i64>>());
        }
        assert_ne!(orders[0], orders[1]);
        assert_ne!(orders[1], orders[2]);
    }

    #[test]
    fn test_empty_split_is_rejected() {
        let result = run_training::<TestBackend>(
            &small_config(), 1, DigitDataset::new(Vec::new()), &Default::default(), None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_trained_model_exports_full_snapshot() {
        let cfg = TrainConfig { epochs: 1, ..small_config() };
        let run = run_training::<TestBackend>(&cfg, 4, small_dataset(), &Default::default(), None)
            .unwrap();
        let w = run.model.weights().unwrap();
        assert_eq!(w.dense_weights().len(), 13520);
        assert!(w.dense_weights().iter().all(|v| v.is_finite()));
    }
}
