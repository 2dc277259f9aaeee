// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from IDX files on disk to tensor batches:
//
//   IDX files (downloaded on demand)
//       │
//       ▼
//   MnistLoader       → parses images + labels into DigitSamples
//       │
//       ▼
//   DigitDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   RandomAffine      → augments a copy of each sample on access
//       │
//       ▼
//   DigitBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → shuffles each epoch, feeds the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads (and if needed downloads) the MNIST training split
pub mod loader;

/// Random affine augmentation applied per access
pub mod augment;

/// Implements Burn's Dataset trait for digit samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
