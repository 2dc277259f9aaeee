// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Model and training code built on Burn's module system.
// Other layers only touch Burn through the Dataset, Mapper and
// Batcher traits in Layer 4.
//
//   model.rs    — the digit CNN
//                 • Conv2d 1→8, 3x3
//                 • ReLU
//                 • MaxPool 2x2
//                 • Linear 1352→10
//                 plus the host-side weight snapshot
//
//   trainer.rs  — the training loop
//                 Handles seeding, forward pass, loss,
//                 backward pass and the Adam step per batch
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            LeCun et al. (1998) Gradient-Based Learning

/// Digit CNN architecture
pub mod model;

/// Fixed-length training loop
pub mod trainer;
