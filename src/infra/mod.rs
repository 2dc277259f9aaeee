// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns that sit at the end of the pipeline:
//
//   exporter.rs — writes trained weights as flat text matrices
//                 (conv_k*.txt, conv_bias.txt, dense_*.txt)
//
//   metrics.rs  — appends per-epoch loss / accuracy to a CSV

/// Plain-text weight export
pub mod exporter;

/// Training metrics CSV logger
pub mod metrics;
