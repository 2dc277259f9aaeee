// ============================================================
// Layer 6 — Text Weight Exporter
// ============================================================
// Writes a frozen ModelWeights snapshot as flat text files, one
// matrix per file, for a consumer that reads whitespace-separated
// floats:
//
//   conv_k0.txt … conv_k7.txt   9 values each (3x3, row-major)
//   conv_bias.txt               one value per filter
//   dense_weights.txt           [classes, inputs] row-major
//   dense_bias.txt              one value per class
//
// Every value is written in shortest round-trip decimal form and
// followed by a single space. Files are truncated on open.
//
// Failure handling: an unwritable destination is returned as an
// error straight away. Files already written in this run are
// left as they are.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::domain::{traits::WeightSink, weights::ModelWeights};

pub const CONV_BIAS_FILE: &str = "conv_bias.txt";
pub const DENSE_WEIGHTS_FILE: &str = "dense_weights.txt";
pub const DENSE_BIAS_FILE: &str = "dense_bias.txt";

/// File name for convolution filter `index`
pub fn kernel_file_name(index: usize) -> String {
    format!("conv_k{index}.txt")
}

/// Writes weight matrices as plain text into one directory.
/// Implements the WeightSink trait from Layer 3.
pub struct TextWeightExporter {
    dir: PathBuf,
}

impl TextWeightExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save(&self, name: &str, values: &[f32]) -> Result<PathBuf> {
        let path = self.dir.join(name);
        save_matrix(&path, values)?;
        println!("Saved {name}");
        Ok(path)
    }
}

impl WeightSink for TextWeightExporter {
    fn write(&self, weights: &ModelWeights) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create output directory '{}'", self.dir.display()))?;

        let mut written = Vec::with_capacity(weights.num_filters() + 3);

        for index in 0..weights.num_filters() {
            written.push(self.save(&kernel_file_name(index), weights.kernel(index))?);
        }
        written.push(self.save(CONV_BIAS_FILE, weights.conv_bias())?);
        written.push(self.save(DENSE_WEIGHTS_FILE, weights.dense_weights())?);
        written.push(self.save(DENSE_BIAS_FILE, weights.dense_bias())?);

        tracing::info!("Exported {} weight files to '{}'", written.len(), self.dir.display());
        Ok(written)
    }
}

/// Write `values` to `path` as space-terminated decimal text,
/// replacing any existing content.
pub fn save_matrix(path: &Path, values: &[f32]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot open '{}' for writing", path.display()))?;
    let mut out = BufWriter::new(file);

    for value in values {
        write!(out, "{value} ")
            .with_context(|| format!("Cannot write to '{}'", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("Cannot flush '{}'", path.display()))?;

    tracing::debug!("Wrote {} values to '{}'", values.len(), path.display());
    Ok(())
}
