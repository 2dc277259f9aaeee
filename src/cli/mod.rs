// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::train_use_case::TrainUseCase;

#[derive(Parser, Debug)]
#[command(
    name = "mnist-cnn-export",
    version,
    about = "Train a small MNIST CNN and export its weights as plain text."
)]
pub struct Cli {
    #[command(flatten)]
    pub train: TrainArgs,
}

impl Cli {
    /// Converts the arguments into a TrainConfig and hands off to Layer 2.
    pub fn run(self) -> Result<()> {
        tracing::info!(
            "Training from '{}', exporting to '{}'",
            self.train.data_dir,
            self.train.output_dir
        );

        let report = TrainUseCase::new(self.train.into()).execute()?;

        tracing::info!(
            "Done: {} files written, final mean loss {:.4}, seed {}",
            report.exported_files.len(),
            report.final_loss,
            report.seed
        );
        Ok(())
    }
}
