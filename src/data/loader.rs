// ============================================================
// Layer 4 — MNIST Loader
// ============================================================
// Loads the MNIST training split from a local directory,
// downloading it first if the files are not there yet.
//
// On-disk layout (uncompressed IDX files):
//   data/
//     train-images-idx3-ubyte   magic 2051, count, rows, cols, pixels
//     train-labels-idx1-ubyte   magic 2049, count, labels
//
// All header integers are big-endian u32.
//
// Missing files are fetched as .gz from the mirror, gunzipped
// and written next to each other. A failed fetch is returned
// as an error and ends the run.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{bail, ensure, Context, Result};
use flate2::read::GzDecoder;

use crate::domain::sample::{DigitSample, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};
use crate::domain::traits::SampleSource;

/// CVDF mirror of the original MNIST distribution
pub const DEFAULT_MIRROR: &str = "https://storage.googleapis.com/cvdf-datasets/mnist/";

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// Loads the MNIST training split from `dir`.
/// Implements the SampleSource trait from Layer 3.
pub struct MnistLoader {
    dir: PathBuf,
    mirror: String,
}

impl MnistLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), mirror: DEFAULT_MIRROR.to_string() }
    }

    /// Use a different download mirror. The URL is joined with
    /// `<file>.gz`, so it should end with a slash.
    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirror = mirror.into();
        self
    }

    /// Make sure both training files exist locally, downloading
    /// whichever is missing.
    fn ensure_files(&self) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create data directory '{}'", self.dir.display()))?;

        let images = self.ensure_file(TRAIN_IMAGES)?;
        let labels = self.ensure_file(TRAIN_LABELS)?;
        Ok((images, labels))
    }

    fn ensure_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        if path.exists() {
            tracing::debug!("Found '{}'", path.display());
            return Ok(path);
        }

        let url = format!("{}{}.gz", self.mirror, name);
        tracing::info!("'{}' not found locally, downloading {}", name, url);
        download_gz(&url, &path)?;
        Ok(path)
    }
}

impl SampleSource for MnistLoader {
    fn load_all(&self) -> Result<Vec<DigitSample>> {
        let (images_path, labels_path) = self.ensure_files()?;

        let image_bytes = fs::read(&images_path)
            .with_context(|| format!("Cannot read '{}'", images_path.display()))?;
        let label_bytes = fs::read(&labels_path)
            .with_context(|| format!("Cannot read '{}'", labels_path.display()))?;

        let images = parse_images(&image_bytes)
            .with_context(|| format!("Malformed image file '{}'", images_path.display()))?;
        let labels = parse_labels(&label_bytes)
            .with_context(|| format!("Malformed label file '{}'", labels_path.display()))?;

        ensure!(
            images.len() == labels.len(),
            "{} images but {} labels in '{}'",
            images.len(),
            labels.len(),
            self.dir.display()
        );

        let samples = images
            .into_iter()
            .zip(labels)
            .map(|(pixels, label)| DigitSample::new(pixels, label))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} training samples from '{}'", samples.len(), self.dir.display());
        Ok(samples)
    }
}

/// Fetch a gzip file and write its decompressed content to `dest`.
/// The data goes to a `.part` file first and is renamed into place,
/// so an interrupted download never looks like a complete file.
fn download_gz(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("Mirror refused {url}"))?;
    let compressed = response
        .bytes()
        .with_context(|| format!("Failed to read body of {url}"))?;

    let mut raw = Vec::new();
    GzDecoder::new(&compressed[..])
        .read_to_end(&mut raw)
        .with_context(|| format!("Cannot decompress {url}"))?;

    let partial = dest.with_extension("part");
    fs::write(&partial, &raw)
        .with_context(|| format!("Cannot write '{}'", partial.display()))?;
    fs::rename(&partial, dest)
        .with_context(|| format!("Cannot move '{}' into place", dest.display()))?;

    tracing::info!("Saved {} ({} bytes)", dest.display(), raw.len());
    Ok(())
}

/// Read a big-endian u32 at `offset`.
fn read_be_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    match bytes.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        None => bail!("header truncated at byte {offset}"),
    }
}

/// Parse an IDX3 image file into one row-major pixel buffer per image.
pub fn parse_images(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let magic = read_be_u32(bytes, 0)?;
    ensure!(magic == IMAGES_MAGIC, "bad image magic {magic}, expected {IMAGES_MAGIC}");

    let count = read_be_u32(bytes, 4)? as usize;
    let rows = read_be_u32(bytes, 8)? as usize;
    let cols = read_be_u32(bytes, 12)? as usize;
    ensure!(
        rows == IMAGE_HEIGHT && cols == IMAGE_WIDTH,
        "unexpected image shape {rows}x{cols}, expected {IMAGE_HEIGHT}x{IMAGE_WIDTH}"
    );

    let body = &bytes[16..];
    ensure!(
        body.len() >= count * IMAGE_PIXELS,
        "image data truncated: {} bytes for {} images",
        body.len(),
        count
    );

    Ok(body[..count * IMAGE_PIXELS]
        .chunks(IMAGE_PIXELS)
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// Parse an IDX1 label file.
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let magic = read_be_u32(bytes, 0)?;
    ensure!(magic == LABELS_MAGIC, "bad label magic {magic}, expected {LABELS_MAGIC}");

    let count = read_be_u32(bytes, 4)? as usize;
    let body = &bytes[8..];
    ensure!(
        body.len() >= count,
        "label data truncated: {} bytes for {} labels",
        body.len(),
        count
    );

    Ok(body[..count].to_vec())
}
