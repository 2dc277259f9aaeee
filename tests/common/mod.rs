use std::{fs, path::Path};

use mnist_cnn_export::{
    application::train_use_case::TrainConfig,
    data::loader::{TRAIN_IMAGES, TRAIN_LABELS},
    domain::sample::{IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH},
};

/// Write a small IDX training split of `count` digits into `dir`.
/// Each class is a horizontal stripe at a different height.
pub fn write_tiny_mnist(dir: &Path, count: usize) {
    fs::create_dir_all(dir).unwrap();

    let mut images = Vec::new();
    images.extend_from_slice(&2051u32.to_be_bytes());
    images.extend_from_slice(&(count as u32).to_be_bytes());
    images.extend_from_slice(&(IMAGE_HEIGHT as u32).to_be_bytes());
    images.extend_from_slice(&(IMAGE_WIDTH as u32).to_be_bytes());

    let mut labels = Vec::new();
    labels.extend_from_slice(&2049u32.to_be_bytes());
    labels.extend_from_slice(&(count as u32).to_be_bytes());

    for i in 0..count {
        let label = (i % 10) as u8;
        let mut pixels = vec![0u8; IMAGE_PIXELS];
        let row = 4 + label as usize * 2;
        for col in 6..22 {
            pixels[row * IMAGE_WIDTH + col] = 200 + (i % 50) as u8;
        }
        images.extend_from_slice(&pixels);
        labels.push(label);
    }

    fs::write(dir.join(TRAIN_IMAGES), images).unwrap();
    fs::write(dir.join(TRAIN_LABELS), labels).unwrap();
}

/// A short, seeded run over `data_dir` that never touches the network.
pub fn quick_config(data_dir: &Path, output_dir: &Path, seed: u64) -> TrainConfig {
    TrainConfig {
        data_dir:   data_dir.to_string_lossy().into_owned(),
        output_dir: output_dir.to_string_lossy().into_owned(),
        mirror_url: "http://127.0.0.1:9/".to_string(),
        epochs:     2,
        batch_size: 16,
        seed:       Some(seed),
        ..TrainConfig::default()
    }
}

#[allow(dead_code)]
pub fn token_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().split_whitespace().count()
}
