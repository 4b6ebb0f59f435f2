//! Seeded synthetic input for exercising the filter

use std::f64::consts::PI;
use std::path::Path;

use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::stream::write_samples_file;

/// `len` independent uniform draws on [0, 1)
pub fn generate_uniform(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<f64>()).collect()
}

/// Unit sine at `freq` (cycles/sample) plus uniform noise in
/// [-noise_amplitude, noise_amplitude)
pub fn generate_noisy_tone(len: usize, freq: f64, noise_amplitude: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|n| {
            let noise = (rng.random::<f64>() * 2.0 - 1.0) * noise_amplitude;
            (2.0 * PI * freq * n as f64).sin() + noise
        })
        .collect()
}

/// Write `len` uniform samples to a raw sample file
pub fn write_test_file<P: AsRef<Path>>(path: P, len: usize, seed: u64) -> Result<()> {
    write_samples_file(path, &generate_uniform(len, seed))
}
