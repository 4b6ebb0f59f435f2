use std::f64::consts::PI;

use num_complex::Complex;
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::constants::MIN_DC_GAIN;
use crate::error::{FilterError, Result};

/// Immutable FIR filter coefficients (the impulse response)
///
/// Holds L >= 1 finite coefficients in the order they are applied to the
/// convolution window: `weights[0]` multiplies the oldest sample in the
/// window and `weights[L - 1]` the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    taps: Vec<f64>,
}

impl WeightVector {
    /// Create a weight vector from externally supplied coefficients
    ///
    /// # Errors
    /// Returns `FilterError::InvalidWeights` if `taps` is empty or holds a
    /// non-finite value
    pub fn new(taps: Vec<f64>) -> Result<Self> {
        if taps.is_empty() {
            return Err(FilterError::InvalidWeights(
                "filter needs at least one weight".to_string(),
            ));
        }
        if let Some((idx, w)) = taps.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(FilterError::InvalidWeights(format!(
                "weight {} is not finite: {}",
                idx, w
            )));
        }
        Ok(Self { taps })
    }

    /// Draw `len` weights uniformly from [0, 1) using a seeded generator
    ///
    /// The same seed always yields the same weights.
    pub fn random(len: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let taps = (0..len).map(|_| rng.random::<f64>()).collect();
        Self::new(taps)
    }

    /// Number of taps (L)
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Always false; a weight vector holds at least one tap
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.taps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.taps.iter()
    }

    /// Gain at 0 Hz (sum of all taps)
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Return a copy scaled to unit DC gain
    ///
    /// # Errors
    /// Returns `FilterError::InvalidWeights` if the DC gain is too close to zero
    pub fn normalized(&self) -> Result<Self> {
        let gain = self.dc_gain();
        if gain.abs() < MIN_DC_GAIN {
            return Err(FilterError::InvalidWeights(format!(
                "cannot normalize weights with DC gain {:e}",
                gain
            )));
        }
        Self::new(self.taps.iter().map(|w| w / gain).collect())
    }

    /// Complex frequency response at a normalized frequency (cycles/sample)
    ///
    /// `0.0` is DC and `0.5` is Nyquist.
    pub fn frequency_response(&self, normalized_freq: f64) -> Complex<f64> {
        let omega = -2.0 * PI * normalized_freq;
        self.taps
            .iter()
            .enumerate()
            .map(|(k, &w)| Complex::from_polar(w, omega * k as f64))
            .sum()
    }
}

impl<'a> IntoIterator for &'a WeightVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.taps.iter()
    }
}
