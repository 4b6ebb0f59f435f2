//! Fixed sizes and numeric thresholds
//!
//! The defaults reproduce the classic demonstration run: 1000 samples
//! filtered in blocks of 100 with a 10-sample halo and 10 taps.

/// Default number of input samples when no size is given
pub const DEFAULT_INPUT_SIZE: usize = 1_000;

/// Default number of samples read and filtered per block
pub const DEFAULT_BLOCK_SIZE: usize = 100;

/// Default number of trailing samples carried into the next block
pub const DEFAULT_HALO_SIZE: usize = 10;

/// Default filter length (number of taps)
pub const DEFAULT_FILTER_LENGTH: usize = 10;

/// Default seed for randomly drawn weights and synthetic input
pub const DEFAULT_SEED: u64 = 0;

/// Size in bytes of one stored sample (IEEE-754 binary64)
pub const SAMPLE_BYTES: usize = std::mem::size_of::<f64>();

/// Weights whose DC gain is smaller than this cannot be normalized.
pub const MIN_DC_GAIN: f64 = 1e-12;
