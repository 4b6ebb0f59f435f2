//! Configuration for a block-streaming filter session.
//!
//! Defaults describe 1000 samples in blocks of 100 with a 10-sample halo and
//! 10 random taps. A TOML file may override any field:
//!
//! ```toml
//! block_size = 4096
//! halo_size = 64
//! filter_length = 63
//! alignment = "inclusive"
//! tail = "zero-pad"
//! weights = [0.1, 0.2, 0.4, 0.2, 0.1]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_FILTER_LENGTH, DEFAULT_HALO_SIZE, DEFAULT_INPUT_SIZE, DEFAULT_SEED,
};
use crate::error::{FilterError, Result};
use crate::signal_processing::{BlockStreamFilter, WeightVector};

/// Position of the L-sample convolution window relative to the output sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WindowAlignment {
    /// Window covers the L samples strictly before the current one
    /// (a one-sample delay relative to `Inclusive`)
    #[default]
    Preceding,
    /// Window ends at and includes the current sample
    Inclusive,
}

impl WindowAlignment {
    /// Smallest halo that gives every output sample a full window
    pub fn min_halo(&self, taps: usize) -> usize {
        match self {
            WindowAlignment::Preceding => taps,
            WindowAlignment::Inclusive => taps.saturating_sub(1),
        }
    }
}

/// What to do with the `N mod B` samples after the last full block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TailPolicy {
    /// Leave the remainder unread and unwritten
    #[default]
    Truncate,
    /// Zero-pad the remainder to a full block, filter it, and write only
    /// the outputs that correspond to real input
    ZeroPad,
}

/// Session configuration
///
/// # Example
/// ```
/// use halofir::config::StreamConfig;
///
/// let config = StreamConfig::default();
/// assert_eq!(config.n_blocks(1000), 10);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Number of input samples; `None` means "derive from the input file"
    pub input_size: Option<usize>,
    /// Samples per block (B)
    pub block_size: usize,
    /// Samples of history carried between blocks (H)
    pub halo_size: usize,
    /// Number of taps (L) when weights are drawn randomly
    pub filter_length: usize,
    /// Explicit coefficients; overrides `filter_length` and `seed`
    pub weights: Option<Vec<f64>>,
    /// Seed for randomly drawn weights
    pub seed: u64,
    /// Scale weights to unit DC gain
    pub normalize: bool,
    pub alignment: WindowAlignment,
    pub tail: TailPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            input_size: Some(DEFAULT_INPUT_SIZE),
            block_size: DEFAULT_BLOCK_SIZE,
            halo_size: DEFAULT_HALO_SIZE,
            filter_length: DEFAULT_FILTER_LENGTH,
            weights: None,
            seed: DEFAULT_SEED,
            normalize: false,
            alignment: WindowAlignment::default(),
            tail: TailPolicy::default(),
        }
    }
}

/// On-disk form of [`StreamConfig`]; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input_size: Option<usize>,
    block_size: Option<usize>,
    halo_size: Option<usize>,
    filter_length: Option<usize>,
    weights: Option<Vec<f64>>,
    seed: Option<u64>,
    normalize: Option<bool>,
    alignment: Option<WindowAlignment>,
    tail: Option<TailPolicy>,
}

impl StreamConfig {
    /// Load a TOML file on top of the defaults
    ///
    /// Unlike the other fields, `input_size` stays `None` when the file does
    /// not set it.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FilterError::ConfigFile(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| FilterError::ConfigFile(e.to_string()))?;

        // A file that omits input_size processes the whole input
        let mut config = Self {
            input_size: file.input_size,
            ..Self::default()
        };
        if let Some(b) = file.block_size {
            config.block_size = b;
        }
        if let Some(h) = file.halo_size {
            config.halo_size = h;
        }
        if let Some(l) = file.filter_length {
            config.filter_length = l;
        }
        if file.weights.is_some() {
            config.weights = file.weights;
        }
        if let Some(s) = file.seed {
            config.seed = s;
        }
        if let Some(n) = file.normalize {
            config.normalize = n;
        }
        if let Some(a) = file.alignment {
            config.alignment = a;
        }
        if let Some(t) = file.tail {
            config.tail = t;
        }
        Ok(config)
    }

    /// Number of taps the filter will have
    pub fn taps(&self) -> usize {
        self.weights
            .as_ref()
            .map_or(self.filter_length, |w| w.len())
    }

    /// Number of full blocks for an input of `input_size` samples
    pub fn n_blocks(&self, input_size: usize) -> usize {
        input_size / self.block_size
    }

    /// Check sizes before any stream is opened
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FilterError::InvalidConfig(
                "block_size must be at least 1".to_string(),
            ));
        }
        let taps = self.taps();
        if taps == 0 {
            return Err(FilterError::InvalidConfig(
                "filter needs at least one tap".to_string(),
            ));
        }
        let required = self.alignment.min_halo(taps);
        if self.halo_size < required {
            return Err(FilterError::HaloTooSmall {
                halo: self.halo_size,
                taps,
                required,
            });
        }
        Ok(())
    }

    /// Build the weight vector described by this configuration
    pub fn build_weights(&self) -> Result<WeightVector> {
        let weights = match &self.weights {
            Some(taps) => WeightVector::new(taps.clone())?,
            None => WeightVector::random(self.filter_length, self.seed)?,
        };
        if self.normalize {
            weights.normalized()
        } else {
            Ok(weights)
        }
    }

    /// Build a filter with a zeroed halo
    pub fn build_filter(&self) -> Result<BlockStreamFilter> {
        self.validate()?;
        BlockStreamFilter::new(
            self.build_weights()?,
            self.block_size,
            self.halo_size,
            self.alignment,
        )
    }
}
