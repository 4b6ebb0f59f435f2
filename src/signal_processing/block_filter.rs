use crate::config::WindowAlignment;
use crate::error::{FilterError, Result};
use crate::signal_processing::WeightVector;

/// Where a [`BlockStreamFilter`] is in its read/process cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// The block region may be (re)filled by the caller
    AwaitingBlock,
    /// Outputs for the current block are available and the halo has rotated
    Processed,
}

/// Block-wise FIR filter carrying a halo of history between blocks
///
/// Owns a working buffer laid out as `[halo | block]` with `halo_size +
/// block_size` samples, allocated once. The caller fills the block region,
/// then [`process_block`](Self::process_block) computes one output per block
/// sample and copies the buffer tail to the front so the next block sees the
/// history it needs. Filtering a stream block by block this way gives the same
/// result as filtering it in one pass.
///
/// # Example
/// ```
/// use halofir::config::WindowAlignment;
/// use halofir::signal_processing::{BlockStreamFilter, WeightVector};
///
/// let weights = WeightVector::new(vec![0.5, 0.5]).unwrap();
/// let mut filter = BlockStreamFilter::new(weights, 4, 2, WindowAlignment::Inclusive).unwrap();
///
/// filter.block_mut().copy_from_slice(&[2.0, 4.0, 6.0, 8.0]);
/// assert_eq!(filter.process_block(), &[1.0, 3.0, 5.0, 7.0]);
/// assert_eq!(filter.halo(), &[6.0, 8.0]);
/// ```
#[derive(Debug, Clone)]
pub struct BlockStreamFilter {
    weights: WeightVector,
    halo_and_block: Vec<f64>,
    output: Vec<f64>,
    halo_size: usize,
    alignment: WindowAlignment,
    state: FilterState,
    blocks_processed: usize,
}

impl BlockStreamFilter {
    /// Create a filter with a zeroed halo
    ///
    /// # Arguments
    /// * `weights` - Filter coefficients (L taps)
    /// * `block_size` - Samples per block (B), at least 1
    /// * `halo_size` - Samples of history carried between blocks (H)
    /// * `alignment` - Position of the convolution window relative to each sample
    ///
    /// # Errors
    /// Returns `FilterError::InvalidConfig` for a zero block size and
    /// `FilterError::HaloTooSmall` if the halo cannot hold a full window of history
    pub fn new(
        weights: WeightVector,
        block_size: usize,
        halo_size: usize,
        alignment: WindowAlignment,
    ) -> Result<Self> {
        if block_size == 0 {
            return Err(FilterError::InvalidConfig(
                "block size must be at least 1".to_string(),
            ));
        }

        let required = alignment.min_halo(weights.len());
        if halo_size < required {
            return Err(FilterError::HaloTooSmall {
                halo: halo_size,
                taps: weights.len(),
                required,
            });
        }

        Ok(Self {
            weights,
            halo_and_block: vec![0.0; halo_size + block_size],
            output: vec![0.0; block_size],
            halo_size,
            alignment,
            state: FilterState::AwaitingBlock,
            blocks_processed: 0,
        })
    }

    /// Filter the current block and rotate the halo
    ///
    /// The block region must already hold the next `block_size` input
    /// samples. Returns one filtered sample per block sample; the slice stays
    /// valid until the filter is next borrowed mutably.
    pub fn process_block(&mut self) -> &[f64] {
        let taps = self.weights.as_slice();
        let n_taps = taps.len();

        // First buffer index of the window for block sample 0
        let first = match self.alignment {
            WindowAlignment::Preceding => self.halo_size - n_taps,
            WindowAlignment::Inclusive => self.halo_size + 1 - n_taps,
        };

        for (i, out) in self.output.iter_mut().enumerate() {
            let window = &self.halo_and_block[first + i..first + i + n_taps];
            *out = taps.iter().zip(window).map(|(w, x)| w * x).sum();
        }

        self.rotate_halo();
        self.state = FilterState::Processed;
        self.blocks_processed += 1;
        log::trace!(
            "Block {} filtered, halo rotated",
            self.blocks_processed - 1
        );

        &self.output
    }

    /// Filter a block of which only the first `len` samples are valid
    ///
    /// The rest of the block region is zeroed before filtering. All
    /// `block_size` outputs are returned; only the first `len` correspond to
    /// real input.
    ///
    /// # Errors
    /// Returns `FilterError::InvalidConfig` if `len` exceeds the block size
    pub fn process_partial(&mut self, len: usize) -> Result<&[f64]> {
        let block_size = self.block_size();
        if len > block_size {
            return Err(FilterError::InvalidConfig(format!(
                "partial block of {} samples exceeds block size {}",
                len, block_size
            )));
        }
        self.block_mut()[len..].fill(0.0);
        Ok(self.process_block())
    }

    // Last `halo_size` samples of the buffer start at `block_size`. When the
    // halo is larger than the block the ranges overlap; copy_within handles it.
    fn rotate_halo(&mut self) {
        let block_size = self.block_size();
        self.halo_and_block.copy_within(block_size.., 0);
    }

    /// Zero the working buffer so the filter can start a new stream
    pub fn reset(&mut self) {
        self.halo_and_block.fill(0.0);
        self.output.fill(0.0);
        self.state = FilterState::AwaitingBlock;
        self.blocks_processed = 0;
    }

    /// Block region for the caller to fill before the next `process_block`
    pub fn block_mut(&mut self) -> &mut [f64] {
        self.state = FilterState::AwaitingBlock;
        &mut self.halo_and_block[self.halo_size..]
    }

    pub fn block(&self) -> &[f64] {
        &self.halo_and_block[self.halo_size..]
    }

    pub fn halo(&self) -> &[f64] {
        &self.halo_and_block[..self.halo_size]
    }

    /// Whole working buffer, halo first
    pub fn buffer(&self) -> &[f64] {
        &self.halo_and_block
    }

    /// Outputs of the most recent `process_block`
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn block_size(&self) -> usize {
        self.output.len()
    }

    pub fn halo_size(&self) -> usize {
        self.halo_size
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn alignment(&self) -> WindowAlignment {
        self.alignment
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn blocks_processed(&self) -> usize {
        self.blocks_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(start: usize, len: usize) -> Vec<f64> {
        (start..start + len).map(|v| v as f64).collect()
    }

    #[test]
    fn test_rejects_small_halo() {
        let w = WeightVector::new(vec![1.0; 5]).unwrap();

        let err = BlockStreamFilter::new(w.clone(), 8, 4, WindowAlignment::Preceding).unwrap_err();
        assert!(matches!(
            err,
            FilterError::HaloTooSmall {
                halo: 4,
                taps: 5,
                required: 5
            }
        ));
        assert!(BlockStreamFilter::new(w.clone(), 8, 5, WindowAlignment::Preceding).is_ok());

        assert!(BlockStreamFilter::new(w.clone(), 8, 3, WindowAlignment::Inclusive).is_err());
        assert!(BlockStreamFilter::new(w, 8, 4, WindowAlignment::Inclusive).is_ok());
    }

    #[test]
    fn test_rejects_zero_block() {
        let w = WeightVector::new(vec![1.0]).unwrap();
        assert!(BlockStreamFilter::new(w, 0, 1, WindowAlignment::Preceding).is_err());
    }

    #[test]
    fn test_preceding_window_excludes_current_sample() {
        let w = WeightVector::new(vec![1.0, 10.0, 100.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 4, 3, WindowAlignment::Preceding).unwrap();

        filter.block_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let out = filter.process_block().to_vec();

        // out[i] = 1*x[i-3] + 10*x[i-2] + 100*x[i-1], zero history
        assert_eq!(out, vec![0.0, 100.0, 210.0, 321.0]);
    }

    #[test]
    fn test_inclusive_window_ends_at_current_sample() {
        let w = WeightVector::new(vec![1.0, 10.0, 100.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 4, 2, WindowAlignment::Inclusive).unwrap();

        filter.block_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let out = filter.process_block().to_vec();

        assert_eq!(out, vec![100.0, 210.0, 321.0, 432.0]);
    }

    #[test]
    fn test_single_weight_passthrough() {
        let w = WeightVector::new(vec![1.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 5, 0, WindowAlignment::Inclusive).unwrap();

        for start in [0, 5, 10] {
            let input = ramp(start, 5);
            filter.block_mut().copy_from_slice(&input);
            assert_eq!(filter.process_block(), input.as_slice());
        }
    }

    #[test]
    fn test_single_weight_preceding_delays_one_sample() {
        let w = WeightVector::new(vec![1.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 3, 1, WindowAlignment::Preceding).unwrap();

        filter.block_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(filter.process_block(), &[0.0, 1.0, 2.0]);
        filter.block_mut().copy_from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(filter.process_block(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_zero_weights_give_zero_output() {
        let w = WeightVector::new(vec![0.0; 4]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 6, 4, WindowAlignment::Preceding).unwrap();

        for start in [3, 50] {
            filter.block_mut().copy_from_slice(&ramp(start, 6));
            assert!(filter.process_block().iter().all(|&y| y == 0.0));
        }
    }

    #[test]
    fn test_halo_rotation() {
        let w = WeightVector::new(vec![0.5; 3]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 6, 3, WindowAlignment::Preceding).unwrap();
        assert_eq!(filter.halo(), &[0.0; 3]);

        filter.block_mut().copy_from_slice(&ramp(0, 6));
        filter.process_block();
        assert_eq!(filter.halo(), &[3.0, 4.0, 5.0]);

        filter.block_mut().copy_from_slice(&ramp(6, 6));
        filter.process_block();
        assert_eq!(filter.halo(), &[9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_halo_rotation_larger_than_block() {
        // H > B: the halo keeps part of the previous halo plus the whole block
        let w = WeightVector::new(vec![1.0; 2]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 2, 5, WindowAlignment::Preceding).unwrap();

        let mut seen = Vec::new();
        for start in (0..10).step_by(2) {
            let input = ramp(start, 2);
            seen.extend_from_slice(&input);
            let before: Vec<f64> = filter.buffer().to_vec();

            filter.block_mut().copy_from_slice(&input);
            filter.process_block();

            let expected: Vec<f64> = before[2..5].iter().copied().chain(input).collect();
            assert_eq!(filter.halo(), expected.as_slice());
            assert_eq!(&filter.halo()[3..], &seen[seen.len() - 2..]);
        }
        assert_eq!(filter.halo(), &[5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_deterministic_for_same_buffer() {
        let w = WeightVector::random(7, 9).unwrap();
        let mut a = BlockStreamFilter::new(w, 16, 8, WindowAlignment::Preceding).unwrap();
        a.block_mut().copy_from_slice(&ramp(1, 16));
        a.process_block();
        a.block_mut().copy_from_slice(&ramp(17, 16));

        let mut b = a.clone();
        let out_a = a.process_block().to_vec();
        let out_b = b.process_block().to_vec();
        assert_eq!(out_a, out_b);
        assert_eq!(a.halo(), b.halo());
    }

    #[test]
    fn test_state_cycle_and_reset() {
        let w = WeightVector::new(vec![1.0, 1.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 2, 2, WindowAlignment::Preceding).unwrap();
        assert_eq!(filter.state(), FilterState::AwaitingBlock);

        filter.block_mut().copy_from_slice(&[1.0, 2.0]);
        assert_eq!(filter.state(), FilterState::AwaitingBlock);
        filter.process_block();
        assert_eq!(filter.state(), FilterState::Processed);
        assert_eq!(filter.blocks_processed(), 1);

        filter.reset();
        assert_eq!(filter.state(), FilterState::AwaitingBlock);
        assert_eq!(filter.blocks_processed(), 0);
        assert!(filter.buffer().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_process_partial_zero_pads() {
        let w = WeightVector::new(vec![1.0, 1.0]).unwrap();
        let mut filter = BlockStreamFilter::new(w, 4, 1, WindowAlignment::Inclusive).unwrap();

        filter.block_mut().copy_from_slice(&[9.0, 9.0, 9.0, 9.0]);
        filter.process_block();

        filter.block_mut()[..2].copy_from_slice(&[1.0, 2.0]);
        let out = filter.process_partial(2).unwrap().to_vec();
        assert_relative_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 3.0);
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[3], 0.0);

        assert!(filter.process_partial(5).is_err());
    }
}
