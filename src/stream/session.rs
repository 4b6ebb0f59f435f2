use std::path::Path;

use rolling_stats::Stats;
use serde::Serialize;

use crate::config::{StreamConfig, TailPolicy};
use crate::error::{FilterError, Result};
use crate::signal_processing::BlockStreamFilter;
use crate::stream::{SampleReader, SampleWriter, create_output, open_input};

/// Summary statistics of the filtered output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl OutputStats {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// What a filtering session did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub input_size: usize,
    pub block_size: usize,
    pub halo_size: usize,
    pub taps: usize,
    /// Full blocks filtered
    pub blocks_processed: usize,
    pub samples_read: usize,
    pub samples_written: usize,
    /// Trailing samples left unprocessed by the tail policy
    pub samples_dropped: usize,
    /// Whether a zero-padded partial block was filtered at the end
    pub padded_tail: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_stats: Option<OutputStats>,
}

/// Stream `input_size` samples from `reader` through `filter` into `writer`
///
/// Runs `floor(input_size / block_size)` full blocks in order. The remainder
/// is handled according to `tail`. Any read or write failure ends the
/// session immediately.
///
/// # Errors
/// `FilterError::ShortRead` if the reader ends before `input_size` samples,
/// plus whatever the reader or writer report
pub fn run_session<R, W>(
    filter: &mut BlockStreamFilter,
    reader: &mut R,
    writer: &mut W,
    input_size: usize,
    tail: TailPolicy,
) -> Result<SessionSummary>
where
    R: SampleReader + ?Sized,
    W: SampleWriter + ?Sized,
{
    let block_size = filter.block_size();
    let n_blocks = input_size / block_size;
    let remainder = input_size % block_size;

    log::info!(
        "Filtering {} samples: {} blocks of {}, halo {}, {} taps",
        input_size,
        n_blocks,
        block_size,
        filter.halo_size(),
        filter.weights().len()
    );

    let mut stats: Stats<f64> = Stats::new();
    let mut samples_read = 0;
    let mut samples_written = 0;

    for block in 0..n_blocks {
        let got = reader.read_samples(filter.block_mut())?;
        samples_read += got;
        if got < block_size {
            return Err(FilterError::ShortRead {
                block,
                expected: block_size,
                got,
            });
        }

        let output = filter.process_block();
        for &y in output {
            stats.update(y);
        }
        writer.write_samples(output)?;
        samples_written += output.len();

        log::debug!("Block {}/{} written", block + 1, n_blocks);
    }

    let mut samples_dropped = 0;
    let mut padded_tail = false;
    if remainder > 0 {
        match tail {
            TailPolicy::Truncate => {
                log::warn!(
                    "Dropping {} trailing samples (input size {} is not a multiple of block size {})",
                    remainder,
                    input_size,
                    block_size
                );
                samples_dropped = remainder;
            }
            TailPolicy::ZeroPad => {
                let got = reader.read_samples(&mut filter.block_mut()[..remainder])?;
                samples_read += got;
                if got < remainder {
                    return Err(FilterError::ShortRead {
                        block: n_blocks,
                        expected: remainder,
                        got,
                    });
                }

                let output = &filter.process_partial(remainder)?[..remainder];
                for &y in output {
                    stats.update(y);
                }
                writer.write_samples(output)?;
                samples_written += output.len();
                padded_tail = true;

                log::debug!("Zero-padded tail of {} samples written", remainder);
            }
        }
    }

    writer.finish()?;

    Ok(SessionSummary {
        input_size,
        block_size,
        halo_size: filter.halo_size(),
        taps: filter.weights().len(),
        blocks_processed: n_blocks,
        samples_read,
        samples_written,
        samples_dropped,
        padded_tail,
        output_stats: OutputStats::from_stats(&stats),
    })
}

/// Filter one raw sample file into another
///
/// The input length comes from `config.input_size`, or from the file size
/// when that is `None`.
pub fn filter_file<P, Q>(config: &StreamConfig, input: P, output: Q) -> Result<SessionSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut filter = config.build_filter()?;

    // Both streams are opened before any block is processed
    let (mut reader, available) = open_input(input)?;
    let mut writer = create_output(output)?;

    let input_size = config.input_size.unwrap_or(available);
    if input_size > available {
        log::warn!(
            "Input holds {} samples but {} were requested",
            available,
            input_size
        );
    }

    run_session(&mut filter, &mut reader, &mut writer, input_size, config.tail)
}
