use std::io::{ErrorKind, Read, Write};

use crate::constants::SAMPLE_BYTES;
use crate::error::{FilterError, Result};

/// Source of samples for a filtering session
pub trait SampleReader {
    /// Fill `buf` with the next samples
    ///
    /// Returns the number of samples written to `buf`. Anything less than
    /// `buf.len()` means the stream has ended.
    fn read_samples(&mut self, buf: &mut [f64]) -> Result<usize>;
}

/// Sink for filtered samples
pub trait SampleWriter {
    fn write_samples(&mut self, samples: &[f64]) -> Result<()>;

    /// Flush anything buffered; called once after the last block
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: SampleReader + ?Sized> SampleReader for &mut T {
    fn read_samples(&mut self, buf: &mut [f64]) -> Result<usize> {
        (**self).read_samples(buf)
    }
}

impl<T: SampleWriter + ?Sized> SampleWriter for &mut T {
    fn write_samples(&mut self, samples: &[f64]) -> Result<()> {
        (**self).write_samples(samples)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl SampleWriter for Vec<f64> {
    fn write_samples(&mut self, samples: &[f64]) -> Result<()> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

/// In-memory sample source
pub struct SliceReader<'a> {
    samples: &'a [f64],
    position: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(samples: &'a [f64]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl SampleReader for SliceReader<'_> {
    fn read_samples(&mut self, buf: &mut [f64]) -> Result<usize> {
        let end = (self.position + buf.len()).min(self.samples.len());
        let count = end - self.position;
        buf[..count].copy_from_slice(&self.samples[self.position..end]);
        self.position = end;
        Ok(count)
    }
}

/// Reads headerless native-endian `f64` samples from a byte stream
pub struct RawF64Reader<R> {
    inner: R,
    bytes: Vec<u8>,
    samples_read: usize,
}

impl<R: Read> RawF64Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes: Vec::new(),
            samples_read: 0,
        }
    }

    /// Total samples decoded so far
    pub fn samples_read(&self) -> usize {
        self.samples_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // Read until `bytes` is full or the stream ends; returns bytes filled
    fn fill_bytes(&mut self) -> Result<usize> {
        let mut filled = 0;
        while filled < self.bytes.len() {
            match self.inner.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(FilterError::Read(e)),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> SampleReader for RawF64Reader<R> {
    fn read_samples(&mut self, buf: &mut [f64]) -> Result<usize> {
        self.bytes.resize(buf.len() * SAMPLE_BYTES, 0);
        let filled = self.fill_bytes()?;

        let partial = filled % SAMPLE_BYTES;
        if partial != 0 {
            return Err(FilterError::TrailingBytes { len: partial });
        }

        let count = decode_into(&self.bytes[..filled], buf);
        self.samples_read += count;
        Ok(count)
    }
}

/// Writes headerless native-endian `f64` samples to a byte stream
pub struct RawF64Writer<W> {
    inner: W,
    bytes: Vec<u8>,
    samples_written: usize,
}

impl<W: Write> RawF64Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: Vec::new(),
            samples_written: 0,
        }
    }

    pub fn samples_written(&self) -> usize {
        self.samples_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> SampleWriter for RawF64Writer<W> {
    fn write_samples(&mut self, samples: &[f64]) -> Result<()> {
        self.bytes.clear();
        encode_into(samples, &mut self.bytes);
        self.inner
            .write_all(&self.bytes)
            .map_err(FilterError::Write)?;
        self.samples_written += samples.len();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush().map_err(FilterError::Write)
    }
}

fn decode_into(bytes: &[u8], out: &mut [f64]) -> usize {
    let mut count = 0;
    for (chunk, sample) in bytes.chunks_exact(SAMPLE_BYTES).zip(out.iter_mut()) {
        let mut raw = [0u8; SAMPLE_BYTES];
        raw.copy_from_slice(chunk);
        *sample = f64::from_ne_bytes(raw);
        count += 1;
    }
    count
}

fn encode_into(samples: &[f64], out: &mut Vec<u8>) {
    out.reserve(samples.len() * SAMPLE_BYTES);
    for sample in samples {
        out.extend_from_slice(&sample.to_ne_bytes());
    }
}

/// Encode samples in the on-disk format
pub fn encode_samples(samples: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_into(samples, &mut bytes);
    bytes
}

/// Decode a whole byte buffer in the on-disk format
///
/// # Errors
/// Returns `FilterError::TrailingBytes` if the length is not a whole number
/// of samples
pub fn decode_samples(bytes: &[u8]) -> Result<Vec<f64>> {
    let partial = bytes.len() % SAMPLE_BYTES;
    if partial != 0 {
        return Err(FilterError::TrailingBytes { len: partial });
    }
    let mut samples = vec![0.0; bytes.len() / SAMPLE_BYTES];
    decode_into(bytes, &mut samples);
    Ok(samples)
}
