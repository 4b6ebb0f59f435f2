use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::constants::SAMPLE_BYTES;
use crate::error::{FilterError, Result, StreamRole};
use crate::stream::{RawF64Reader, RawF64Writer, SampleWriter, decode_samples};

pub type FileReader = RawF64Reader<BufReader<File>>;
pub type FileWriter = RawF64Writer<BufWriter<File>>;

/// Open a raw sample file for reading
///
/// Returns the reader and the number of samples the file holds.
///
/// # Errors
/// `FilterError::StreamOpen` if the file cannot be opened or inspected,
/// `FilterError::TrailingBytes` if its size is not a whole number of samples
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<(FileReader, usize)> {
    let path = path.as_ref();
    let open_err = |source| FilterError::StreamOpen {
        stream: StreamRole::Input,
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(open_err)?;
    let len = file.metadata().map_err(open_err)?.len() as usize;

    let partial = len % SAMPLE_BYTES;
    if partial != 0 {
        return Err(FilterError::TrailingBytes { len: partial });
    }

    log::debug!("Opened {} ({} samples)", path.display(), len / SAMPLE_BYTES);
    Ok((RawF64Reader::new(BufReader::new(file)), len / SAMPLE_BYTES))
}

/// Create (or truncate) a raw sample file for writing
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<FileWriter> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| FilterError::StreamOpen {
        stream: StreamRole::Output,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RawF64Writer::new(BufWriter::new(file)))
}

/// Write a whole sequence to a raw sample file
pub fn write_samples_file<P: AsRef<Path>>(path: P, samples: &[f64]) -> Result<()> {
    let mut writer = create_output(path)?;
    writer.write_samples(samples)?;
    writer.finish()
}

/// Read a whole raw sample file into memory
pub fn read_samples_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| FilterError::StreamOpen {
        stream: StreamRole::Input,
        path: path.to_path_buf(),
        source,
    })?;
    decode_samples(&bytes)
}
