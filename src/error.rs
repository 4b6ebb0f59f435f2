use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of a filtering session a stream belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    Input,
    Output,
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRole::Input => write!(f, "input"),
            StreamRole::Output => write!(f, "output"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Cannot open {stream} stream {}: {source}", .path.display())]
    StreamOpen {
        stream: StreamRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Output write failed: {0}")]
    Write(#[source] io::Error),

    #[error("Short read in block {block}: expected {expected} samples, got {got}")]
    ShortRead {
        block: usize,
        expected: usize,
        got: usize,
    },

    #[error("Input ends with {len} trailing bytes that do not form a whole sample")]
    TrailingBytes { len: usize },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Halo of {halo} samples is too small for {taps} taps (need at least {required})")]
    HaloTooSmall {
        halo: usize,
        taps: usize,
        required: usize,
    },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Config file error: {0}")]
    ConfigFile(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
