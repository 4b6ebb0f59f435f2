//! Sample streams and the block-by-block session driver

mod codec;
mod file;
mod session;

pub use codec::{
    RawF64Reader, RawF64Writer, SampleReader, SampleWriter, SliceReader, decode_samples,
    encode_samples,
};
pub use file::{
    FileReader, FileWriter, create_output, open_input, read_samples_file, write_samples_file,
};
pub use session::{OutputStats, SessionSummary, filter_file, run_session};
