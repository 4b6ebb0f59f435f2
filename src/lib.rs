pub mod config;
pub mod constants;
pub mod error;
pub mod signal_processing;
pub mod simulation;
pub mod stream;

pub use config::{StreamConfig, TailPolicy, WindowAlignment};
pub use error::{FilterError, Result, StreamRole};
pub use signal_processing::{BlockStreamFilter, FilterState, WeightVector};
pub use stream::{SessionSummary, filter_file, run_session};
