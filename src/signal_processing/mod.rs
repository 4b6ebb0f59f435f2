pub mod block_filter;
pub mod weights;

pub use block_filter::{BlockStreamFilter, FilterState};
pub use weights::WeightVector;
