//! External shuffle of GloVe co-occurrence records.
//!
//! Files too large for memory are shuffled in two passes: chunks that fit in
//! the buffer are shuffled and saved to temp files, then the temp files are
//! read back round-robin and each round is shuffled again into the output.

pub mod config;
pub mod crec;
pub mod error;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod random;
pub mod shuffle;
pub mod split;

pub use config::ShuffleConfig;
pub use crec::Crec;
pub use error::{Result, ShuffleError};
pub use pipeline::{ShuffleSummary, shuffle_file};
pub use random::{IndexGenerator, RandomSource, StdSource};
pub use shuffle::{ShuffleSite, SpanPolicy};
