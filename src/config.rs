use crate::crec::Crec;
use crate::error::{Result, ShuffleError};
use crate::shuffle::SpanPolicy;
use std::path::PathBuf;

const GIGABYTE: f64 = 1_073_741_824.0; // bytes, ie. 1024*1024*1024

/// Share of the memory budget given to the record buffer.
const BUFFER_SHARE: f64 = 0.95;

/// Configuration parameters for one shuffle run.
#[derive(Debug, Clone)]
pub struct ShuffleConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    /// Filename, excluding `_NNNN.bin`, for temporary files.
    pub temp_file_head: String,
    /// Soft limit for memory consumption, in GB.
    pub memory_gb: f64,
    /// Records per buffer; overrides the value derived from `memory_gb`.
    pub array_size: Option<usize>,
    /// 0 silent, 1 phase summaries, 2 and up per-chunk progress. The engine
    /// does not read it; it picks the log level in `logging::init`.
    pub verbose: i32,
    /// If not set, the current time is used.
    pub seed: Option<u64>,
    pub span_policy: SpanPolicy,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        ShuffleConfig {
            input_file: PathBuf::new(),
            output_file: PathBuf::new(),
            temp_file_head: "temp_shuffle".to_string(),
            memory_gb: 2.0,
            array_size: None,
            verbose: 2,
            seed: None,
            span_policy: SpanPolicy::Full,
        }
    }
}

impl ShuffleConfig {
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        ShuffleConfig {
            input_file: input_file.into(),
            output_file: output_file.into(),
            ..Default::default()
        }
    }

    pub fn with_temp_file_head(mut self, head: impl Into<String>) -> Self {
        self.temp_file_head = head.into();
        self
    }

    pub fn with_memory_gb(mut self, memory_gb: f64) -> Self {
        self.memory_gb = memory_gb;
        self
    }

    pub fn with_array_size(mut self, array_size: usize) -> Self {
        self.array_size = Some(array_size);
        self
    }

    pub fn with_verbose(mut self, verbose: i32) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_span_policy(mut self, span_policy: SpanPolicy) -> Self {
        self.span_policy = span_policy;
        self
    }

    /// Number of records held in memory at once.
    pub fn capacity(&self) -> Result<usize> {
        let capacity = match self.array_size {
            Some(n) => n,
            None => {
                if !self.memory_gb.is_finite() || self.memory_gb <= 0.0 {
                    return Err(ShuffleError::InvalidConfig(format!(
                        "memory limit must be a positive number of GB, got {}",
                        self.memory_gb
                    )));
                }
                capacity_for_memory(self.memory_gb)
            }
        };
        if capacity == 0 {
            return Err(ShuffleError::InvalidConfig(
                "buffer must hold at least one record".to_string(),
            ));
        }
        Ok(capacity)
    }

    pub fn temp_file_path(&self, index: usize) -> PathBuf {
        temp_file_path(&self.temp_file_head, index)
    }
}

/// `floor(0.95 * memory_gb * 2^30 / sizeof(Crec))`
pub fn capacity_for_memory(memory_gb: f64) -> usize {
    (BUFFER_SHARE * memory_gb * GIGABYTE / Crec::SIZE as f64) as usize
}

pub fn temp_file_path(head: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{head}_{index:04}.bin"))
}
