use crate::config::ShuffleConfig;
use crate::crec::Crec;
use crate::error::{Result, ShuffleError};
use crate::merge::merge_chunks;
use crate::random::{IndexGenerator, time_seed};
use crate::split::split_into_chunks;
use std::fs::File;
use std::io::BufReader;
use tracing::info;

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleSummary {
    pub capacity: usize,
    pub seed: u64,
    pub temp_files: usize,
    pub records: u64,
}

/// Shuffles `config.input_file` into `config.output_file`: split into
/// locally shuffled temp files, then merge them back with a second shuffle.
pub fn shuffle_file(config: &ShuffleConfig) -> Result<ShuffleSummary> {
    let capacity = config.capacity()?;
    let seed = config.seed.unwrap_or_else(time_seed);
    info!("Using random seed {seed}");
    let mut indices = IndexGenerator::seeded(seed);

    // The one buffer, lent to each phase in turn.
    let mut buffer: Vec<Crec> = Vec::new();
    buffer.try_reserve_exact(capacity).map_err(|e| {
        ShuffleError::InvalidConfig(format!(
            "cannot allocate a buffer of {capacity} records: {e}"
        ))
    })?;

    let input = File::open(&config.input_file).map_err(|source| ShuffleError::OpenInput {
        path: config.input_file.clone(),
        source,
    })?;
    let mut reader = BufReader::new(input);

    let temp_files = split_into_chunks(&mut reader, config, capacity, &mut buffer, &mut indices)?;
    drop(reader);
    let records = merge_chunks(config, temp_files, capacity, &mut buffer, &mut indices)?;

    Ok(ShuffleSummary {
        capacity,
        seed,
        temp_files,
        records,
    })
}
