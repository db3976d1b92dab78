//! Merge phase: interleave the shuffled temp files round by round, shuffle
//! each round again and append it to the output.
//!
//! Doesn't necessarily produce a perfect shuffle, but good enough: records
//! can only meet records that were read in the same round.

use crate::config::ShuffleConfig;
use crate::crec::Crec;
use crate::error::{Result, ShuffleError};
use crate::random::{IndexGenerator, RandomSource};
use crate::shuffle::{ShuffleSite, shuffle};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use tracing::{debug, info, warn};

/// Merges `num_files` temp files into `config.output_file` and deletes them.
///
/// Returns the number of records written. If a temp file cannot be opened
/// nothing is deleted, so the merge can be retried with the same prefix.
pub fn merge_chunks<S: RandomSource>(
    config: &ShuffleConfig,
    num_files: usize,
    capacity: usize,
    buffer: &mut Vec<Crec>,
    indices: &mut IndexGenerator<S>,
) -> Result<u64> {
    let output = File::create(&config.output_file).map_err(|source| ShuffleError::OpenOutput {
        path: config.output_file.clone(),
        source,
    })?;
    let mut fout = BufWriter::new(output);

    // Open all temporary files for reading. `None` marks an exhausted file.
    let mut readers: Vec<Option<BufReader<File>>> = Vec::with_capacity(num_files);
    for i in 0..num_files {
        let path = config.temp_file_path(i);
        let file = File::open(&path).map_err(|source| ShuffleError::TempFile { path, source })?;
        readers.push(Some(BufReader::new(file)));
    }

    info!("Merging {num_files} temp file(s).");

    // At least one record per file, or a capacity below num_files would read nothing.
    let chunk_per_file = (capacity / num_files.max(1)).max(1);
    let mut total_lines: u64 = 0;

    loop {
        buffer.clear();
        for slot in readers.iter_mut() {
            let Some(reader) = slot.as_mut() else {
                continue;
            };
            let mut exhausted = false;
            for _ in 0..chunk_per_file {
                match Crec::read_from_raw(reader)? {
                    Some(crec) => buffer.push(crec),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }
            if exhausted {
                // Close it and skip it in later rounds.
                *slot = None;
            }
        }

        if buffer.is_empty() {
            break;
        }

        total_lines += buffer.len() as u64;
        let span = config.span_policy.span(ShuffleSite::MergeRound, buffer.len());
        shuffle(buffer, span, indices);
        Crec::write_slice_raw(&mut fout, buffer)?;
        debug!("Merging temp files: processed {total_lines} lines.");
    }

    fout.flush()?;
    drop(readers);
    buffer.clear();
    info!("Merging temp files: processed {total_lines} lines.");

    for i in 0..num_files {
        let path = config.temp_file_path(i);
        if let Err(e) = fs::remove_file(&path) {
            warn!("could not remove temp file '{}': {e}", path.display());
        }
    }

    Ok(total_lines)
}
