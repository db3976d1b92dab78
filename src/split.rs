//! Split phase: cut the input into buffer-sized chunks, shuffle each chunk in
//! memory and save it to its own temporary file.

use crate::config::ShuffleConfig;
use crate::crec::Crec;
use crate::error::{Result, ShuffleError};
use crate::random::{IndexGenerator, RandomSource};
use crate::shuffle::{ShuffleSite, shuffle};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use tracing::{debug, info};

/// Reads `reader` to exhaustion and writes shuffled chunks of at most
/// `capacity` records to the temp files named by `config`.
///
/// Returns the number of temp files written, which is never zero: empty
/// input still leaves one empty file behind for the merge phase.
pub fn split_into_chunks<R: Read, S: RandomSource>(
    reader: &mut R,
    config: &ShuffleConfig,
    capacity: usize,
    buffer: &mut Vec<Crec>,
    indices: &mut IndexGenerator<S>,
) -> Result<usize> {
    info!("SHUFFLING COOCCURRENCES");
    info!("array size: {capacity}");

    buffer.clear();
    let mut file_counter = 0;
    let mut total_lines: u64 = 0;
    let mut writer = create_chunk_file(config, file_counter)?;

    while let Some(crec) = Crec::read_from_raw(reader)? {
        // If the array is full, shuffle it and write to a temporary file.
        if buffer.len() >= capacity {
            total_lines += buffer.len() as u64;
            write_chunk(buffer, ShuffleSite::FullChunk, config, indices, &mut writer)?;
            debug!("Shuffling by chunks: processed {total_lines} lines.");

            file_counter += 1;
            writer = create_chunk_file(config, file_counter)?;
            buffer.clear();
        }
        buffer.push(crec);
    }

    // Last chunk may be smaller than array_size
    total_lines += buffer.len() as u64;
    write_chunk(buffer, ShuffleSite::FinalChunk, config, indices, &mut writer)?;
    drop(writer);
    buffer.clear();

    let num_files = file_counter + 1;
    info!("Shuffling by chunks: processed {total_lines} lines.");
    info!("Wrote {num_files} temporary file(s).");
    Ok(num_files)
}

fn create_chunk_file(config: &ShuffleConfig, file_id: usize) -> Result<BufWriter<File>> {
    let path = config.temp_file_path(file_id);
    let file = File::create(&path).map_err(|source| ShuffleError::TempFile { path, source })?;
    Ok(BufWriter::new(file))
}

/// Shuffles the occupied part of `buffer` and writes all of it.
fn write_chunk<S: RandomSource, W: Write>(
    buffer: &mut [Crec],
    site: ShuffleSite,
    config: &ShuffleConfig,
    indices: &mut IndexGenerator<S>,
    writer: &mut W,
) -> Result<()> {
    let span = config.span_policy.span(site, buffer.len());
    shuffle(buffer, span, indices);
    Crec::write_slice_raw(writer, buffer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::SpanPolicy;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn records(n: usize) -> Vec<Crec> {
        (0..n)
            .map(|i| Crec {
                word1: i as i32,
                word2: (i * 3) as i32,
                val: i as f64 + 0.25,
            })
            .collect()
    }

    fn encode(recs: &[Crec]) -> Cursor<Vec<u8>> {
        let mut bytes = Vec::new();
        Crec::write_slice_raw(&mut bytes, recs).unwrap();
        Cursor::new(bytes)
    }

    fn read_all(path: &Path) -> Vec<Crec> {
        let mut reader = Cursor::new(fs::read(path).unwrap());
        let mut out = Vec::new();
        while let Some(crec) = Crec::read_from_raw(&mut reader).unwrap() {
            out.push(crec);
        }
        out
    }

    fn config_in(dir: &TempDir) -> ShuffleConfig {
        ShuffleConfig::default()
            .with_temp_file_head(dir.path().join("chunk").to_string_lossy().into_owned())
    }

    fn run_split(config: &ShuffleConfig, recs: &[Crec], capacity: usize) -> usize {
        let mut buffer = Vec::with_capacity(capacity);
        let mut indices = IndexGenerator::seeded(5);
        split_into_chunks(&mut encode(recs), config, capacity, &mut buffer, &mut indices)
            .unwrap()
    }

    #[test]
    fn ten_records_capacity_four_gives_three_files() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let input = records(10);

        let num_files = run_split(&config, &input, 4);
        assert_eq!(num_files, 3);

        let sizes: Vec<usize> = (0..3)
            .map(|i| read_all(&config.temp_file_path(i)).len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(!config.temp_file_path(3).exists());

        // Each file holds a permutation of its own contiguous slice.
        for (i, slice) in input.chunks(4).enumerate() {
            let mut got: Vec<i32> = read_all(&config.temp_file_path(i))
                .iter()
                .map(|c| c.word1)
                .collect();
            got.sort_unstable();
            let want: Vec<i32> = slice.iter().map(|c| c.word1).collect();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn exact_multiple_does_not_leave_empty_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert_eq!(run_split(&config, &records(8), 4), 2);
        assert!(!config.temp_file_path(2).exists());
    }

    #[test]
    fn empty_input_writes_one_empty_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert_eq!(run_split(&config, &[], 4), 1);
        assert_eq!(fs::metadata(config.temp_file_path(0)).unwrap().len(), 0);
    }

    #[test]
    fn capacity_of_one_writes_one_file_per_record() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let input = records(5);
        assert_eq!(run_split(&config, &input, 1), 5);
        for (i, crec) in input.iter().enumerate() {
            assert_eq!(read_all(&config.temp_file_path(i)), vec![*crec]);
        }
    }

    #[test]
    fn legacy_span_leaves_last_two_slots_of_full_chunk() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_span_policy(SpanPolicy::Legacy);
        let input = records(13);

        assert_eq!(run_split(&config, &input, 6), 3);
        let first = read_all(&config.temp_file_path(0));
        assert_eq!(&first[4..], &input[4..6]);
        let second = read_all(&config.temp_file_path(1));
        assert_eq!(&second[4..], &input[10..12]);
        // Final chunk of one record: span 0, nothing moves.
        assert_eq!(read_all(&config.temp_file_path(2)), vec![input[12]]);
    }

    #[test]
    fn unwritable_temp_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = ShuffleConfig::default().with_temp_file_head(
            dir.path()
                .join("missing")
                .join("chunk")
                .to_string_lossy()
                .into_owned(),
        );
        let mut buffer = Vec::new();
        let mut indices = IndexGenerator::seeded(5);
        let err = split_into_chunks(&mut encode(&records(3)), &config, 2, &mut buffer, &mut indices)
            .unwrap_err();
        assert!(matches!(err, ShuffleError::TempFile { .. }));
    }

    #[test]
    fn failed_rotation_leaves_earlier_chunks_on_disk() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        // A directory where the second chunk should go.
        fs::create_dir(config.temp_file_path(1)).unwrap();

        let input = records(5);
        let mut buffer = Vec::new();
        let mut indices = IndexGenerator::seeded(5);
        let err = split_into_chunks(&mut encode(&input), &config, 2, &mut buffer, &mut indices)
            .unwrap_err();

        assert!(matches!(err, ShuffleError::TempFile { .. }));
        let first = read_all(&config.temp_file_path(0));
        assert_eq!(first.len(), 2);
        let mut words: Vec<i32> = first.iter().map(|c| c.word1).collect();
        words.sort_unstable();
        assert_eq!(words, vec![0, 1]);
        assert!(!config.temp_file_path(2).exists());
    }
}
