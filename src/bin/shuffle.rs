//! Tool to shuffle entries of word-word cooccurrence files
//!

use anyhow::Context;
use clap::Parser;
use glove_shuffle::{ShuffleConfig, SpanPolicy, logging, shuffle_file};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tool to shuffle entries of word-word cooccurrence files",
    after_help = "Example usage: (assuming 'cooccurrence.bin' has been produced by 'cooccur')\n\
                  shuffle --verbose 2 --memory 8.0 --input-file cooccurrence.bin --output-file cooccurrence.shuf.bin"
)]
struct Args {
    /// Set verbosity: 0, 1, or 2
    #[arg(short, long, default_value_t = 2)]
    verbose: i32,

    /// Soft limit for memory consumption, in GB
    #[arg(long, default_value_t = 2.0)]
    memory: f64,

    /// Limit to length <N> the buffer which stores chunks of data to shuffle
    /// before writing to disk. Overrides the value derived from --memory.
    #[arg(long = "array-size", value_name = "N")]
    array_size: Option<usize>,

    /// Filename, excluding extension, for temporary files
    #[arg(long = "temp-file", default_value = "temp_shuffle")]
    temp_file: String,

    /// Random seed to use. If not set, will be randomized using current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Shuffle spans of GloVe's C shuffle, which leave the last one or two
    /// records of every buffer in place
    #[arg(long = "legacy-span")]
    legacy_span: bool,

    /// Cooccurrence file to shuffle
    #[arg(long = "input-file", value_name = "FILE")]
    input_file: PathBuf,

    /// Destination for the shuffled records
    #[arg(long = "output-file", value_name = "FILE")]
    output_file: PathBuf,
}

impl Args {
    fn into_config(self) -> ShuffleConfig {
        ShuffleConfig {
            input_file: self.input_file,
            output_file: self.output_file,
            temp_file_head: self.temp_file,
            memory_gb: self.memory,
            array_size: self.array_size,
            verbose: self.verbose,
            seed: self.seed,
            span_policy: if self.legacy_span {
                SpanPolicy::Legacy
            } else {
                SpanPolicy::Full
            },
        }
    }
}

fn run(config: &ShuffleConfig) -> anyhow::Result<()> {
    let summary = shuffle_file(config).with_context(|| {
        format!(
            "failed to shuffle {} into {}",
            config.input_file.display(),
            config.output_file.display()
        )
    })?;
    tracing::info!(
        records = summary.records,
        temp_files = summary.temp_files,
        seed = summary.seed,
        "done"
    );
    Ok(())
}

fn main() {
    let config = Args::parse().into_config();
    logging::init(config.verbose);

    if let Err(e) = run(&config) {
        eprintln!("\nAn error occurred: {e:#}");
        process::exit(1);
    }
}
