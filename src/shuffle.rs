use crate::random::{IndexGenerator, RandomSource};

/// Fisher-Yates shuffle of `buffer[..n]`.
///
/// Elements at index `n` and beyond are left where they are. Panics if `n`
/// exceeds the buffer length.
pub fn shuffle<T, S: RandomSource>(buffer: &mut [T], n: usize, indices: &mut IndexGenerator<S>) {
    assert!(
        n <= buffer.len(),
        "shuffle span {n} exceeds buffer length {}",
        buffer.len()
    );
    for i in (1..n).rev() {
        let j = indices.next_index(i as u64 + 1) as usize;
        buffer.swap(i, j);
    }
}

/// The places the engine hands a buffer to [`shuffle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuffleSite {
    /// A split buffer that reached capacity.
    FullChunk,
    /// The last split buffer, flushed at end of input.
    FinalChunk,
    /// The records collected by one merge round.
    MergeRound,
}

/// How many of the occupied slots each call site shuffles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpanPolicy {
    /// Shuffle every occupied slot.
    #[default]
    Full,
    /// Spans of GloVe's C `shuffle`: a full chunk over `occupied - 2`,
    /// a final chunk and each merge round over `occupied - 1`. The trailing
    /// slots are written out unshuffled.
    Legacy,
}

impl SpanPolicy {
    pub fn span(self, site: ShuffleSite, occupied: usize) -> usize {
        match (self, site) {
            (SpanPolicy::Full, _) => occupied,
            (SpanPolicy::Legacy, ShuffleSite::FullChunk) => occupied.saturating_sub(2),
            (SpanPolicy::Legacy, ShuffleSite::FinalChunk | ShuffleSite::MergeRound) => {
                occupied.saturating_sub(1)
            }
        }
    }
}
