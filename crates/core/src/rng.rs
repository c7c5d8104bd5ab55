//! Number sources feeding generation and gameplay rolls. A recording source
//! logs every draw so an equivalent scripted source can rebuild the same
//! dungeon later; a scripted source replays such a log.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Produces integers in an inclusive range. Callers guarantee
/// `min_value <= max_value`; the bound is not validated here.
pub trait NumberSource {
    fn next_in_range(&mut self, min_value: usize, max_value: usize) -> usize;

    /// Every value this source has emitted, in order. Empty for sources that
    /// do not keep a log.
    fn recorded(&self) -> &[usize] {
        &[]
    }
}

/// ChaCha8-backed source that remembers every draw.
pub struct RecordingSource {
    rng: ChaCha8Rng,
    drawn: Vec<usize>,
}

impl RecordingSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), drawn: Vec::new() }
    }
}

impl NumberSource for RecordingSource {
    fn next_in_range(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = max_value - min_value + 1;
        let value = min_value + (self.rng.next_u64() as usize % range_size);
        self.drawn.push(value);
        value
    }

    fn recorded(&self) -> &[usize] {
        &self.drawn
    }
}

/// Replays a fixed sequence, then falls back to random 0/1 draws so
/// probabilistic events after generation (pit and wounded-monster survival
/// rolls) keep working once the script runs out.
pub struct ScriptedSource {
    values: Vec<usize>,
    cursor: usize,
    fallback: ChaCha8Rng,
}

impl ScriptedSource {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, cursor: 0, fallback: ChaCha8Rng::seed_from_u64(0) }
    }

    /// How many scripted values have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor.min(self.values.len())
    }
}

impl NumberSource for ScriptedSource {
    fn next_in_range(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        if self.cursor < self.values.len() {
            let value = self.values[self.cursor];
            self.cursor += 1;
            value
        } else {
            (self.fallback.next_u64() % 2) as usize
        }
    }
}
