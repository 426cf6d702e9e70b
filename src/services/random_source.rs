use rand::RngCore;

/// Source of randomness for activity selection.
///
/// Injected into the scheduler so tests can replace global entropy with a
/// fixed sequence. Every `rand` generator qualifies.
pub trait RandomSource {
    /// Returns an index in `[0, upper)`. `upper` is always at least 1.
    fn next_index(&mut self, upper: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_index(&mut self, upper: usize) -> usize {
        rand::Rng::gen_range(self, 0..upper)
    }
}

/// In-place Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1).min(i);
        items.swap(i, j);
    }
}

/// Replays a fixed list of values, wrapping around when exhausted.
///
/// Each value is reduced modulo the requested bound, so a sequence of
/// `usize::MAX` keeps every shuffle an identity permutation.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that never reorders anything.
    pub fn identity() -> Self {
        Self::new(vec![usize::MAX])
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        if self.values.is_empty() || upper == 0 {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        if value == usize::MAX {
            upper - 1
        } else {
            value % upper
        }
    }
}
