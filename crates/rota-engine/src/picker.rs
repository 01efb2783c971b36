use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;

/// Seam for the random tie-break in candidate selection.
///
/// Production uses OS entropy; tests inject scripted sequences so scenario
/// assertions never depend on algorithmic accident.
pub trait Picker: Send + Sync {
    /// Return an index in `0..len`. Callers guarantee `len >= 1`.
    fn pick_index(&self, len: usize) -> usize;
}

/// Unbiased picker backed by the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsPicker;

impl Picker for OsPicker {
    fn pick_index(&self, len: usize) -> usize {
        OsRng.gen_range(0..len)
    }
}

/// Deterministic picker that replays a fixed index sequence, then repeats
/// the last entry. Indices are taken modulo the pool size.
pub struct SequencePicker {
    script: Mutex<Vec<usize>>,
    cursor: Mutex<usize>,
}

impl SequencePicker {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            cursor: Mutex::new(0),
        }
    }

    /// Picker that always takes the first pool member.
    pub fn first() -> Self {
        Self::new([0])
    }
}

impl Picker for SequencePicker {
    fn pick_index(&self, len: usize) -> usize {
        let script = self.script.lock();
        if script.is_empty() {
            return 0;
        }
        let mut cursor = self.cursor.lock();
        let raw = script[(*cursor).min(script.len() - 1)];
        *cursor += 1;
        raw % len
    }
}
