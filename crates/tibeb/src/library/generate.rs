use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::error::{Result, TibebError};

/// Glyphs a generated pattern draws from; background last
pub const GLYPHS: [char; 4] = ['X', 'V', 'O', ' '];

/// Random symbolic pattern generator over an injected randomness source.
///
/// Each row is mirrored around its centre, the way border motifs repeat.
pub struct PatternGenerator<R: Rng> {
    rng: R,
}

impl PatternGenerator<StdRng> {
    /// Reproducible generator; the same seed always yields the same patterns
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> PatternGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `rows` lines of exactly `columns` glyphs each
    pub fn generate(&mut self, rows: usize, columns: usize) -> Result<String> {
        if rows == 0 || columns == 0 {
            return Err(TibebError::invalid(format!(
                "pattern size must be positive, got {rows}x{columns}"
            )));
        }

        let half = columns.div_ceil(2);
        let lines: Vec<String> = (0..rows)
            .map(|_| {
                let left: Vec<char> = (0..half)
                    .map(|_| GLYPHS[self.rng.random_range(0..GLYPHS.len())])
                    .collect();
                let mirrored = left.iter().rev().skip(columns % 2);
                left.iter().chain(mirrored).collect()
            })
            .collect();

        debug!(rows, columns, "generated random pattern");
        Ok(lines.join("\n"))
    }
}
