//! Round target generation

use rand::Rng;

use super::grid::Grid;
use crate::catalog::Symbol;
use crate::error::{GameError, Result};

/// Sample `len` symbols (with replacement) from the grid.
///
/// A candidate equal to the previous symbol is redrawn up to `max_attempts`
/// times; if it still repeats, the repeat is kept.
pub fn generate_sequence<R: Rng + ?Sized>(
    grid: &Grid,
    len: usize,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec<Symbol>> {
    if grid.is_empty() {
        return Err(GameError::EmptyGrid);
    }

    let symbols = grid.symbols();
    let mut sequence: Vec<Symbol> = Vec::with_capacity(len);
    for _ in 0..len {
        let mut idx = rng.random_range(0..symbols.len());
        if let Some(prev) = sequence.last() {
            let mut attempts = 0;
            while &symbols[idx] == prev && attempts < max_attempts {
                idx = rng.random_range(0..symbols.len());
                attempts += 1;
            }
        }
        sequence.push(symbols[idx].clone());
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid(symbols: &[&str]) -> Grid {
        Grid::new(symbols.iter().map(|s| Symbol::from(*s)).collect())
    }

    #[test]
    fn test_length_and_membership() {
        let g = grid(&["a", "b", "c", "d"]);
        let mut rng = Pcg32::seed_from_u64(11);
        let seq = generate_sequence(&g, 12, 5, &mut rng).unwrap();
        assert_eq!(seq.len(), 12);
        assert!(seq.iter().all(|s| g.contains(s)));
    }

    #[test]
    fn test_empty_grid_is_an_error() {
        let mut rng = Pcg32::seed_from_u64(11);
        let err = generate_sequence(&Grid::default(), 3, 5, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::EmptyGrid));
    }

    #[test]
    fn test_single_symbol_grid_repeats() {
        let g = grid(&["only"]);
        let mut rng = Pcg32::seed_from_u64(2);
        let seq = generate_sequence(&g, 4, 5, &mut rng).unwrap();
        assert!(seq.iter().all(|s| s.as_str() == "only"));
    }

    #[test]
    fn test_adjacent_repeats_are_rare() {
        // Two symbols, five redraws: a repeat survives with p = 1/64 per step.
        let g = grid(&["a", "b"]);
        let mut rng = Pcg32::seed_from_u64(99);
        let seq = generate_sequence(&g, 2000, 5, &mut rng).unwrap();
        let repeats = seq.windows(2).filter(|w| w[0] == w[1]).count();
        assert!(repeats < 100, "too many repeats: {repeats}");

        let mut rng = Pcg32::seed_from_u64(99);
        let unsuppressed = generate_sequence(&g, 2000, 0, &mut rng).unwrap();
        let raw_repeats = unsuppressed.windows(2).filter(|w| w[0] == w[1]).count();
        assert!(raw_repeats > repeats);
    }
}
