//! The board of tappable symbols
//!
//! Rebuilt from the catalog at the start of every round. Sequences are drawn
//! from the grid, never from the full catalog, so every target is on screen.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Symbol};

/// Symbols shown this round, in slot order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    symbols: Vec<Symbol>,
}

impl Grid {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Symbol in a given slot (keyboard shortcuts address slots)
    pub fn get(&self, slot: usize) -> Option<&Symbol> {
        self.symbols.get(slot)
    }

    pub fn slot_of(&self, symbol: &Symbol) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Draw a fresh grid of `size` symbols from the catalog.
///
/// Partitioned catalogs contribute an equal quota per category (padded from
/// the leftovers of larger categories when one runs short). Asking for more
/// symbols than the catalog holds returns the whole catalog.
pub fn sample_grid<R: Rng + ?Sized>(catalog: &Catalog, size: usize, rng: &mut R) -> Grid {
    let available = catalog.len();
    let target = size.min(available);
    if target < size {
        log::warn!(
            "Grid of {} requested but catalog only holds {}; using the whole catalog",
            size,
            available
        );
    }

    if !catalog.is_partitioned() {
        let mut symbols: Vec<Symbol> = catalog.iter().cloned().collect();
        symbols.shuffle(rng);
        symbols.truncate(target);
        return Grid::new(symbols);
    }

    let categories = catalog.categories();
    let quota = target.div_ceil(categories.len());
    let mut picked = Vec::with_capacity(target);
    let mut leftovers = Vec::new();

    for category in categories {
        let mut pool = category.symbols.clone();
        pool.shuffle(rng);
        let take = quota.min(pool.len());
        picked.extend(pool.drain(..take));
        leftovers.extend(pool);
    }

    if picked.len() < target {
        leftovers.shuffle(rng);
        let missing = target - picked.len();
        picked.extend(leftovers.into_iter().take(missing));
    }

    picked.shuffle(rng);
    picked.truncate(target);
    Grid::new(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_classic_grid_is_a_permutation() {
        let catalog = Catalog::classic();
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = sample_grid(&catalog, 30, &mut rng);
        assert_eq!(grid.len(), 30);
        let unique: HashSet<_> = grid.symbols().iter().collect();
        assert_eq!(unique.len(), 30);
        assert!(grid.symbols().iter().all(|s| catalog.contains(s)));
    }

    #[test]
    fn test_oversized_request_degrades() {
        let catalog = Catalog::flat(&["a", "b", "c"]);
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = sample_grid(&catalog, 30, &mut rng);
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_partitioned_quota_is_balanced() {
        let catalog = Catalog::themed();
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = sample_grid(&catalog, 30, &mut rng);
        assert_eq!(grid.len(), 30);
        for category in catalog.categories() {
            let count = grid
                .symbols()
                .iter()
                .filter(|s| category.symbols.contains(s))
                .count();
            assert_eq!(count, 5, "category {}", category.name);
        }
    }

    #[test]
    fn test_short_category_is_padded() {
        let catalog = Catalog::categorized(vec![
            Category::new("tiny", &["a"]),
            Category::new("big", &["b", "c", "d", "e", "f", "g"]),
        ]);
        let mut rng = Pcg32::seed_from_u64(3);
        let grid = sample_grid(&catalog, 6, &mut rng);
        assert_eq!(grid.len(), 6);
        assert!(grid.contains(&Symbol::from("a")));
    }

    #[test]
    fn test_empty_catalog_gives_empty_grid() {
        let catalog = Catalog::flat(&[]);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(sample_grid(&catalog, 30, &mut rng).is_empty());
    }

    #[test]
    fn test_slot_lookup() {
        let grid = Grid::new(vec![Symbol::from("x"), Symbol::from("y")]);
        assert_eq!(grid.get(1), Some(&Symbol::from("y")));
        assert_eq!(grid.get(2), None);
        assert_eq!(grid.slot_of(&Symbol::from("x")), Some(0));
    }

    proptest! {
        #[test]
        fn prop_grid_size_constant_and_from_catalog(seed in any::<u64>(), size in 1usize..40) {
            let catalog = Catalog::themed();
            let mut rng = Pcg32::seed_from_u64(seed);
            let first = sample_grid(&catalog, size, &mut rng);
            let second = sample_grid(&catalog, size, &mut rng);
            prop_assert_eq!(first.len(), size);
            prop_assert_eq!(second.len(), size);
            let unique: HashSet<_> = first.symbols().iter().collect();
            prop_assert_eq!(unique.len(), size);
            prop_assert!(first.symbols().iter().all(|s| catalog.contains(s)));
        }
    }
}
