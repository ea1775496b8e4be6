//! Per-(difficulty, size) pools of pre-generated puzzles.
//!
//! The cache is an explicit instance owned by the worker task — one logical
//! writer, no locking. Pools are warmed opportunistically between requests
//! and drained on demand; an empty pool just means generating fresh.

use std::collections::HashMap;

use gridpress_core::{Difficulty, Generator, GridSize, Puzzle};
use tracing::debug;

/// Pool size the warm-up pass aims for per combination
const WARM_POOL_TARGET: usize = 10;

/// Combinations the warm-up pass pre-populates: every tier at the common
/// size
const WARM_COMBOS: &[(Difficulty, GridSize)] = &[
    (Difficulty::Easy, GridSize::NineByNine),
    (Difficulty::Medium, GridSize::NineByNine),
    (Difficulty::Hard, GridSize::NineByNine),
    (Difficulty::Expert, GridSize::NineByNine),
];

/// Attempts to obtain a structurally valid puzzle before the unconditional
/// fallback
const FETCH_ATTEMPTS: usize = 3;

pub struct PuzzleCache {
    pools: HashMap<String, Vec<Puzzle>>,
    generator: Generator,
}

impl Default for PuzzleCache {
    fn default() -> Self {
        Self::new()
    }
}

fn pool_key(difficulty: Difficulty, size: GridSize) -> String {
    format!("{}-{}", difficulty.as_str(), size.as_str())
}

impl PuzzleCache {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            generator: Generator::new(),
        }
    }

    /// Cache backed by a seeded generator, for reproducible tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pools: HashMap::new(),
            generator: Generator::with_seed(seed),
        }
    }

    /// Pop a cached puzzle for this combination, or generate fresh.
    ///
    /// Up to three attempts to come up with a structurally valid puzzle;
    /// after that one more puzzle is generated and returned as-is. That
    /// last step is best-effort by design, not a validity guarantee.
    pub fn take(&mut self, difficulty: Difficulty, size: GridSize) -> Puzzle {
        let key = pool_key(difficulty, size);
        for attempt in 0..FETCH_ATTEMPTS {
            let puzzle = match self.pools.get_mut(&key).and_then(|pool| pool.pop()) {
                Some(pooled) => {
                    debug!(%key, "cache hit");
                    pooled
                }
                None => self.generator.generate(difficulty, size),
            };
            if puzzle.is_structurally_valid() {
                return puzzle;
            }
            debug!(%key, attempt, "discarding structurally invalid puzzle");
        }
        self.generator.generate(difficulty, size)
    }

    /// Direct generator call, bypassing the pools — the orchestrator's
    /// per-item retry path
    pub fn fresh(&mut self, difficulty: Difficulty, size: GridSize) -> Puzzle {
        self.generator.generate(difficulty, size)
    }

    /// Generate one puzzle toward the warm-up targets. Returns `false` once
    /// every warm pool is full. The caller is expected to yield between
    /// steps so warm-up never monopolizes the task.
    pub fn warm_step(&mut self) -> bool {
        for &(difficulty, size) in WARM_COMBOS {
            let key = pool_key(difficulty, size);
            let pool = self.pools.entry(key.clone()).or_default();
            if pool.len() < WARM_POOL_TARGET {
                let puzzle = self.generator.generate(difficulty, size);
                pool.push(puzzle);
                debug!(%key, pooled = pool.len(), "warmed cache entry");
                return true;
            }
        }
        false
    }

    /// Whether every warm-up combination is at its target pool size
    pub fn is_warm(&self) -> bool {
        WARM_COMBOS.iter().all(|&(difficulty, size)| {
            self.pools
                .get(&pool_key(difficulty, size))
                .map(|pool| pool.len() >= WARM_POOL_TARGET)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_on_cold_cache_generates() {
        // Cache exhaustion must fall through to fresh generation, never
        // panic or return junk.
        let mut cache = PuzzleCache::with_seed(8);
        let puzzle = cache.take(Difficulty::Easy, GridSize::FourByFour);
        assert!(puzzle.is_structurally_valid());
        assert_eq!(puzzle.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_take_prefers_pooled_puzzles() {
        let mut cache = PuzzleCache::with_seed(8);
        let key = pool_key(Difficulty::Medium, GridSize::NineByNine);
        let pooled = cache.fresh(Difficulty::Medium, GridSize::NineByNine);
        cache.pools.insert(key.clone(), vec![pooled.clone()]);

        let taken = cache.take(Difficulty::Medium, GridSize::NineByNine);
        assert_eq!(taken.solution, pooled.solution);
        assert!(cache.pools[&key].is_empty());
    }

    #[test]
    fn test_invalid_pooled_puzzles_are_discarded() {
        let mut cache = PuzzleCache::with_seed(8);
        let key = pool_key(Difficulty::Hard, GridSize::NineByNine);
        let junk = Puzzle::placeholder(Difficulty::Hard, GridSize::NineByNine);
        cache.pools.insert(key.clone(), vec![junk.clone(), junk.clone(), junk]);

        let taken = cache.take(Difficulty::Hard, GridSize::NineByNine);
        assert!(taken.is_structurally_valid());
        assert!(cache.pools[&key].is_empty());
    }

    #[test]
    fn test_warm_step_fills_every_combo_then_stops() {
        let mut cache = PuzzleCache::with_seed(8);
        assert!(!cache.is_warm());

        let mut steps = 0;
        while cache.warm_step() {
            steps += 1;
            assert!(steps <= WARM_COMBOS.len() * WARM_POOL_TARGET, "warm-up never finished");
        }
        assert_eq!(steps, WARM_COMBOS.len() * WARM_POOL_TARGET);
        assert!(cache.is_warm());
        assert!(!cache.warm_step());
    }
}
