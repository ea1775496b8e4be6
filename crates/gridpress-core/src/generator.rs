use crate::{hints, Difficulty, Grid, GridSize, Puzzle};

/// Carving accepts unconditionally once a grid is this sparse; probing
/// candidates across a wide-open grid costs more than it proves.
const UNIQUENESS_EMPTY_LIMIT: usize = 40;

/// How many empty cells (in scan order) the uniqueness probe inspects
const UNIQUENESS_PROBE_CELLS: usize = 3;

/// Puzzle generator: solved grids via randomized backtracking, then
/// difficulty-calibrated carving.
///
/// The shuffled candidate order inside the backtracking fill is the sole
/// source of variety; everything else is deterministic.
pub struct Generator {
    rng: Rng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Rng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Rng::seeded(seed),
        }
    }

    /// Generate a complete puzzle: solved grid, carved grid, and hints
    pub fn generate(&mut self, difficulty: Difficulty, size: GridSize) -> Puzzle {
        let solution = self.solved_grid(size);
        let grid = self.carve(&solution, difficulty);
        let hints = hints::build_hints(&grid, difficulty);
        Puzzle {
            grid,
            solution,
            hints: Some(hints),
            difficulty,
        }
    }

    /// Produce a fully solved grid where every row, column, and box holds
    /// each value exactly once
    pub fn solved_grid(&mut self, size: GridSize) -> Grid {
        let mut grid = Grid::empty(size.dimension());
        self.fill_from(&mut grid, 0);
        grid
    }

    // Recursive backtracking over one mutable buffer: set, recurse, and
    // zero the cell again on a dead end.
    fn fill_from(&mut self, grid: &mut Grid, start: usize) -> bool {
        let n = grid.size();
        let mut cell = start;
        while cell < n * n && grid.get(cell / n, cell % n) != 0 {
            cell += 1;
        }
        if cell == n * n {
            return true;
        }
        let (row, col) = (cell / n, cell % n);

        let mut values: Vec<u8> = (1..=n as u8).collect();
        self.rng.shuffle(&mut values);
        for value in values {
            if grid.is_valid_placement(row, col, value) {
                grid.set(row, col, value);
                if self.fill_from(grid, cell + 1) {
                    return true;
                }
                grid.set(row, col, 0);
            }
        }
        false
    }

    /// Clear cells from a solved grid until the difficulty's target count
    /// is reached or no candidate position survives the uniqueness probe
    pub fn carve(&mut self, solution: &Grid, difficulty: Difficulty) -> Grid {
        let n = solution.size();
        let target = ((n * n) as f64 * difficulty.removal_factor()).floor() as usize;

        let mut grid = solution.clone();
        let mut positions: Vec<(usize, usize)> = (0..n * n).map(|i| (i / n, i % n)).collect();
        self.rng.shuffle(&mut positions);

        let mut removed = 0;
        for (row, col) in positions {
            if removed >= target {
                break;
            }
            let value = grid.get(row, col);
            if value == 0 {
                continue;
            }
            grid.set(row, col, 0);
            if probe_still_determined(&grid) {
                removed += 1;
            } else {
                grid.set(row, col, value);
            }
        }
        grid
    }
}

/// Bounded uniqueness probe, deliberately approximate rather than a full
/// solver pass: past the sparsity limit everything is accepted, otherwise
/// the first few empty cells must each admit exactly one candidate. Puzzles
/// can therefore rarely admit more than one solution at high difficulties.
fn probe_still_determined(grid: &Grid) -> bool {
    if grid.empty_count() > UNIQUENESS_EMPTY_LIMIT {
        return true;
    }
    for (row, col) in grid.empty_positions().take(UNIQUENESS_PROBE_CELLS) {
        if grid.candidates(row, col).len() != 1 {
            return false;
        }
    }
    true
}

/// Small self-contained PRNG (xorshift64*), seeded from `getrandom`, so the
/// engine stays usable from WASM builds without a heavier dependency.
struct Rng {
    state: u64,
}

impl Rng {
    fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        if getrandom::getrandom(&mut bytes).is_err() {
            // Entropy source unavailable; fall back to a process-wide counter.
            use std::sync::atomic::{AtomicU64, Ordering};
            static FALLBACK: AtomicU64 = AtomicU64::new(0x9e37_79b9_7f4a_7c15);
            bytes = FALLBACK
                .fetch_add(0x6a09_e667_f3bc_c909, Ordering::Relaxed)
                .to_le_bytes();
        }
        Self::seeded(u64::from_le_bytes(bytes))
    }

    fn seeded(seed: u64) -> Self {
        // xorshift state must be non-zero
        Self { state: seed | 1 }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Fisher-Yates
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}
