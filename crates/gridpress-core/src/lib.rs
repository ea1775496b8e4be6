//! Core number-grid puzzle engine.
//!
//! This crate produces fully solved grids via randomized backtracking,
//! carves them down to a difficulty-calibrated puzzle, and derives textual
//! hints from the result. It is pure computation: no I/O, no async, no
//! logging. The batch worker built on top lives in `gridpress-worker`.

use serde::{Deserialize, Serialize};

mod generator;
mod grid;
pub mod hints;

pub use generator::Generator;
pub use grid::{Grid, GridError};

/// Difficulty tier controlling how many cells are carved out of a solved grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Fraction of cells removed from the solution at this tier
    pub fn removal_factor(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.40,
            Difficulty::Medium => 0.50,
            Difficulty::Hard => 0.60,
            Difficulty::Expert => 0.75,
        }
    }

    /// Wire name, also used as the cache pool key component
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// All tiers, easiest first
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Expert => write!(f, "Expert"),
        }
    }
}

/// Supported grid sizes, named by their wire labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    #[serde(rename = "4x4")]
    FourByFour,
    #[serde(rename = "6x6")]
    SixBySix,
    #[serde(rename = "9x9")]
    NineByNine,
}

impl GridSize {
    /// Side length of the square grid
    pub fn dimension(&self) -> usize {
        match self {
            GridSize::FourByFour => 4,
            GridSize::SixBySix => 6,
            GridSize::NineByNine => 9,
        }
    }

    /// Wire label, also used as the cache pool key component
    pub fn as_str(&self) -> &'static str {
        match self {
            GridSize::FourByFour => "4x4",
            GridSize::SixBySix => "6x6",
            GridSize::NineByNine => "9x9",
        }
    }

    pub fn all() -> &'static [GridSize] {
        &[GridSize::FourByFour, GridSize::SixBySix, GridSize::NineByNine]
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A carved puzzle grid together with its solution and optional hints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub grid: Grid,
    pub solution: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub hints: Option<Vec<String>>,
    pub difficulty: Difficulty,
}

impl Puzzle {
    /// All-zero stand-in of the correct shape, substituted when generation
    /// repeatedly fails so positional ordering survives
    pub fn placeholder(difficulty: Difficulty, size: GridSize) -> Self {
        let n = size.dimension();
        Self {
            grid: Grid::empty(n),
            solution: Grid::empty(n),
            hints: None,
            difficulty,
        }
    }

    /// Whether this puzzle is usable: grids of matching shape and a
    /// solution that actually contains numbers. Placeholders fail this.
    pub fn is_structurally_valid(&self) -> bool {
        self.grid.size() == self.solution.size()
            && self.grid.size() > 0
            && !self.grid.is_all_zero()
            && !self.solution.is_all_zero()
    }

    /// Shape check alone; all-zero placeholder grids pass
    pub fn matches_dimension(&self, n: usize) -> bool {
        self.grid.size() == n && self.solution.size() == n
    }
}
