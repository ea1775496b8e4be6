use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a nested-array grid fails validation on deserialization
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid rows must form a {expected}x{expected} square, got a row of length {found}")]
    NotSquare { expected: usize, found: usize },
    #[error("cell value {value} is out of range for a {size}x{size} grid")]
    ValueOutOfRange { value: u8, size: usize },
}

/// An N×N puzzle grid. 0 marks an empty cell, 1..=N a filled one.
///
/// Cells are stored flat in row-major order; the wire format is the nested
/// `Vec<Vec<u8>>` the message protocol expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u8>>", try_from = "Vec<Vec<u8>>")]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create an all-empty grid of the given side length
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Box (sub-grid) side length: `sqrt(size)` truncated to an integer.
    ///
    /// For 4 and 9 this is the conventional box edge. For 6 it truncates to
    /// 2, so the box constraint scans 2x2 blocks rather than the 2x3
    /// regions a conventional 6x6 puzzle would use. Kept as observed
    /// behavior pending a product decision.
    pub fn box_dim(&self) -> usize {
        (self.size as f64).sqrt() as usize
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * self.size + col] = value;
    }

    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 0
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn is_all_zero(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// Empty cell coordinates in row-major scan order
    pub fn empty_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(move |(i, _)| (i / size, i % size))
    }

    /// Whether `value` can go at (row, col) without repeating in the cell's
    /// row, column, or box
    pub fn is_valid_placement(&self, row: usize, col: usize, value: u8) -> bool {
        for i in 0..self.size {
            if self.get(row, i) == value || self.get(i, col) == value {
                return false;
            }
        }
        let b = self.box_dim();
        let box_row = (row / b) * b;
        let box_col = (col / b) * b;
        for r in box_row..(box_row + b).min(self.size) {
            for c in box_col..(box_col + b).min(self.size) {
                if self.get(r, c) == value {
                    return false;
                }
            }
        }
        true
    }

    /// Values of `1..=size` locally valid at an empty cell
    pub fn candidates(&self, row: usize, col: usize) -> Vec<u8> {
        (1..=self.size as u8)
            .filter(|&v| self.is_valid_placement(row, col, v))
            .collect()
    }

    /// Row slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(<[u8]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in &rows {
            if row.len() != size {
                return Err(GridError::NotSquare {
                    expected: size,
                    found: row.len(),
                });
            }
            for &value in row {
                if value as usize > size {
                    return Err(GridError::ValueOutOfRange { value, size });
                }
                cells.push(value);
            }
        }
        Ok(Self { size, cells })
    }
}
