//! Difficulty-appropriate textual hints derived from a puzzle grid.

use crate::{Difficulty, Grid};

/// Build the hint list for a carved grid at the given difficulty.
///
/// Easy and medium hints point at concrete cells and boxes; hard and expert
/// tiers get fixed technique nudges instead of cell-level help.
pub fn build_hints(grid: &Grid, difficulty: Difficulty) -> Vec<String> {
    match difficulty {
        Difficulty::Easy => single_candidate_hints(grid),
        Difficulty::Medium => box_completion_hints(grid),
        Difficulty::Hard => vec![
            "Look for hidden pairs: two numbers confined to the same two cells of a row, \
             column, or box."
                .to_string(),
            "Scan for an X-Wing: one number restricted to the same two columns in exactly \
             two rows."
                .to_string(),
        ],
        Difficulty::Expert => vec![
            "Few givens remain, so chain techniques together and let each placement unlock \
             the next."
                .to_string(),
        ],
    }
}

/// One hint per empty cell that admits exactly one candidate
fn single_candidate_hints(grid: &Grid) -> Vec<String> {
    grid.empty_positions()
        .filter(|&(row, col)| grid.candidates(row, col).len() == 1)
        .map(|(row, col)| {
            format!(
                "Row {}, column {} has only one number that fits.",
                row + 1,
                col + 1
            )
        })
        .collect()
}

/// One hint per box that is missing exactly one value
fn box_completion_hints(grid: &Grid) -> Vec<String> {
    let n = grid.size();
    let b = grid.box_dim();
    let mut hints = Vec::new();

    for box_row in (0..n).step_by(b) {
        for box_col in (0..n).step_by(b) {
            let mut missing = 0;
            for row in box_row..(box_row + b).min(n) {
                for col in box_col..(box_col + b).min(n) {
                    if grid.is_empty_cell(row, col) {
                        missing += 1;
                    }
                }
            }
            if missing == 1 {
                hints.push(format!(
                    "The box starting at row {}, column {} needs just one more number.",
                    box_row + 1,
                    box_col + 1
                ));
            }
        }
    }
    hints
}
