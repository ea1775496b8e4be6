//! The concurrency core: turns one generation request into a stream of
//! progress messages and a final assembled puzzle list, recovering from
//! per-item failures along the way.

use gridpress_core::{Difficulty, Puzzle};
use tokio::sync::mpsc;
use tokio::task::yield_now;
use tracing::{info, warn};

use crate::cache::PuzzleCache;
use crate::error::WorkerError;
use crate::protocol::{BatchItem, DifficultyMix, GenerationConfig, WorkerResponse};

/// Hard safety ceiling on puzzles per run
pub const MAX_TOTAL_PUZZLES: usize = 200;

/// Cap on the buffer generated against invalid-puzzle discards
pub const MAX_EXTRA_PUZZLES: usize = 20;

/// Items per batch in single-difficulty mode
const BATCH_SIZE: usize = 50;

/// Items processed between voluntary yields within a batch
const YIELD_INTERVAL: usize = 5;

/// Derived counts for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    /// Requested puzzle count after the 200 ceiling
    pub total: usize,
    /// Buffer items generated beyond `total`: 10%, capped at 20
    pub extra: usize,
    pub page_count: usize,
}

/// Compute the clamped totals for a request
pub fn compute_totals(config: &GenerationConfig) -> RunTotals {
    let raw = match config.difficulty_mix {
        DifficultyMix::Single => config.puzzles_per_page * config.number_of_pages,
        DifficultyMix::Multiple => config.difficulty_sections.iter().map(|s| s.count).sum(),
    };
    let total = raw.min(MAX_TOTAL_PUZZLES);
    let extra = MAX_EXTRA_PUZZLES.min(total / 10);
    let page_count = total.div_ceil(config.puzzles_per_page);
    RunTotals {
        total,
        extra,
        page_count,
    }
}

/// Drives one generation run against a borrowed cache, emitting progress on
/// the response channel as each batch lands
pub struct Orchestrator<'a> {
    cache: &'a mut PuzzleCache,
    responses: &'a mpsc::Sender<WorkerResponse>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(cache: &'a mut PuzzleCache, responses: &'a mpsc::Sender<WorkerResponse>) -> Self {
        Self { cache, responses }
    }

    /// Run the request to completion, emitting progress along the way and
    /// the final `Complete` response at the end. Per-item failures are
    /// recovered internally; any error returned here ends the run.
    pub async fn run(&mut self, config: &GenerationConfig) -> Result<(), WorkerError> {
        config.validate()?;
        let totals = compute_totals(config);

        let items = match config.difficulty_mix {
            DifficultyMix::Single => self.generate_batches(config, totals).await?,
            DifficultyMix::Multiple => self.generate_sections(config, totals).await?,
        };

        let (puzzles, page_count) = assemble(items, config, totals)?;
        info!(
            puzzles = puzzles.len(),
            page_count,
            grid_size = %config.grid_size,
            "generation run complete"
        );
        self.responses
            .send(WorkerResponse::Complete { puzzles, page_count })
            .await?;
        Ok(())
    }

    /// Single-difficulty mode: fixed-size batches over the requested total
    /// plus the discard buffer
    async fn generate_batches(
        &mut self,
        config: &GenerationConfig,
        totals: RunTotals,
    ) -> Result<Vec<BatchItem>, WorkerError> {
        let item_total = totals.total + totals.extra;
        let total_batches = item_total.div_ceil(BATCH_SIZE);
        let mut items = Vec::with_capacity(item_total);

        for batch in 0..total_batches {
            let start = batch * BATCH_SIZE;
            let end = (start + BATCH_SIZE).min(item_total);
            for index in start..end {
                items.push(self.next_item(config, config.difficulty, 0, index));
                if (index - start + 1) % YIELD_INTERVAL == 0 {
                    yield_now().await;
                }
            }
            self.report_progress(end, totals.total, batch + 1, total_batches)
                .await?;
        }
        Ok(items)
    }

    /// Multiple mode: one batch per section, each capped so the running
    /// total never exceeds the clamped budget
    async fn generate_sections(
        &mut self,
        config: &GenerationConfig,
        totals: RunTotals,
    ) -> Result<Vec<BatchItem>, WorkerError> {
        let total_batches = config.difficulty_sections.len();
        let mut items = Vec::with_capacity(totals.total);
        let mut produced = 0;

        for (section_index, section) in config.difficulty_sections.iter().enumerate() {
            let quota = section.count.min(totals.total - produced);
            for offset in 0..quota {
                items.push(self.next_item(
                    config,
                    section.difficulty,
                    section_index,
                    produced + offset,
                ));
                if (offset + 1) % YIELD_INTERVAL == 0 {
                    yield_now().await;
                }
            }
            produced += quota;
            self.report_progress(produced, totals.total, section_index + 1, total_batches)
                .await?;
        }
        Ok(items)
    }

    /// Produce one item: cache fetch, one direct retry on a structurally
    /// invalid result, and finally a placeholder that keeps the sequence
    /// index intact
    fn next_item(
        &mut self,
        config: &GenerationConfig,
        difficulty: Difficulty,
        section_index: usize,
        puzzle_index: usize,
    ) -> BatchItem {
        let size = config.grid_size;
        let mut puzzle = self.cache.take(difficulty, size);
        if !puzzle.is_structurally_valid() {
            puzzle = self.cache.fresh(difficulty, size);
        }
        if !puzzle.is_structurally_valid() {
            warn!(
                %difficulty,
                %size,
                puzzle_index,
                "substituting placeholder after repeated invalid puzzles"
            );
            puzzle = Puzzle::placeholder(difficulty, size);
        }
        if !config.include_hints {
            puzzle.hints = None;
        }
        BatchItem {
            puzzle,
            section_index,
            puzzle_index,
            difficulty_label: difficulty.to_string(),
        }
    }

    async fn report_progress(
        &self,
        processed: usize,
        total: usize,
        current_batch: usize,
        total_batches: usize,
    ) -> Result<(), WorkerError> {
        // Buffer items can push `processed` past the requested total; the
        // reported value stays within 0..=100. A zero-total run (headed for
        // the exhaustion error) reports 0 rather than dividing by zero.
        let progress = if total == 0 {
            0.0
        } else {
            processed.min(total) as f64 / total as f64 * 100.0
        };
        self.responses
            .send(WorkerResponse::Progress {
                progress,
                current_batch,
                total_batches,
            })
            .await?;
        Ok(())
    }
}

/// Completion step: drop items whose grids don't match the requested shape,
/// trim the buffer overflow, and recompute the page count from what
/// actually survived
fn assemble(
    items: Vec<BatchItem>,
    config: &GenerationConfig,
    totals: RunTotals,
) -> Result<(Vec<BatchItem>, usize), WorkerError> {
    let n = config.grid_size.dimension();
    let mut puzzles: Vec<BatchItem> = items
        .into_iter()
        .filter(|item| item.puzzle.matches_dimension(n))
        .collect();
    if puzzles.is_empty() {
        return Err(WorkerError::NoValidPuzzles);
    }
    puzzles.truncate(totals.total);
    let page_count = puzzles.len().div_ceil(config.puzzles_per_page);
    Ok((puzzles, page_count))
}
