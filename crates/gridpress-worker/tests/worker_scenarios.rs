//! End-to-end scenarios driven through the worker's message protocol.

use gridpress_core::{Difficulty, GridSize};
use gridpress_worker::{
    spawn, DifficultySection, GenerationConfig, WorkerHandle, WorkerRequest, WorkerResponse,
};

/// Collect the full response stream for one request: every progress
/// message plus the terminal completion or error.
async fn run_to_end(worker: &mut WorkerHandle, config: GenerationConfig) -> Vec<WorkerResponse> {
    worker
        .send(WorkerRequest::Generate { config })
        .await
        .expect("worker accepts request");

    let mut messages = Vec::new();
    while let Some(msg) = worker.recv().await {
        let terminal = matches!(
            msg,
            WorkerResponse::Complete { .. } | WorkerResponse::Error { .. }
        );
        messages.push(msg);
        if terminal {
            break;
        }
    }
    messages
}

fn assert_progress_contract(messages: &[WorkerResponse]) {
    let mut last_progress = 0.0;
    let mut last_batch = 0;
    for msg in &messages[..messages.len() - 1] {
        match msg {
            WorkerResponse::Progress {
                progress,
                current_batch,
                total_batches,
            } => {
                assert!(*progress >= last_progress, "progress decreased");
                assert!(*progress <= 100.0);
                assert!(*current_batch > last_batch, "batch order not increasing");
                assert!(*current_batch <= *total_batches);
                last_progress = *progress;
                last_batch = *current_batch;
            }
            other => panic!("non-progress message mid-stream: {:?}", other),
        }
    }
    assert_eq!(last_progress, 100.0, "final batch must report exactly 100");
}

#[tokio::test]
async fn single_difficulty_run_completes_with_requested_count() {
    // Scenario: easy 9x9, one puzzle per page, two pages.
    let mut worker = spawn();
    let config = GenerationConfig::single(Difficulty::Easy, GridSize::NineByNine, 1, 2);
    let messages = run_to_end(&mut worker, config).await;

    assert_progress_contract(&messages);
    match messages.last().unwrap() {
        WorkerResponse::Complete { puzzles, page_count } => {
            assert_eq!(puzzles.len(), 2);
            assert_eq!(*page_count, 2);
            for (position, item) in puzzles.iter().enumerate() {
                assert_eq!(item.puzzle_index, position);
                assert_eq!(item.section_index, 0);
                assert_eq!(item.difficulty_label, "Easy");
                assert!(item.puzzle.matches_dimension(9));
                assert!(item.puzzle.hints.is_none(), "hints not requested");
            }
        }
        other => panic!("expected completion, got {:?}", other),
    }
    worker.shutdown().await;
}

#[tokio::test]
async fn section_run_assigns_section_indices_in_order() {
    let mut worker = spawn();
    let config = GenerationConfig::multiple(
        vec![
            DifficultySection { difficulty: Difficulty::Easy, count: 1 },
            DifficultySection { difficulty: Difficulty::Medium, count: 1 },
        ],
        GridSize::NineByNine,
        1,
    );
    let messages = run_to_end(&mut worker, config).await;

    assert_progress_contract(&messages);
    match messages.last().unwrap() {
        WorkerResponse::Complete { puzzles, .. } => {
            assert_eq!(puzzles.len(), 2);
            assert_eq!(puzzles[0].section_index, 0);
            assert_eq!(puzzles[1].section_index, 1);
            assert_eq!(puzzles[0].difficulty_label, "Easy");
            assert_eq!(puzzles[1].difficulty_label, "Medium");
        }
        other => panic!("expected completion, got {:?}", other),
    }
    worker.shutdown().await;
}

#[tokio::test]
async fn oversized_request_is_clamped_to_the_ceiling() {
    // 100 pages of 3 asks for 300; the run is capped at 200 puzzles. Small
    // grids keep this scenario quick.
    let mut worker = spawn();
    let config = GenerationConfig::single(Difficulty::Easy, GridSize::FourByFour, 3, 100);
    let messages = run_to_end(&mut worker, config).await;

    assert_progress_contract(&messages);
    match messages.last().unwrap() {
        WorkerResponse::Complete { puzzles, page_count } => {
            assert_eq!(puzzles.len(), 200);
            assert_eq!(*page_count, 67);
        }
        other => panic!("expected completion, got {:?}", other),
    }
    worker.shutdown().await;
}

#[tokio::test]
async fn requested_hints_arrive_on_every_item() {
    let mut worker = spawn();
    let config =
        GenerationConfig::single(Difficulty::Hard, GridSize::FourByFour, 2, 1).with_hints();
    let messages = run_to_end(&mut worker, config).await;

    match messages.last().unwrap() {
        WorkerResponse::Complete { puzzles, .. } => {
            assert_eq!(puzzles.len(), 2);
            for item in puzzles {
                let hints = item.puzzle.hints.as_ref().expect("hints requested");
                assert!(!hints.is_empty());
            }
        }
        other => panic!("expected completion, got {:?}", other),
    }
    worker.shutdown().await;
}

#[tokio::test]
async fn back_to_back_requests_share_one_worker() {
    let mut worker = spawn();
    for _ in 0..2 {
        let config = GenerationConfig::single(Difficulty::Medium, GridSize::FourByFour, 1, 1);
        let messages = run_to_end(&mut worker, config).await;
        assert!(matches!(
            messages.last().unwrap(),
            WorkerResponse::Complete { .. }
        ));
    }
    worker.shutdown().await;
}
