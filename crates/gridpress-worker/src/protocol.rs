//! Wire types for the request/response channel between a caller and the
//! worker task. JSON layout is tagged by `type` with camelCase fields.

use gridpress_core::{Difficulty, GridSize, Puzzle};
use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

/// Whether a run uses one difficulty throughout or an ordered section list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyMix {
    Single,
    Multiple,
}

/// One difficulty section of a mixed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySection {
    pub difficulty: Difficulty,
    pub count: usize,
}

/// A complete generation request, constructed once by the caller and
/// read-only for the lifetime of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub difficulty_mix: DifficultyMix,
    /// Used when `difficulty_mix` is single
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    pub grid_size: GridSize,
    /// Used when `difficulty_mix` is multiple, in order
    #[serde(default)]
    pub difficulty_sections: Vec<DifficultySection>,
    #[serde(default)]
    pub include_hints: bool,
    pub puzzles_per_page: usize,
    pub number_of_pages: usize,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl GenerationConfig {
    /// Single-difficulty request
    pub fn single(
        difficulty: Difficulty,
        grid_size: GridSize,
        puzzles_per_page: usize,
        number_of_pages: usize,
    ) -> Self {
        Self {
            difficulty_mix: DifficultyMix::Single,
            difficulty,
            grid_size,
            difficulty_sections: Vec::new(),
            include_hints: false,
            puzzles_per_page,
            number_of_pages,
        }
    }

    /// Mixed-difficulty request with ordered sections
    pub fn multiple(
        sections: Vec<DifficultySection>,
        grid_size: GridSize,
        puzzles_per_page: usize,
    ) -> Self {
        Self {
            difficulty_mix: DifficultyMix::Multiple,
            difficulty: default_difficulty(),
            grid_size,
            difficulty_sections: sections,
            include_hints: false,
            puzzles_per_page,
            number_of_pages: 1,
        }
    }

    pub fn with_hints(mut self) -> Self {
        self.include_hints = true;
        self
    }

    pub fn validate(&self) -> Result<(), WorkerError> {
        if self.puzzles_per_page == 0 {
            return Err(WorkerError::InvalidConfig(
                "puzzlesPerPage must be at least 1".to_string(),
            ));
        }
        match self.difficulty_mix {
            DifficultyMix::Single => {
                if self.number_of_pages == 0 {
                    return Err(WorkerError::InvalidConfig(
                        "numberOfPages must be at least 1".to_string(),
                    ));
                }
            }
            DifficultyMix::Multiple => {
                if self.difficulty_sections.is_empty() {
                    return Err(WorkerError::InvalidConfig(
                        "difficultySections must not be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A generated puzzle with its position in the overall request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    #[serde(flatten)]
    pub puzzle: Puzzle,
    pub section_index: usize,
    /// Global position across the whole run
    pub puzzle_index: usize,
    /// Human-readable difficulty ("Easy", ...)
    pub difficulty_label: String,
}

/// Inbound messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerRequest {
    Generate { config: GenerationConfig },
}

/// Outbound messages. For a successful run the stream is zero or more
/// `Progress` messages in increasing batch order followed by one
/// `Complete`; an `Error` terminates the run with nothing after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WorkerResponse {
    Progress {
        /// 0..=100, monotonically non-decreasing within a run
        progress: f64,
        current_batch: usize,
        total_batches: usize,
    },
    Complete {
        puzzles: Vec<BatchItem>,
        page_count: usize,
    },
    Error {
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_parses_protocol_json() {
        let json = r#"{
            "type": "generate",
            "config": {
                "difficultyMix": "single",
                "difficulty": "easy",
                "gridSize": "9x9",
                "includeHints": true,
                "puzzlesPerPage": 4,
                "numberOfPages": 2
            }
        }"#;
        let request: WorkerRequest = serde_json::from_str(json).unwrap();
        let WorkerRequest::Generate { config } = request;
        assert_eq!(config.difficulty_mix, DifficultyMix::Single);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.grid_size, GridSize::NineByNine);
        assert!(config.include_hints);
        assert!(config.difficulty_sections.is_empty());
        assert_eq!(config.puzzles_per_page, 4);
        assert_eq!(config.number_of_pages, 2);
    }

    #[test]
    fn test_multiple_mode_sections_parse_in_order() {
        let json = r#"{
            "difficultyMix": "multiple",
            "gridSize": "6x6",
            "difficultySections": [
                {"difficulty": "easy", "count": 2},
                {"difficulty": "expert", "count": 1}
            ],
            "puzzlesPerPage": 1,
            "numberOfPages": 1
        }"#;
        let config: GenerationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.difficulty, Difficulty::Medium); // default when absent
        assert_eq!(config.difficulty_sections.len(), 2);
        assert_eq!(config.difficulty_sections[0].difficulty, Difficulty::Easy);
        assert_eq!(config.difficulty_sections[1].count, 1);
    }

    #[test]
    fn test_progress_serializes_camel_case() {
        let response = WorkerResponse::Progress {
            progress: 50.0,
            current_batch: 1,
            total_batches: 2,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["progress"], 50.0);
        assert_eq!(json["currentBatch"], 1);
        assert_eq!(json["totalBatches"], 2);
    }

    #[test]
    fn test_complete_carries_flattened_items() {
        let puzzle = Puzzle::placeholder(Difficulty::Easy, GridSize::FourByFour);
        let response = WorkerResponse::Complete {
            puzzles: vec![BatchItem {
                puzzle,
                section_index: 0,
                puzzle_index: 3,
                difficulty_label: "Easy".to_string(),
            }],
            page_count: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "complete");
        assert_eq!(json["pageCount"], 1);
        let item = &json["puzzles"][0];
        assert_eq!(item["puzzleIndex"], 3);
        assert_eq!(item["sectionIndex"], 0);
        assert_eq!(item["difficultyLabel"], "Easy");
        assert!(item["grid"].is_array()); // flattened puzzle fields
    }

    #[test]
    fn test_error_response_shape() {
        let response = WorkerResponse::Error {
            error: "no valid puzzles generated".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"], "no valid puzzles generated");
    }

    #[test]
    fn test_validate_rejects_zero_page_capacity() {
        let config = GenerationConfig::single(Difficulty::Easy, GridSize::NineByNine, 0, 1);
        assert!(matches!(
            config.validate(),
            Err(WorkerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_section_list() {
        let config = GenerationConfig::multiple(Vec::new(), GridSize::NineByNine, 1);
        assert!(matches!(
            config.validate(),
            Err(WorkerError::InvalidConfig(_))
        ));
    }
}
