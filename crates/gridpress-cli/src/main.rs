//! Non-interactive front-end: builds one generation request from CLI args,
//! streams progress to stderr, and prints the completion payload as JSON on
//! stdout.

use clap::Parser;
use gridpress_core::{Difficulty, GridSize};
use gridpress_worker::{
    spawn, DifficultySection, GenerationConfig, WorkerRequest, WorkerResponse,
};

#[derive(Parser)]
#[command(
    name = "gridpress",
    about = "Generate batches of difficulty-calibrated number-grid puzzles"
)]
struct Args {
    /// Difficulty for single-mix runs: easy, medium, hard, expert
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Grid size: 4x4, 6x6, 9x9
    #[arg(long, default_value = "9x9")]
    grid_size: String,

    #[arg(long, default_value_t = 4)]
    puzzles_per_page: usize,

    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Attach difficulty-appropriate hints to each puzzle
    #[arg(long)]
    hints: bool,

    /// Mixed-difficulty sections like "easy:2,medium:3"; overrides
    /// --difficulty and --pages
    #[arg(long)]
    sections: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config = build_config(&args)?;
    let mut worker = spawn();
    worker
        .send(WorkerRequest::Generate { config })
        .await
        .map_err(|e| e.to_string())?;

    while let Some(msg) = worker.recv().await {
        match msg {
            WorkerResponse::Progress {
                progress,
                current_batch,
                total_batches,
            } => {
                eprintln!("batch {}/{} ({:.0}%)", current_batch, total_batches, progress);
            }
            WorkerResponse::Complete { .. } => {
                let json = serde_json::to_string_pretty(&msg).map_err(|e| e.to_string())?;
                println!("{}", json);
                worker.shutdown().await;
                return Ok(());
            }
            WorkerResponse::Error { error } => {
                worker.shutdown().await;
                return Err(error);
            }
        }
    }
    Err("worker stopped without a result".to_string())
}

fn build_config(args: &Args) -> Result<GenerationConfig, String> {
    let grid_size = parse_grid_size(&args.grid_size)?;
    let config = match &args.sections {
        Some(sections) => {
            GenerationConfig::multiple(parse_sections(sections)?, grid_size, args.puzzles_per_page)
        }
        None => GenerationConfig::single(
            parse_difficulty(&args.difficulty)?,
            grid_size,
            args.puzzles_per_page,
            args.pages,
        ),
    };
    Ok(if args.hints { config.with_hints() } else { config })
}

fn parse_difficulty(input: &str) -> Result<Difficulty, String> {
    match input.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        "expert" => Ok(Difficulty::Expert),
        other => Err(format!("unknown difficulty '{}'", other)),
    }
}

fn parse_grid_size(input: &str) -> Result<GridSize, String> {
    match input {
        "4x4" => Ok(GridSize::FourByFour),
        "6x6" => Ok(GridSize::SixBySix),
        "9x9" => Ok(GridSize::NineByNine),
        other => Err(format!("unknown grid size '{}'", other)),
    }
}

/// Parse "easy:2,medium:3" into ordered sections
fn parse_sections(input: &str) -> Result<Vec<DifficultySection>, String> {
    input.split(',')
        .map(|part| {
            let (name, count) = part
                .split_once(':')
                .ok_or_else(|| format!("section '{}' is not difficulty:count", part))?;
            Ok(DifficultySection {
                difficulty: parse_difficulty(name.trim())?,
                count: count
                    .trim()
                    .parse()
                    .map_err(|_| format!("section count '{}' is not a number", count))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let sections = parse_sections("easy:2, medium:3").unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].difficulty, Difficulty::Easy);
        assert_eq!(sections[0].count, 2);
        assert_eq!(sections[1].difficulty, Difficulty::Medium);
        assert_eq!(sections[1].count, 3);
    }

    #[test]
    fn test_parse_sections_rejects_garbage() {
        assert!(parse_sections("easy").is_err());
        assert!(parse_sections("easy:two").is_err());
        assert!(parse_sections("impossible:1").is_err());
    }

    #[test]
    fn test_parse_grid_size_is_strict() {
        assert_eq!(parse_grid_size("6x6").unwrap(), GridSize::SixBySix);
        assert!(parse_grid_size("16x16").is_err());
    }
}
