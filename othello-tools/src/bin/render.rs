//! Render board states to SVG.
//!
//! Usage:
//!   # Single position from a transcript
//!   cargo run --release --bin render -- --moves "d3 c5 f6" -o board.svg
//!
//!   # Batch render all positions in a game
//!   cargo run --release --bin render -- --game "d3 c5 f6 ..." --output-dir ./frames/
//!
//!   # From a board file (8 lines of B/W/., optional side-to-move line)
//!   cargo run --release --bin render -- --position board.txt -o board.svg

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use othello_core::{Game, ReplayError};
use othello_tools::svg::{render_board_svg, RenderOptions};
use othello_tools::{parse_position, ToolError};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  render --moves \"d3 c5 ...\" -o board.svg");
    eprintln!("  render --game \"d3 c5 ...\" --output-dir ./frames/");
    eprintln!("  render --position <file> -o board.svg");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --moves <notation>     Render board after playing moves");
    eprintln!("  --game <notation>      Render all positions in a game");
    eprintln!("  --position <file>      Render board from a board file");
    eprintln!("  -o, --output <file>    Output file (default: board.svg)");
    eprintln!("  --output-dir <dir>     Output directory for batch mode");
    eprintln!("  --hints                Mark legal moves for the side to move");
    eprintln!("  --highlight-last       Outline the last move");
    eprintln!("  --score                Include the score panel");
    eprintln!("  --scale <float>        Scale factor (default: 1.0)");
}

/// Per-frame options for the current game state.
fn frame_options(game: &Game, base: &RenderOptions, hints: bool, score: bool) -> RenderOptions {
    RenderOptions {
        hints: if hints && !game.is_terminal() {
            game.legal_moves(game.current_player())
        } else {
            Vec::new()
        },
        score_for: score.then(|| game.current_player()),
        ..base.clone()
    }
}

fn write_svg(path: &Path, svg: &str) -> Result<(), ToolError> {
    fs::write(path, svg).map_err(|e| ToolError::io(path, e))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run(args: &[String]) -> Result<(), ToolError> {
    if args.len() < 2 {
        return Err(ToolError::Usage("specify --moves, --game, or --position".into()));
    }

    let mut moves_str: Option<String> = None;
    let mut game_str: Option<String> = None;
    let mut position: Option<String> = None;
    let mut output: Option<String> = None;
    let mut output_dir: Option<String> = None;
    let mut hints = false;
    let mut highlight_last = false;
    let mut score = false;
    let mut opts = RenderOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--moves" => {
                i += 1;
                moves_str = Some(args.get(i).cloned().unwrap_or_default());
            }
            "--game" => {
                i += 1;
                game_str = Some(args.get(i).cloned().unwrap_or_default());
            }
            "--position" => {
                i += 1;
                position = args.get(i).cloned();
            }
            "-o" | "--output" => {
                i += 1;
                output = args.get(i).cloned();
            }
            "--output-dir" => {
                i += 1;
                output_dir = args.get(i).cloned();
            }
            "--hints" => hints = true,
            "--highlight-last" => highlight_last = true,
            "--score" => score = true,
            "--scale" => {
                i += 1;
                opts.scale = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1.0);
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(ToolError::Usage(format!("Unknown argument: {other}"))),
        }
        i += 1;
    }

    // Batch mode: render all positions in a game
    if let Some(transcript) = game_str {
        let dir = output_dir.unwrap_or_else(|| ".".to_string());
        fs::create_dir_all(&dir).map_err(|e| ToolError::io(&dir, e))?;

        let mut game = Game::new();
        let svg = render_board_svg(game.board(), &frame_options(&game, &opts, hints, score));
        write_svg(&Path::new(&dir).join("move-00.svg"), &svg)?;

        let mut frames = 1;
        for (i, token) in transcript.split_whitespace().enumerate() {
            let index = i + 1;
            let pos = token
                .parse()
                .map_err(|source| ReplayError::Parse { index, source })?;
            game.play(pos).map_err(|source| ReplayError::Illegal {
                index,
                notation: token.to_string(),
                source,
            })?;

            let base = RenderOptions {
                highlight_cell: Some(pos),
                ..opts.clone()
            };
            let svg = render_board_svg(game.board(), &frame_options(&game, &base, hints, score));
            write_svg(&Path::new(&dir).join(format!("move-{index:02}.svg")), &svg)?;
            frames += 1;
        }

        if let Some(outcome) = game.outcome() {
            println!("{outcome}");
        }
        println!("\nRendered {frames} frames");
        return Ok(());
    }

    // Single position mode
    let game = if let Some(transcript) = moves_str {
        let game = Game::replay(&transcript)?;
        if highlight_last {
            opts.highlight_cell = transcript
                .split_whitespace()
                .last()
                .and_then(|token| token.parse().ok());
        }
        game
    } else if let Some(path) = position {
        let text = fs::read_to_string(&path).map_err(|e| ToolError::io(&path, e))?;
        let (board, to_move) = parse_position(&text)?;
        Game::from_position(board, to_move)
    } else {
        return Err(ToolError::Usage("specify --moves, --game, or --position".into()));
    };

    let svg = render_board_svg(game.board(), &frame_options(&game, &opts, hints, score));
    let out_path = output.unwrap_or_else(|| "board.svg".to_string());
    write_svg(Path::new(&out_path), &svg)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, ToolError::Usage(_)) {
                print_usage();
            }
            ExitCode::FAILURE
        }
    }
}
