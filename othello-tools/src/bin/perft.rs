//! Count the legal-move tree from the starting position (or a position file)
//! to verify the move generator.
//!
//! Usage:
//!   cargo run --release --bin perft -- --depth 8
//!   cargo run --release --bin perft -- --depth 6 --unique
//!   cargo run --release --bin perft -- --depth 6 --position board.txt

use std::env;
use std::fs;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::warn;
use othello_core::{Board, Player};
use othello_tools::perft::{Perft, PerftResult};
use othello_tools::{parse_position, ToolError};

/// Statistics for logging.
struct Stats {
    start_time: Instant,
    last_log_time: Instant,
    last_log_nodes: u64,
}

impl Stats {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            last_log_nodes: 0,
        }
    }

    fn log_progress(&mut self, result: &PerftResult, depth: usize) {
        let elapsed_total = self.start_time.elapsed().as_secs();
        let elapsed_since_log = self.last_log_time.elapsed().as_secs_f64();

        let rate = if elapsed_since_log > 0.0 {
            (result.nodes - self.last_log_nodes) as f64 / elapsed_since_log
        } else {
            0.0
        };

        println!(
            "[{:02}:{:02}:{:02}] nodes={} leaves={} rate={:.0}/s depth={} passes={} terminals={}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            result.nodes,
            result.leaves,
            rate,
            depth,
            result.passes,
            result.terminals,
        );

        self.last_log_time = Instant::now();
        self.last_log_nodes = result.nodes;
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  perft --depth <n> [--unique] [--position <file>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --depth <n>            Plies to search (default: 6)");
    eprintln!("  --unique               Also count distinct positions per ply");
    eprintln!("  --position <file>      Start from a board file instead of the opening");
}

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Options {
    depth: usize,
    unique: bool,
    position: Option<String>,
}

/// `None` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>, ToolError> {
    let mut opts = Options {
        depth: 6,
        unique: false,
        position: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" => {
                i += 1;
                opts.depth = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ToolError::Usage("--depth needs a number".into()))?;
            }
            "--unique" => opts.unique = true,
            "--position" => {
                i += 1;
                let path = args
                    .get(i)
                    .cloned()
                    .ok_or_else(|| ToolError::Usage("--position needs a file".into()))?;
                opts.position = Some(path);
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(ToolError::Usage(format!("Unknown argument: {other}"))),
        }
        i += 1;
    }
    Ok(Some(opts))
}

fn run(args: &[String]) -> Result<(), ToolError> {
    let Some(Options {
        depth,
        unique,
        position,
    }) = parse_args(args)?
    else {
        print_usage();
        return Ok(());
    };

    let (root, to_move) = match position {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| ToolError::io(&path, e))?;
            parse_position(&text)?
        }
        None => (Board::new(), Player::Black),
    };

    println!("Othello Perft");
    println!("=============");
    println!("Depth {depth}, {to_move} to move");
    println!();

    // Set up SIGINT handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, stopping...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let log_interval_secs = 5;
    let mut stats = Stats::new();

    let result = Perft::new(depth)
        .with_unique(unique)
        .run(root, to_move, &running, |partial, stack_depth| {
            if stats.last_log_time.elapsed().as_secs() >= log_interval_secs {
                stats.log_progress(partial, stack_depth);
            }
        });

    if !result.complete {
        warn!("search interrupted; counts below are partial");
    }

    println!("\n=============");
    println!("Leaves: {}", result.leaves);
    println!("Nodes: {}", result.nodes);
    println!("Passes: {}", result.passes);
    println!("Terminals: {}", result.terminals);
    for (ply, count) in result.unique.iter().enumerate() {
        println!("Unique at ply {}: {}", ply + 1, count);
    }
    println!("Total time: {:.1}s", stats.start_time.elapsed().as_secs_f64());
    Ok(())
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
