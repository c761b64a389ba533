//! Count the legal-move tree to a fixed depth.
//!
//! - A side with no move but whose opponent can move passes; the pass is one
//!   ply with a single child
//! - A position where neither side can move is a leaf at whatever depth it
//!   occurs
//! - Transpositions are NOT merged in the leaf count; `unique` additionally
//!   counts distinct positions per ply by xxh64 hash

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use othello_core::{Board, Player, Pos};
use xxhash_rust::xxh64::xxh64;

/// Nodes between progress callbacks.
pub const TICK_NODES: u64 = 1 << 16;

/// Stack frame for iterative DFS.
struct Frame {
    /// Child positions, each with its side to move
    children: Vec<(Board, Player)>,
    /// Index of next child to explore
    next: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerftResult {
    /// Positions at the target depth plus games that ended before it
    pub leaves: u64,
    /// Nodes visited below the root
    pub nodes: u64,
    /// Forced passes expanded
    pub passes: u64,
    /// Games that ended before the target depth
    pub terminals: u64,
    /// Distinct positions per ply (index 0 = ply 1); empty unless requested
    pub unique: Vec<usize>,
    /// False if the run was interrupted
    pub complete: bool,
}

/// Hash of a position including the side to move.
pub fn position_hash(board: &Board, to_move: Player) -> u64 {
    let (black, white) = board.masks();
    let mut bytes = [0u8; 17];
    bytes[..8].copy_from_slice(&black.to_le_bytes());
    bytes[8..16].copy_from_slice(&white.to_le_bytes());
    bytes[16] = to_move as u8;
    xxh64(&bytes, 0)
}

/// Positions reachable in one ply. Empty when the game is over.
fn expand(board: &Board, to_move: Player, passes: &mut u64) -> Vec<(Board, Player)> {
    let legal = board.legal_mask(to_move);
    if legal != 0 {
        return Pos::in_mask(legal)
            .filter_map(|pos| {
                let mut child = *board;
                child
                    .play(pos, to_move)
                    .ok()
                    .map(|_| (child, to_move.opponent()))
            })
            .collect();
    }

    let opponent = to_move.opponent();
    if board.has_legal_move(opponent) {
        *passes += 1;
        vec![(*board, opponent)]
    } else {
        vec![]
    }
}

/// Counter configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Perft {
    pub depth: usize,
    pub unique: bool,
}

impl Perft {
    pub fn new(depth: usize) -> Self {
        Perft {
            depth,
            unique: false,
        }
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Count from `root` without interruption or progress output.
    pub fn count(&self, root: Board, to_move: Player) -> PerftResult {
        self.run(root, to_move, &AtomicBool::new(true), |_, _| {})
    }

    /// Count from `root`, stopping early once `running` goes false.
    ///
    /// `on_tick` is called every [`TICK_NODES`] nodes with the partial result
    /// and the current stack depth.
    pub fn run(
        &self,
        root: Board,
        to_move: Player,
        running: &AtomicBool,
        mut on_tick: impl FnMut(&PerftResult, usize),
    ) -> PerftResult {
        let mut result = PerftResult {
            complete: true,
            ..PerftResult::default()
        };
        let mut seen: Vec<HashSet<u64>> = if self.unique {
            vec![HashSet::new(); self.depth]
        } else {
            vec![]
        };

        if self.depth == 0 {
            result.leaves = 1;
            return result;
        }

        let children = expand(&root, to_move, &mut result.passes);
        if children.is_empty() {
            result.terminals = 1;
            result.leaves = 1;
            return result;
        }
        let mut stack = vec![Frame { children, next: 0 }];

        while let Some(frame) = stack.last_mut() {
            if !running.load(Ordering::SeqCst) {
                debug!("perft interrupted at {} nodes", result.nodes);
                result.complete = false;
                break;
            }

            if frame.next == frame.children.len() {
                stack.pop();
                continue;
            }
            let (board, player) = frame.children[frame.next];
            frame.next += 1;

            // Ply of this child (1-based)
            let ply = stack.len();
            result.nodes += 1;
            if result.nodes % TICK_NODES == 0 {
                on_tick(&result, ply);
            }
            if let Some(set) = seen.get_mut(ply - 1) {
                set.insert(position_hash(&board, player));
            }

            if ply == self.depth {
                result.leaves += 1;
                continue;
            }

            let children = expand(&board, player, &mut result.passes);
            if children.is_empty() {
                result.terminals += 1;
                result.leaves += 1;
                continue;
            }
            stack.push(Frame { children, next: 0 });
        }

        result.unique = seen.iter().map(HashSet::len).collect();
        result
    }
}
