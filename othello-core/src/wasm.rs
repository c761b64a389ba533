//! WASM bindings for othello-core
//!
//! Provides a JavaScript-friendly API for the game engine. Players and cells
//! cross the boundary as numbers: 0 = empty, 1 = Black, 2 = White.

use wasm_bindgen::prelude::*;

use crate::{Cell, Game, Player, Pos};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

/// `SystemTime` is unavailable on wasm32-unknown-unknown; use `Date.now()`.
fn js_clock() -> u64 {
    date_now() as u64
}

fn cell_code(cell: Cell) -> u8 {
    match cell {
        Cell::Empty => 0,
        Cell::Black => 1,
        Cell::White => 2,
    }
}

/// Flatten positions to [row, col, row, col, ...].
fn flatten(positions: &[Pos]) -> Vec<u8> {
    positions
        .iter()
        .flat_map(|pos| [pos.row(), pos.col()])
        .collect()
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game in the starting position
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: Game::new().with_clock(js_clock),
        }
    }

    /// Cell contents: 0 (empty), 1 (Black), 2 (White). Off-board reads as 0.
    pub fn cell(&self, row: u8, col: u8) -> u8 {
        self.inner.cell(row, col).map(cell_code).unwrap_or(0)
    }

    /// Current player (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current_player() as u8
    }

    /// Check a move for player 1 or 2 without changing anything
    #[wasm_bindgen(js_name = isLegalMove)]
    pub fn is_legal_move(&self, row: u8, col: u8, player: u8) -> bool {
        Player::from_u8(player).is_some_and(|p| self.inner.is_legal_move(row, col, p))
    }

    /// Discs a move would flip as [row, col, row, col, ...]
    #[wasm_bindgen(js_name = capturedDiscs)]
    pub fn captured_discs(&self, row: u8, col: u8, player: u8) -> Vec<u8> {
        match Player::from_u8(player) {
            Some(p) => flatten(&self.inner.captured_discs(row, col, p)),
            None => vec![],
        }
    }

    /// Apply a move for the current player. Returns true if successful.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, row: u8, col: u8) -> bool {
        self.inner.apply_move(row, col).is_ok()
    }

    /// Disc counts as [black, white]
    pub fn score(&self) -> Vec<u8> {
        let score = self.inner.score();
        vec![score.black, score.white]
    }

    /// Check if game is over (neither player can move)
    #[wasm_bindgen(js_name = isTerminal)]
    pub fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    /// Final result as { winner: "black" | "white" | null, score: { black, white } },
    /// or undefined while the game is running
    pub fn outcome(&self) -> Result<JsValue, JsValue> {
        match self.inner.outcome() {
            Some(outcome) => serde_wasm_bindgen::to_value(&outcome).map_err(Into::into),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Restore the starting position
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Flip the hint flag, returning the new value
    #[wasm_bindgen(js_name = toggleHints)]
    pub fn toggle_hints(&mut self) -> bool {
        self.inner.toggle_hints()
    }

    /// Cells to highlight as [row, col, row, col, ...]
    pub fn hints(&self) -> Vec<u8> {
        flatten(&self.inner.hint_moves())
    }

    /// Live pass message, e.g. "White passes"
    pub fn notice(&self) -> Option<String> {
        self.inner.notice().map(|n| n.message())
    }

    /// Whole-game snapshot for a full redraw
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(Into::into)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
