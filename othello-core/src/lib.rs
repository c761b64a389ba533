//! Othello (Reversi) rules engine with bit-based board representation.
//!
//! # Board Encoding (2 × 64-bit)
//!
//! ```text
//! black: u64   bit i set => Black disc on cell i
//! white: u64   bit i set => White disc on cell i
//!
//! The two masks never share a bit. Cell indices are row-major:
//!   (0,0)=0   (0,1)=1  ...  (0,7)=7
//!   (1,0)=8   (1,1)=9  ...  (1,7)=15
//!   ...
//!   (7,0)=56  (7,1)=57 ...  (7,7)=63
//! ```
//!
//! Iterating the set bits of a mask from least to most significant therefore
//! visits cells in row-major order.
//!
//! # Notation
//!
//! Squares print as `a1`..`h8`: column letter `a`-`h`, row digit `1`-`8`,
//! with `a1` = (0,0). See [`notation`].

use serde::{Deserialize, Serialize};

pub mod error;
pub mod game;
pub mod notation;
pub mod observer;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{MoveError, ParseError, ReplayError};
pub use game::{Game, MoveRecord, Notice, Outcome, TurnChange, PASS_NOTICE_TTL_MS};
pub use notation::{format_transcript, parse_transcript};
pub use observer::{GameEvent, GameObserver, ObservedGame, Snapshot};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Side length of the board.
pub const SIZE: u8 = 8;
/// Number of cells on the board.
pub const CELLS: usize = (SIZE as usize) * (SIZE as usize);

/// The eight compass directions as (row delta, col delta).
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Player {
    Black = 1,
    White = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_u8(value: u8) -> Option<Player> {
        match value {
            1 => Some(Player::Black),
            2 => Some(Player::White),
            _ => None,
        }
    }

    /// Both players, Black first.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::Black, Player::White].into_iter()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Black => f.write_str("Black"),
            Player::White => f.write_str("White"),
        }
    }
}

/// Contents of a single cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The player owning the disc on this cell, if any.
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Cell {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Position on the 8x8 board (0-63, row-major).
///
/// Serializes as a `[row, col]` pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "(u8, u8)", try_from = "(u8, u8)")]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column, or `None` when off the board.
    #[inline]
    pub fn new(row: u8, col: u8) -> Option<Pos> {
        if row < SIZE && col < SIZE {
            Some(Pos(row * SIZE + col))
        } else {
            None
        }
    }

    /// Create a position from row and column (0-7 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < SIZE && col < SIZE);
        Pos(row * SIZE + col)
    }

    /// Get the row (0-7).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / SIZE
    }

    /// Get the column (0-7).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % SIZE
    }

    /// Single-bit mask for this cell.
    #[inline]
    pub fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Step one cell in a direction, or `None` when that leaves the board.
    #[inline]
    pub fn step(self, (dr, dc): (i8, i8)) -> Option<Pos> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if (0..SIZE as i8).contains(&row) && (0..SIZE as i8).contains(&col) {
            Some(Pos::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Iterate over all 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELLS as u8).map(Pos)
    }

    /// Iterate over the positions whose bits are set in `mask`, row-major.
    pub fn in_mask(mut mask: u64) -> impl Iterator<Item = Pos> {
        std::iter::from_fn(move || {
            if mask == 0 {
                return None;
            }
            let idx = mask.trailing_zeros() as u8;
            mask &= mask - 1;
            Some(Pos(idx))
        })
    }
}

impl From<Pos> for (u8, u8) {
    fn from(pos: Pos) -> (u8, u8) {
        (pos.row(), pos.col())
    }
}

impl TryFrom<(u8, u8)> for Pos {
    type Error = MoveError;

    fn try_from((row, col): (u8, u8)) -> Result<Pos, MoveError> {
        Pos::new(row, col).ok_or(MoveError::OutOfBounds { row, col })
    }
}

/// Disc counts per colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

impl Score {
    /// Total occupied cells.
    #[inline]
    pub fn total(self) -> u8 {
        self.black + self.white
    }

    /// Count for one player.
    #[inline]
    pub fn of(self, player: Player) -> u8 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// The player with more discs, or `None` on a tie.
    pub fn leader(self) -> Option<Player> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Compact board state - one occupancy mask per colour.
///
/// See module documentation for encoding details.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Create a board with no discs.
    #[inline]
    pub fn empty() -> Board {
        Board { black: 0, white: 0 }
    }

    /// Create the standard starting position.
    ///
    /// ```text
    ///   row 3: . . . W B . . .
    ///   row 4: . . . B W . . .
    /// ```
    pub fn new() -> Board {
        let mid = SIZE / 2;
        let mut board = Board::empty();
        board.set(Pos::from_row_col(mid - 1, mid - 1), Cell::White);
        board.set(Pos::from_row_col(mid - 1, mid), Cell::Black);
        board.set(Pos::from_row_col(mid, mid - 1), Cell::Black);
        board.set(Pos::from_row_col(mid, mid), Cell::White);
        board
    }

    /// Create a board from raw masks. The masks must not overlap.
    pub fn from_masks(black: u64, white: u64) -> Result<Board, ParseError> {
        if black & white != 0 {
            return Err(ParseError::Overlap(black & white));
        }
        Ok(Board { black, white })
    }

    /// Raw (black, white) masks.
    #[inline]
    pub fn masks(&self) -> (u64, u64) {
        (self.black, self.white)
    }

    /// Mask of one player's discs.
    #[inline]
    pub fn mask(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Mask of every occupied cell.
    #[inline]
    pub fn occupied(&self) -> u64 {
        self.black | self.white
    }

    /// Get the contents of a cell.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Cell {
        let bit = pos.bit();
        if self.black & bit != 0 {
            Cell::Black
        } else if self.white & bit != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Overwrite a cell.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let bit = pos.bit();
        self.black &= !bit;
        self.white &= !bit;
        match cell {
            Cell::Empty => {}
            Cell::Black => self.black |= bit,
            Cell::White => self.white |= bit,
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.occupied() & pos.bit() == 0
    }

    /// Number of discs a player has on the board.
    #[inline]
    pub fn count(&self, player: Player) -> u8 {
        self.mask(player).count_ones() as u8
    }

    /// Disc counts for both colours.
    #[inline]
    pub fn score(&self) -> Score {
        Score {
            black: self.count(Player::Black),
            white: self.count(Player::White),
        }
    }

    /// True when every cell is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied() == u64::MAX
    }

    // ========== Captures & Move Generation ==========

    /// Opponent discs captured in one direction from `pos`.
    ///
    /// Walks outward over a contiguous run of opponent discs. The run counts
    /// only when it is non-empty and ends on a disc of `player`; running into
    /// an empty cell or the edge captures nothing.
    fn captures_toward(&self, pos: Pos, player: Player, dir: (i8, i8)) -> u64 {
        let own = self.mask(player);
        let theirs = self.mask(player.opponent());
        let mut run = 0u64;
        let mut cur = pos.step(dir);

        while let Some(p) = cur {
            let bit = p.bit();
            if theirs & bit != 0 {
                run |= bit;
            } else if own & bit != 0 {
                return run;
            } else {
                return 0;
            }
            cur = p.step(dir);
        }
        0
    }

    /// Mask of every opponent disc a move at `pos` would flip.
    ///
    /// Zero when the cell is occupied or the move captures nothing.
    pub fn captured_mask(&self, pos: Pos, player: Player) -> u64 {
        if !self.is_empty(pos) {
            return 0;
        }
        DIRECTIONS
            .iter()
            .fold(0, |acc, &dir| acc | self.captures_toward(pos, player, dir))
    }

    /// Every opponent disc a move at `pos` would flip, row-major.
    pub fn captured(&self, pos: Pos, player: Player) -> Vec<Pos> {
        Pos::in_mask(self.captured_mask(pos, player)).collect()
    }

    /// Check whether `player` may place a disc at `pos`.
    pub fn is_legal(&self, pos: Pos, player: Player) -> bool {
        self.is_empty(pos)
            && DIRECTIONS
                .iter()
                .any(|&dir| self.captures_toward(pos, player, dir) != 0)
    }

    /// Mask of every legal move for `player`.
    pub fn legal_mask(&self, player: Player) -> u64 {
        Pos::in_mask(!self.occupied())
            .filter(|&pos| self.is_legal(pos, player))
            .fold(0, |acc, pos| acc | pos.bit())
    }

    /// Every legal move for `player`, row-major.
    pub fn legal_moves(&self, player: Player) -> Vec<Pos> {
        Pos::in_mask(self.legal_mask(player)).collect()
    }

    /// True when `player` has at least one legal move.
    pub fn has_legal_move(&self, player: Player) -> bool {
        Pos::in_mask(!self.occupied()).any(|pos| self.is_legal(pos, player))
    }

    // ========== Apply ==========

    /// Place a disc for `player` at `pos` and flip the captured discs.
    ///
    /// The capture set is taken from the board before the disc is placed.
    /// Returns the flipped mask; the board is untouched on error.
    pub fn play(&mut self, pos: Pos, player: Player) -> Result<u64, MoveError> {
        if !self.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        let flipped = self.captured_mask(pos, player);
        if flipped == 0 {
            return Err(MoveError::NoCaptures(pos));
        }

        match player {
            Player::Black => {
                self.black |= flipped | pos.bit();
                self.white &= !flipped;
            }
            Player::White => {
                self.white |= flipped | pos.bit();
                self.black &= !flipped;
            }
        }
        Ok(flipped)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().expect("valid board text")
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::White.opponent(), Player::Black);
    }

    #[test]
    fn test_player_from_u8() {
        assert_eq!(Player::from_u8(1), Some(Player::Black));
        assert_eq!(Player::from_u8(2), Some(Player::White));
        assert_eq!(Player::from_u8(0), None);
        assert_eq!(Player::from_u8(3), None);
    }

    #[test]
    fn test_cell_owner() {
        assert_eq!(Cell::Empty.owner(), None);
        assert_eq!(Cell::Black.owner(), Some(Player::Black));
        assert_eq!(Cell::White.owner(), Some(Player::White));
        assert_eq!(Cell::from(Player::White), Cell::White);
    }

    #[test]
    fn test_pos_from_row_col() {
        assert_eq!(Pos::from_row_col(0, 0), Pos(0));
        assert_eq!(Pos::from_row_col(0, 7), Pos(7));
        assert_eq!(Pos::from_row_col(1, 0), Pos(8));
        assert_eq!(Pos::from_row_col(7, 7), Pos(63));
    }

    #[test]
    fn test_pos_row_col() {
        for pos in Pos::all() {
            assert_eq!(Pos::from_row_col(pos.row(), pos.col()), pos);
        }
    }

    #[test]
    fn test_pos_new_rejects_off_board() {
        assert_eq!(Pos::new(8, 0), None);
        assert_eq!(Pos::new(0, 8), None);
        assert_eq!(Pos::new(255, 255), None);
        assert_eq!(Pos::new(3, 4), Some(Pos(28)));
    }

    #[test]
    fn test_pos_step_edges() {
        let corner = Pos::from_row_col(0, 0);
        assert_eq!(corner.step((-1, 0)), None);
        assert_eq!(corner.step((0, -1)), None);
        assert_eq!(corner.step((1, 1)), Some(Pos::from_row_col(1, 1)));

        let right = Pos::from_row_col(3, 7);
        assert_eq!(right.step((0, 1)), None);
        assert_eq!(right.step((1, -1)), Some(Pos::from_row_col(4, 6)));
    }

    #[test]
    fn test_pos_in_mask_is_row_major() {
        let mask = Pos(40).bit() | Pos(3).bit() | Pos(17).bit();
        let positions: Vec<Pos> = Pos::in_mask(mask).collect();
        assert_eq!(positions, vec![Pos(3), Pos(17), Pos(40)]);
        assert_eq!(Pos::in_mask(0).count(), 0);
    }

    #[test]
    fn test_pos_serde_pair() {
        let json = serde_json::to_string(&Pos::from_row_col(2, 3)).unwrap();
        assert_eq!(json, "[2,3]");
        let pos: Pos = serde_json::from_str("[7,0]").unwrap();
        assert_eq!(pos, Pos::from_row_col(7, 0));
        assert!(serde_json::from_str::<Pos>("[8,0]").is_err());
    }

    #[test]
    fn test_board_new_seed() {
        let board = Board::new();
        assert_eq!(board.cell(Pos::from_row_col(3, 3)), Cell::White);
        assert_eq!(board.cell(Pos::from_row_col(3, 4)), Cell::Black);
        assert_eq!(board.cell(Pos::from_row_col(4, 3)), Cell::Black);
        assert_eq!(board.cell(Pos::from_row_col(4, 4)), Cell::White);
        assert_eq!(board.score(), Score { black: 2, white: 2 });
    }

    #[test]
    fn test_board_set_overwrites() {
        let mut board = Board::empty();
        let pos = Pos::from_row_col(5, 5);
        board.set(pos, Cell::Black);
        assert_eq!(board.cell(pos), Cell::Black);
        board.set(pos, Cell::White);
        assert_eq!(board.cell(pos), Cell::White);
        assert_eq!(board.count(Player::Black), 0);
        board.set(pos, Cell::Empty);
        assert!(board.is_empty(pos));
    }

    #[test]
    fn test_from_masks_rejects_overlap() {
        assert!(Board::from_masks(0b11, 0b10).is_err());
        let board = Board::from_masks(0b01, 0b10).unwrap();
        assert_eq!(board.masks(), (0b01, 0b10));
    }

    #[test]
    fn test_initial_legal_moves() {
        let board = Board::new();
        let moves = board.legal_moves(Player::Black);
        assert_eq!(
            moves,
            vec![
                Pos::from_row_col(2, 3),
                Pos::from_row_col(3, 2),
                Pos::from_row_col(4, 5),
                Pos::from_row_col(5, 4),
            ]
        );
        assert_eq!(board.legal_moves(Player::White).len(), 4);
    }

    #[test]
    fn test_occupied_cell_is_illegal() {
        let board = Board::new();
        let pos = Pos::from_row_col(3, 3);
        assert!(!board.is_legal(pos, Player::Black));
        assert_eq!(board.captured_mask(pos, Player::Black), 0);
    }

    #[test]
    fn test_run_ending_at_edge_captures_nothing() {
        let board = board(
            "........\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n\
             .WWWWWWW\n",
        );
        assert!(!board.is_legal(Pos::from_row_col(7, 0), Player::Black));
    }

    #[test]
    fn test_run_ending_on_empty_captures_nothing() {
        let board = board(
            "........\n\
             ........\n\
             ........\n\
             ...WW...\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n",
        );
        assert!(!board.is_legal(Pos::from_row_col(3, 2), Player::Black));
    }

    #[test]
    fn test_adjacent_own_disc_captures_nothing() {
        let board = board(
            "........\n\
             ........\n\
             ........\n\
             ...B....\n\
             ........\n\
             ........\n\
             ........\n\
             ........\n",
        );
        assert!(!board.is_legal(Pos::from_row_col(3, 2), Player::Black));
    }

    #[test]
    fn test_captures_in_several_directions() {
        let board = board(
            "B..B..B.\n\
             .W.W.W..\n\
             ..WWW...\n\
             BWW.WWWB\n\
             ..WWW...\n\
             .W.W.W..\n\
             B..B..B.\n\
             ........\n",
        );
        let pos = Pos::from_row_col(3, 3);
        let captured = board.captured(pos, Player::Black);
        assert_eq!(captured.len(), 17);
        assert!(captured.iter().all(|&p| board.cell(p) == Cell::White));
    }

    #[test]
    fn test_only_terminated_directions_flip() {
        // East run is closed by Black; the diagonal run stops on an empty cell.
        let board = board(
            "...WWB..\n\
             ...W....\n\
             ...W....\n\
             ...W....\n\
             ...W....\n\
             ...W....\n\
             ...W....\n\
             ...W....\n",
        );
        let captured = board.captured(Pos::from_row_col(0, 2), Player::Black);
        assert_eq!(captured, vec![Pos::from_row_col(0, 3), Pos::from_row_col(0, 4)]);
    }

    #[test]
    fn test_play_places_and_flips() {
        let mut board = Board::new();
        let flipped = board.play(Pos::from_row_col(2, 3), Player::Black).unwrap();
        assert_eq!(flipped, Pos::from_row_col(3, 3).bit());
        assert_eq!(board.cell(Pos::from_row_col(2, 3)), Cell::Black);
        assert_eq!(board.cell(Pos::from_row_col(3, 3)), Cell::Black);
        assert_eq!(board.score(), Score { black: 4, white: 1 });
    }

    #[test]
    fn test_play_rejects_without_mutation() {
        let mut board = Board::new();
        let before = board;
        assert_eq!(
            board.play(Pos::from_row_col(0, 0), Player::Black),
            Err(MoveError::NoCaptures(Pos::from_row_col(0, 0)))
        );
        assert_eq!(
            board.play(Pos::from_row_col(3, 3), Player::Black),
            Err(MoveError::Occupied(Pos::from_row_col(3, 3)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_legal_mask_matches_captured() {
        let board = Board::new();
        for player in Player::all() {
            let mask = board.legal_mask(player);
            for pos in Pos::all() {
                let legal = mask & pos.bit() != 0;
                assert_eq!(legal, board.is_legal(pos, player));
                assert_eq!(legal, board.captured_mask(pos, player) != 0);
            }
        }
    }

    #[test]
    fn test_has_legal_move_empty_board() {
        let board = Board::empty();
        assert!(!board.has_legal_move(Player::Black));
        assert!(!board.has_legal_move(Player::White));
    }

    #[test]
    fn test_is_full() {
        assert!(!Board::new().is_full());
        let mut board = Board::from_masks(0x00FF_00FF_00FF_00FF, 0xFF00_FF00_FF00_FF00).unwrap();
        assert!(board.is_full());
        assert!(!board.has_legal_move(Player::Black));
        board.set(Pos::from_row_col(7, 7), Cell::Empty);
        assert!(!board.is_full());
    }

    #[test]
    fn test_score_leader() {
        assert_eq!(Score { black: 33, white: 31 }.leader(), Some(Player::Black));
        assert_eq!(Score { black: 10, white: 20 }.leader(), Some(Player::White));
        assert_eq!(Score { black: 32, white: 32 }.leader(), None);
        assert_eq!(Score { black: 33, white: 31 }.total(), 64);
    }
}
