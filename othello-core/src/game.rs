//! Game state machine: turn order, forced passes, game end, hints.
//!
//! ```text
//! InProgress(P) --legal move--> InProgress(P')      opponent can move
//!                            |  InProgress(P)       opponent passes
//!                            |  Terminal(outcome)   neither side can move
//! any state     --reset-->      InProgress(Black)
//! ```
//!
//! Illegal moves are rejected with a [`MoveError`] and change nothing.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{Board, Cell, MoveError, Player, Pos, ReplayError, Score};

/// How long a pass notice stays live.
pub const PASS_NOTICE_TTL_MS: u64 = 3_000;

/// Millisecond clock used to stamp notices.
pub type Clock = fn() -> u64;

/// Wall-clock milliseconds since the Unix epoch.
pub fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Final result, fixed when the game ends.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Outcome {
    /// `None` on a draw.
    pub winner: Option<Player>,
    pub score: Score,
}

impl Outcome {
    /// More discs wins; equal counts draw.
    pub fn from_score(score: Score) -> Outcome {
        Outcome {
            winner: score.leader(),
            score,
        }
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Score { black, white } = self.score;
        match self.winner {
            Some(Player::Black) => write!(f, "Black wins ({black} - {white})"),
            Some(Player::White) => write!(f, "White wins ({white} - {black})"),
            None => write!(f, "Draw ({black} - {white})"),
        }
    }
}

/// Transient message that a player had no move and was skipped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Notice {
    /// The player who passed.
    pub passed: Player,
    pub issued_at_ms: u64,
    pub ttl_ms: u64,
}

impl Notice {
    #[inline]
    pub fn expires_at_ms(&self) -> u64 {
        self.issued_at_ms.saturating_add(self.ttl_ms)
    }

    /// True until `ttl_ms` has elapsed since issue.
    #[inline]
    pub fn is_live(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms()
    }

    pub fn message(&self) -> String {
        format!("{} passes", self.passed)
    }
}

/// What happened to the turn after a move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnChange {
    /// The opponent moves next.
    Next { to_move: Player },
    /// The opponent had no move; the mover goes again.
    Pass { passed: Player, to_move: Player },
    /// Neither side can move.
    GameOver { outcome: Outcome },
}

/// Report of a successful move.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    pub pos: Pos,
    pub player: Player,
    /// Flipped discs, row-major.
    pub flipped: Vec<Pos>,
    pub turn: TurnChange,
}

/// A single game of Othello.
///
/// The board only changes through [`Game::apply_move`] and [`Game::reset`].
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Player,
    outcome: Option<Outcome>,
    hints: bool,
    notice: Option<Notice>,
    clock: Clock,
}

impl Game {
    /// Standard starting position, Black to move.
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            to_move: Player::Black,
            outcome: None,
            hints: false,
            notice: None,
            clock: system_clock,
        }
    }

    /// Start from an arbitrary position.
    ///
    /// If `to_move` has no legal move the turn goes to the opponent without a
    /// notice; if neither side can move the game starts finished.
    pub fn from_position(board: Board, to_move: Player) -> Game {
        let mut game = Game {
            board,
            to_move,
            ..Game::new()
        };
        if !board.has_legal_move(to_move) {
            if board.has_legal_move(to_move.opponent()) {
                game.to_move = to_move.opponent();
            } else {
                game.outcome = Some(Outcome::from_score(board.score()));
            }
        }
        game
    }

    /// Replay a transcript from the starting position.
    pub fn replay(transcript: &str) -> Result<Game, ReplayError> {
        let mut game = Game::new();
        for (i, token) in transcript.split_whitespace().enumerate() {
            let index = i + 1;
            let pos: Pos = token
                .parse()
                .map_err(|source| ReplayError::Parse { index, source })?;
            game.play(pos).map_err(|source| ReplayError::Illegal {
                index,
                notation: token.to_string(),
                source,
            })?;
        }
        Ok(game)
    }

    /// Replace the clock used to stamp notices.
    pub fn with_clock(mut self, clock: Clock) -> Game {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Contents of a cell, or `None` when off the board.
    pub fn cell(&self, row: u8, col: u8) -> Option<Cell> {
        Pos::new(row, col).map(|pos| self.board.cell(pos))
    }

    /// The player to move. After the game ends this is the player who would
    /// have moved next and carries no meaning.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.to_move
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.board.score()
    }

    /// Check a move for any player without changing anything.
    pub fn is_legal_move(&self, row: u8, col: u8, player: Player) -> bool {
        Pos::new(row, col).is_some_and(|pos| self.board.is_legal(pos, player))
    }

    /// Discs `player` would flip by moving at (row, col), row-major.
    pub fn captured_discs(&self, row: u8, col: u8, player: Player) -> Vec<Pos> {
        Pos::new(row, col)
            .map(|pos| self.board.captured(pos, player))
            .unwrap_or_default()
    }

    pub fn legal_moves(&self, player: Player) -> Vec<Pos> {
        self.board.legal_moves(player)
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        self.board.has_legal_move(player)
    }

    /// Play at (row, col) for the current player.
    pub fn apply_move(&mut self, row: u8, col: u8) -> Result<MoveRecord, MoveError> {
        let pos = Pos::new(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
        self.play(pos)
    }

    /// Play at `pos` for the current player.
    pub fn play(&mut self, pos: Pos) -> Result<MoveRecord, MoveError> {
        if self.is_terminal() {
            debug!("rejected {pos}: game is over");
            return Err(MoveError::GameOver);
        }

        let player = self.to_move;
        let flipped = self.board.play(pos, player).inspect_err(|e| {
            debug!("rejected {player} at {pos}: {e}");
        })?;
        let turn = self.advance_turn(player);

        Ok(MoveRecord {
            pos,
            player,
            flipped: Pos::in_mask(flipped).collect(),
            turn,
        })
    }

    /// Hand the turn on after `mover` has played.
    ///
    /// Only the two players' move availability is checked.
    fn advance_turn(&mut self, mover: Player) -> TurnChange {
        let next = mover.opponent();
        self.to_move = next;

        if self.board.has_legal_move(next) {
            return TurnChange::Next { to_move: next };
        }

        if !self.board.has_legal_move(mover) {
            let outcome = Outcome::from_score(self.board.score());
            info!("game over: {outcome}");
            self.outcome = Some(outcome);
            return TurnChange::GameOver { outcome };
        }

        debug!("{next} has no legal move and passes");
        self.to_move = mover;
        self.notice = Some(Notice {
            passed: next,
            issued_at_ms: (self.clock)(),
            ttl_ms: PASS_NOTICE_TTL_MS,
        });
        TurnChange::Pass {
            passed: next,
            to_move: mover,
        }
    }

    /// Back to the starting position. Hint preference is kept.
    pub fn reset(&mut self) {
        info!("game reset");
        self.board = Board::new();
        self.to_move = Player::Black;
        self.outcome = None;
        self.notice = None;
    }

    /// Flip the hint flag and return the new value.
    pub fn toggle_hints(&mut self) -> bool {
        self.hints = !self.hints;
        self.hints
    }

    #[inline]
    pub fn hints_enabled(&self) -> bool {
        self.hints
    }

    /// Cells to highlight: the current player's legal moves while hints are
    /// on and the game is running, otherwise nothing.
    pub fn hint_moves(&self) -> Vec<Pos> {
        if self.hints && !self.is_terminal() {
            self.board.legal_moves(self.to_move)
        } else {
            Vec::new()
        }
    }

    /// The latest pass notice if it is still live at `now_ms`.
    pub fn notice_at(&self, now_ms: u64) -> Option<Notice> {
        self.notice.filter(|n| n.is_live(now_ms))
    }

    /// The latest pass notice if it is still live now.
    pub fn notice(&self) -> Option<Notice> {
        self.notice_at((self.clock)())
    }

    pub(crate) fn now_ms(&self) -> u64 {
        (self.clock)()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
