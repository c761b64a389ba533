//! Read-only snapshots and change notification for renderers.
//!
//! A renderer never touches the board directly. It registers a
//! [`GameObserver`] on an [`ObservedGame`] and redraws from the [`Snapshot`]
//! handed to it after every operation.

use serde::{Deserialize, Serialize};

use crate::{Cell, Game, MoveError, MoveRecord, Notice, Outcome, Player, Pos, Score, SIZE};

/// Owned view of a game at one instant.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// `cells[row][col]`.
    pub cells: [[Cell; SIZE as usize]; SIZE as usize],
    pub to_move: Player,
    pub score: Score,
    pub outcome: Option<Outcome>,
    pub hints: bool,
    /// Cells to highlight; empty unless hints are on.
    pub hint_moves: Vec<Pos>,
    /// Pass notice, only while live.
    pub notice: Option<Notice>,
}

impl Snapshot {
    /// Capture `game`, keeping the notice only if live at `now_ms`.
    pub fn at(game: &Game, now_ms: u64) -> Snapshot {
        let board = game.board();
        let mut cells = [[Cell::Empty; SIZE as usize]; SIZE as usize];
        for pos in Pos::all() {
            cells[pos.row() as usize][pos.col() as usize] = board.cell(pos);
        }

        Snapshot {
            cells,
            to_move: game.current_player(),
            score: game.score(),
            outcome: game.outcome(),
            hints: game.hints_enabled(),
            hint_moves: game.hint_moves(),
            notice: game.notice_at(now_ms),
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Game {
    /// Snapshot using the game's own clock.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::at(self, self.now_ms())
    }
}

/// The operation that produced a snapshot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Moved(MoveRecord),
    Rejected(MoveError),
    Reset,
    HintsToggled(bool),
}

/// Receives a snapshot after every operation on an [`ObservedGame`].
pub trait GameObserver {
    fn on_update(&mut self, event: &GameEvent, snapshot: &Snapshot);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent, &Snapshot),
{
    fn on_update(&mut self, event: &GameEvent, snapshot: &Snapshot) {
        self(event, snapshot)
    }
}

/// A [`Game`] that notifies observers after each operation.
pub struct ObservedGame {
    game: Game,
    observers: Vec<Box<dyn GameObserver>>,
}

impl ObservedGame {
    pub fn new(game: Game) -> ObservedGame {
        ObservedGame {
            game,
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is not called until the next operation.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn apply_move(&mut self, row: u8, col: u8) -> Result<MoveRecord, MoveError> {
        let result = self.game.apply_move(row, col);
        let event = match &result {
            Ok(record) => GameEvent::Moved(record.clone()),
            Err(e) => GameEvent::Rejected(e.clone()),
        };
        self.publish(&event);
        result
    }

    pub fn reset(&mut self) {
        self.game.reset();
        self.publish(&GameEvent::Reset);
    }

    pub fn toggle_hints(&mut self) -> bool {
        let hints = self.game.toggle_hints();
        self.publish(&GameEvent::HintsToggled(hints));
        hints
    }

    fn publish(&mut self, event: &GameEvent) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.game.snapshot();
        for observer in &mut self.observers {
            observer.on_update(event, &snapshot);
        }
    }
}

impl std::fmt::Debug for ObservedGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedGame")
            .field("game", &self.game)
            .field("observers", &self.observers.len())
            .finish()
    }
}
