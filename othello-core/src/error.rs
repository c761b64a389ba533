use crate::Pos;

/// Why a move was rejected. A rejected move never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },

    #[error("{0} is already occupied")]
    Occupied(Pos),

    #[error("{0} captures no discs")]
    NoCaptures(Pos),

    #[error("the game is over")]
    GameOver,
}

/// Errors from reading squares, transcripts or board text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid square `{0}` (expected a1..h8)")]
    Square(String),

    #[error("board text has {0} rows, expected 8")]
    RowCount(usize),

    #[error("board row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("board row {row}, column {col}: unexpected `{ch}`")]
    CellChar { row: usize, col: usize, ch: char },

    #[error("black and white masks overlap ({0:#018x})")]
    Overlap(u64),

    #[error("unknown player `{0}`")]
    Player(String),
}

/// The first move of a transcript that could not be replayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("move {index}: {source}")]
    Parse { index: usize, source: ParseError },

    #[error("move {index} ({notation}): {source}")]
    Illegal {
        index: usize,
        notation: String,
        source: MoveError,
    },
}

impl ReplayError {
    /// 1-based index of the offending move.
    pub fn index(&self) -> usize {
        match self {
            ReplayError::Parse { index, .. } | ReplayError::Illegal { index, .. } => *index,
        }
    }
}
