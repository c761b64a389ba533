//! Text forms for squares, transcripts and boards.
//!
//! ```text
//! square:      a1 .. h8      column letter, then row digit; a1 = (0,0)
//! transcript:  "d3 c5 f6"    whitespace-separated squares
//! board:       8 lines of 8 cells, `B` black, `W` white, `.` empty
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Board, Cell, ParseError, Player, Pos, SIZE};

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

impl FromStr for Pos {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Pos, ParseError> {
        let bad = || ParseError::Square(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(bad());
        }

        let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let row = bytes[1].wrapping_sub(b'1');
        Pos::new(row, col).ok_or_else(bad)
    }
}

impl FromStr for Player {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Player, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Player::Black),
            "white" | "w" => Ok(Player::White),
            _ => Err(ParseError::Player(s.to_string())),
        }
    }
}

/// Parse a whitespace-separated move list.
///
/// On failure returns the 1-based index of the bad token with the error.
pub fn parse_transcript(text: &str) -> Result<Vec<Pos>, (usize, ParseError)> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| token.parse().map_err(|e| (i + 1, e)))
        .collect()
}

/// Format a move list as a transcript.
pub fn format_transcript(moves: &[Pos]) -> String {
    moves
        .iter()
        .map(|pos| pos.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Cell {
    /// Board-text character for this cell.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'B',
            Cell::White => 'W',
        }
    }

    fn from_symbol(ch: char) -> Option<Cell> {
        match ch {
            '.' | '-' => Some(Cell::Empty),
            'B' | 'b' | 'X' | 'x' => Some(Cell::Black),
            'W' | 'w' | 'O' | 'o' => Some(Cell::White),
            _ => None,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let cell = self.cell(Pos::from_row_col(row, col));
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Board, ParseError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != SIZE as usize {
            return Err(ParseError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != SIZE as usize {
                return Err(ParseError::RowLength { row, len });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_symbol(ch).ok_or(ParseError::CellChar { row, col, ch })?;
                board.set(Pos::from_row_col(row as u8, col as u8), cell);
            }
        }
        Ok(board)
    }
}
