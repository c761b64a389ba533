//! Shared code for the Othello command-line tools.

pub mod perft;
pub mod svg;

use std::path::PathBuf;

use othello_core::{Board, ParseError, Player, ReplayError};

/// Errors reported by the tool binaries.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Usage(String),
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Read a position file: eight board lines, optionally followed by a line
/// naming the side to move (Black when absent).
pub fn parse_position(text: &str) -> Result<(Board, Player), ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    match lines.as_slice() {
        [rows @ .., last] if lines.len() == 9 => {
            let board = rows.join("\n").parse()?;
            Ok((board, last.parse()?))
        }
        _ => Ok((text.parse()?, Player::Black)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "........\n\
                         ........\n\
                         ........\n\
                         ...WB...\n\
                         ...BW...\n\
                         ........\n\
                         ........\n\
                         ........\n";

    #[test]
    fn test_parse_position_defaults_to_black() {
        let (board, to_move) = parse_position(START).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(to_move, Player::Black);
    }

    #[test]
    fn test_parse_position_with_side_to_move() {
        let text = format!("{START}\nwhite\n");
        let (board, to_move) = parse_position(&text).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(to_move, Player::White);
    }

    #[test]
    fn test_parse_position_errors() {
        let text = format!("{START}purple\n");
        assert_eq!(
            parse_position(&text),
            Err(ParseError::Player("purple".to_string()))
        );
        assert_eq!(parse_position("BW\n"), Err(ParseError::RowCount(1)));
    }
}
