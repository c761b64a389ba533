//! Rule-level behaviour of the game engine, driven through the public API.

use othello_core::{
    Board, Cell, Game, MoveError, Outcome, Player, Pos, Score, TurnChange, CELLS,
};

fn fixed_clock() -> u64 {
    50_000
}

fn position(text: &str, to_move: Player) -> Game {
    let board: Board = text.parse().expect("valid board text");
    Game::from_position(board, to_move).with_clock(fixed_clock)
}

/// Full board: the first `black_cells` cells (row-major) black, the rest white.
fn split_board(black_cells: usize) -> Board {
    let mut board = Board::empty();
    for pos in Pos::all() {
        let cell = if (pos.0 as usize) < black_cells {
            Cell::Black
        } else {
            Cell::White
        };
        board.set(pos, cell);
    }
    board
}

#[test]
fn initial_board_is_seeded() {
    let game = Game::new();
    let board = game.board();

    assert_eq!(game.score(), Score { black: 2, white: 2 });
    assert_eq!(game.current_player(), Player::Black);
    assert_eq!(game.cell(3, 3), Some(Cell::White));
    assert_eq!(game.cell(4, 4), Some(Cell::White));
    assert_eq!(game.cell(3, 4), Some(Cell::Black));
    assert_eq!(game.cell(4, 3), Some(Cell::Black));

    let occupied = Pos::all().filter(|&p| !board.is_empty(p)).count();
    assert_eq!(occupied, 4);
}

#[test]
fn opening_scenario() {
    let mut game = Game::new();
    let record = game.apply_move(2, 3).expect("d3 is legal");

    assert_eq!(record.flipped, vec![Pos::from_row_col(3, 3)]);
    assert_eq!(game.score(), Score { black: 4, white: 1 });
    assert_eq!(game.current_player(), Player::White);
}

#[test]
fn legality_agrees_with_captures_everywhere() {
    let game = Game::replay("d3 c3 c4 e3").unwrap();
    for player in [Player::Black, Player::White] {
        for row in 0..8 {
            for col in 0..8 {
                let legal = game.is_legal_move(row, col, player);
                let captured = game.captured_discs(row, col, player);
                assert_eq!(legal, !captured.is_empty(), "({row}, {col}) for {player}");
            }
        }
    }
}

#[test]
fn rejected_move_is_idempotent() {
    let mut game = Game::replay("d3 c3").unwrap();
    let before = game.snapshot();

    for _ in 0..2 {
        assert_eq!(
            game.apply_move(0, 0),
            Err(MoveError::NoCaptures(Pos::from_row_col(0, 0)))
        );
        assert_eq!(game.snapshot(), before);
    }
}

#[test]
fn out_of_bounds_is_rejected_not_panicking() {
    let mut game = Game::new();
    assert_eq!(
        game.apply_move(8, 3),
        Err(MoveError::OutOfBounds { row: 8, col: 3 })
    );
    assert_eq!(
        game.apply_move(u8::MAX, u8::MAX),
        Err(MoveError::OutOfBounds { row: 255, col: 255 })
    );
    assert!(!game.is_legal_move(3, 200, Player::Black));
    assert_eq!(game.score(), Score { black: 2, white: 2 });
}

#[test]
fn forced_pass_returns_turn_to_mover() {
    let mut game = position(
        "......WB\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ......WB\n",
        Player::Black,
    );

    let record = game.apply_move(0, 5).unwrap();
    assert_eq!(
        record.turn,
        TurnChange::Pass {
            passed: Player::White,
            to_move: Player::Black,
        }
    );
    assert_eq!(game.current_player(), Player::Black);
    assert!(!game.has_legal_move(Player::White));

    let notice = game.notice().expect("pass notice fires");
    assert_eq!(notice.passed, Player::White);
    assert!(notice.is_live(fixed_clock() + 2_999));
    assert!(!notice.is_live(fixed_clock() + 3_000));
}

#[test]
fn blocked_board_is_terminal() {
    // a1 is empty but every line out of it is solid white up to the edge.
    let mut board = Board::empty();
    for pos in Pos::all() {
        let (row, col) = (pos.row(), pos.col());
        let cell = if pos.0 == 0 {
            Cell::Empty
        } else if row == 0 || col == 0 || row == col {
            Cell::White
        } else {
            Cell::Black
        };
        board.set(pos, cell);
    }
    assert!(!board.is_legal(Pos(0), Player::Black));
    assert!(!board.is_legal(Pos(0), Player::White));

    let game = Game::from_position(board, Player::White);
    assert!(game.is_terminal());
    assert_eq!(
        game.outcome(),
        Some(Outcome {
            winner: Some(Player::Black),
            score: Score { black: 42, white: 21 },
        })
    );
}

#[test]
fn full_board_declares_winner_by_count() {
    let game = Game::from_position(split_board(33), Player::Black);
    let outcome = game.outcome().expect("full board is terminal");
    assert_eq!(outcome.winner, Some(Player::Black));
    assert_eq!(outcome.score, Score { black: 33, white: 31 });

    let game = Game::from_position(split_board(20), Player::Black);
    assert_eq!(game.outcome().unwrap().winner, Some(Player::White));
}

#[test]
fn full_board_tie_is_draw() {
    let game = Game::from_position(split_board(32), Player::Black);
    let outcome = game.outcome().expect("full board is terminal");
    assert!(outcome.is_draw());
    assert_eq!(outcome.score.total() as usize, CELLS);
}

#[test]
fn move_into_terminal_state() {
    let mut game = position(
        "......WB\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ........\n\
         ......WB\n",
        Player::Black,
    );
    game.apply_move(0, 5).unwrap();
    let record = game.apply_move(7, 5).unwrap();

    let outcome = match record.turn {
        TurnChange::GameOver { outcome } => outcome,
        other => panic!("expected game over, got {other:?}"),
    };
    assert_eq!(outcome.winner, Some(Player::Black));
    assert_eq!(game.outcome(), Some(outcome));
    assert_eq!(game.apply_move(3, 3), Err(MoveError::GameOver));
    assert_eq!(game.outcome(), Some(outcome));
}

#[test]
fn reset_restores_seed_from_any_state() {
    let mut mid = Game::replay("d3 c3 c4 e3 f4").unwrap();
    mid.reset();
    assert_eq!(*mid.board(), Board::new());
    assert_eq!(mid.current_player(), Player::Black);
    assert!(!mid.is_terminal());

    let mut done = Game::from_position(split_board(40), Player::Black);
    assert!(done.is_terminal());
    done.reset();
    assert_eq!(*done.board(), Board::new());
    assert_eq!(done.outcome(), None);
    assert_eq!(done.notice(), None);
    assert!(done.apply_move(2, 3).is_ok());
}

#[test]
fn hints_have_no_rule_effect() {
    let mut plain = Game::new();
    let mut hinted = Game::new();
    hinted.toggle_hints();

    for (row, col) in [(2, 3), (2, 2), (2, 1)] {
        let a = plain.apply_move(row, col);
        let b = hinted.apply_move(row, col);
        assert_eq!(a, b);
    }
    assert_eq!(plain.board(), hinted.board());
    assert_eq!(hinted.hint_moves(), hinted.legal_moves(hinted.current_player()));
}
