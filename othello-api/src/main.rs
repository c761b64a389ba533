//! Othello Web API
//!
//! Serves one shared game session over REST: play, undo/redo through the
//! move history, and import/export of transcripts and positions.

mod config;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use othello_core::{
    format_transcript, parse_transcript, Board, Game, MoveError, MoveRecord, ParseError, Player,
    ReplayError, Snapshot, TurnChange,
};

use crate::config::ApiConfig;

// =============================================================================
// Session State
// =============================================================================

/// Global game session state
struct GameSession {
    /// History of game states (index 0 = starting position)
    states: Vec<Game>,
    /// Move records (moves[i] = move that led to states[i+1])
    moves: Vec<MoveRecord>,
    /// Current position in history
    current_index: usize,
    /// Starting position when it is not the standard one
    starting_position: Option<(Board, Player)>,
}

impl GameSession {
    fn new() -> Self {
        Self::from_game(Game::new(), None)
    }

    fn from_game(game: Game, starting_position: Option<(Board, Player)>) -> Self {
        Self {
            states: vec![game],
            moves: vec![],
            current_index: 0,
            starting_position,
        }
    }

    fn current_game(&self) -> &Game {
        &self.states[self.current_index]
    }

    fn hints_enabled(&self) -> bool {
        self.current_game().hints_enabled()
    }

    fn reset(&mut self) {
        let mut game = self.current_game().clone();
        game.reset();
        *self = Self::from_game(game, None);
    }

    /// Start over from an arbitrary position, keeping the hint preference.
    fn reset_to_position(&mut self, board: Board, to_move: Player) {
        let mut game = Game::from_position(board, to_move);
        if self.hints_enabled() {
            game.toggle_hints();
        }
        *self = Self::from_game(game, Some((board, to_move)));
    }

    /// Play for the side to move, discarding any redo history.
    fn play(&mut self, row: u8, col: u8) -> Result<&MoveRecord, MoveError> {
        let mut game = self.current_game().clone();
        let record = game.apply_move(row, col)?;

        let idx = self.current_index;
        self.states.truncate(idx + 1);
        self.moves.truncate(idx);

        self.states.push(game);
        self.moves.push(record);
        self.current_index += 1;
        Ok(&self.moves[idx])
    }

    /// Hints are a display preference, so the flag is shared by every state.
    fn toggle_hints(&mut self) -> bool {
        for game in &mut self.states {
            game.toggle_hints();
        }
        self.hints_enabled()
    }

    fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    fn can_redo(&self) -> bool {
        self.current_index < self.states.len() - 1
    }
}

/// Shared application state
struct AppStateInner {
    session: Mutex<GameSession>,
}

impl AppStateInner {
    /// Lock the session, ignoring poisoning: every mutation is a single
    /// assignment.
    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type AppState = Arc<AppStateInner>;

fn new_state() -> AppState {
    Arc::new(AppStateInner {
        session: Mutex::new(GameSession::new()),
    })
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Illegal move: {0}")]
    Move(#[from] MoveError),

    #[error("{0}")]
    Replay(#[from] ReplayError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Invalid move index {0}")]
    InvalidIndex(usize),
}

#[derive(Serialize)]
struct ErrorModel {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!("request rejected: {self}");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorModel {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Debug, Serialize)]
struct GameStateModel {
    #[serde(flatten)]
    snapshot: Snapshot,
    move_index: usize,
    can_undo: bool,
    can_redo: bool,
    /// The move that led to this position, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    last_move: Option<MoveRecord>,
}

#[derive(Serialize)]
struct LegalMoveModel {
    row: u8,
    col: u8,
    square: String,
    /// Discs this move would flip
    captures: usize,
}

#[derive(Deserialize)]
struct MoveRequest {
    row: u8,
    col: u8,
}

#[derive(Serialize)]
struct HintsModel {
    hints: bool,
}

#[derive(Serialize)]
struct HistoryEntryModel {
    index: usize,
    notation: String,
    player: Player,
    flipped: usize,
    /// The opponent had no reply and was skipped after this move
    #[serde(skip_serializing_if = "Option::is_none")]
    passed: Option<Player>,
}

#[derive(Serialize)]
struct HistoryModel {
    moves: Vec<HistoryEntryModel>,
    current_index: usize,
    total_moves: usize,
}

#[derive(Serialize)]
struct ExportModel {
    notation: String,
    /// Set when the game did not start from the standard position
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<PositionModel>,
}

#[derive(Deserialize)]
struct ImportRequest {
    notation: String,
}

#[derive(Serialize, Deserialize)]
struct PositionModel {
    /// Eight lines of `B`, `W` and `.`
    board: String,
    to_move: Player,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

fn session_to_model(session: &GameSession) -> GameStateModel {
    let last_move = session
        .current_index
        .checked_sub(1)
        .map(|i| session.moves[i].clone());

    GameStateModel {
        snapshot: session.current_game().snapshot(),
        move_index: session.current_index,
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
        last_move,
    }
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let session = state.session();
    Json(session_to_model(&session))
}

async fn get_moves(State(state): State<AppState>) -> Json<Vec<LegalMoveModel>> {
    let session = state.session();
    let game = session.current_game();
    if game.is_terminal() {
        return Json(vec![]);
    }

    let player = game.current_player();
    let moves = game
        .legal_moves(player)
        .into_iter()
        .map(|pos| LegalMoveModel {
            row: pos.row(),
            col: pos.col(),
            square: pos.to_string(),
            captures: game.board().captured(pos, player).len(),
        })
        .collect();
    Json(moves)
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    let record = session.play(req.row, req.col)?;
    debug!("{} played {}", record.player, record.pos);
    Ok(Json(session_to_model(&session)))
}

async fn reset_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let mut session = state.session();
    session.reset();
    Json(session_to_model(&session))
}

async fn toggle_hints(State(state): State<AppState>) -> Json<HintsModel> {
    let mut session = state.session();
    Json(HintsModel {
        hints: session.toggle_hints(),
    })
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryModel> {
    let session = state.session();

    let moves: Vec<HistoryEntryModel> = session
        .moves
        .iter()
        .enumerate()
        .map(|(i, record)| HistoryEntryModel {
            index: i + 1,
            notation: record.pos.to_string(),
            player: record.player,
            flipped: record.flipped.len(),
            passed: match record.turn {
                TurnChange::Pass { passed, .. } => Some(passed),
                _ => None,
            },
        })
        .collect();

    Json(HistoryModel {
        total_moves: session.moves.len(),
        current_index: session.current_index,
        moves,
    })
}

async fn undo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    if !session.can_undo() {
        return Err(ApiError::NothingToUndo);
    }
    session.current_index -= 1;
    Ok(Json(session_to_model(&session)))
}

async fn redo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    if !session.can_redo() {
        return Err(ApiError::NothingToRedo);
    }
    session.current_index += 1;
    Ok(Json(session_to_model(&session)))
}

async fn goto_move(
    State(state): State<AppState>,
    Path(move_index): Path<usize>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    if move_index >= session.states.len() {
        return Err(ApiError::InvalidIndex(move_index));
    }
    session.current_index = move_index;
    Ok(Json(session_to_model(&session)))
}

async fn export_game(State(state): State<AppState>) -> Json<ExportModel> {
    let session = state.session();
    let played: Vec<_> = session.moves.iter().map(|record| record.pos).collect();

    Json(ExportModel {
        notation: format_transcript(&played),
        start: session
            .starting_position
            .map(|(board, to_move)| PositionModel {
                board: board.to_string(),
                to_move,
            }),
    })
}

/// Replay a transcript from the standard start into a fresh session.
fn replay_session(notation: &str, hints: bool) -> Result<GameSession, ReplayError> {
    let moves = parse_transcript(notation)
        .map_err(|(index, source)| ReplayError::Parse { index, source })?;

    let mut game = Game::new();
    if hints {
        game.toggle_hints();
    }
    let mut session = GameSession::from_game(game, None);

    for (i, pos) in moves.into_iter().enumerate() {
        session
            .play(pos.row(), pos.col())
            .map_err(|source| ReplayError::Illegal {
                index: i + 1,
                notation: pos.to_string(),
                source,
            })?;
    }
    Ok(session)
}

async fn import_game(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    let imported = replay_session(&req.notation, session.hints_enabled())?;
    info!("imported {} moves", imported.moves.len());
    *session = imported;
    Ok(Json(session_to_model(&session)))
}

async fn export_state(State(state): State<AppState>) -> Json<PositionModel> {
    let session = state.session();
    let game = session.current_game();
    Json(PositionModel {
        board: game.board().to_string(),
        to_move: game.current_player(),
    })
}

async fn import_state(
    State(state): State<AppState>,
    Json(req): Json<PositionModel>,
) -> Result<Json<GameStateModel>, ApiError> {
    let board: Board = req.board.parse()?;
    let mut session = state.session();
    session.reset_to_position(board, req.to_move);
    Ok(Json(session_to_model(&session)))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

fn router(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .route("/game", get(get_game))
        .route("/moves", get(get_moves))
        .route("/move", post(make_move))
        .route("/reset", post(reset_game))
        .route("/hints", post(toggle_hints))
        .route("/history", get(get_history))
        .route("/undo", post(undo))
        .route("/redo", post(redo))
        .route("/goto/{move_index}", post(goto_move))
        .route("/export", get(export_game))
        .route("/import", post(import_game))
        .route("/state/export", get(export_state))
        .route("/state/import", post(import_state))
        .route("/health", get(health));

    let router = if config.cors_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let app = router(new_state(), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .expect("failed to bind listener");
    info!("Othello API running on http://{}", config.bind);
    axum::serve(listener, app).await.expect("server error");
}
