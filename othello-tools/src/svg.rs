//! Render board states to SVG.

use std::fmt::Write;

use othello_core::{Board, Player, Pos, SIZE};

// ============================================================================
// Constants matching web UI CSS
// ============================================================================

const CELL_SIZE: f32 = 56.0;
const CELL_GAP: f32 = 2.0;
const BOARD_PADDING: f32 = 12.0;
const BOARD_RADIUS: f32 = 10.0;
const DISC_DIAMETER: f32 = 46.0;
const HINT_DIAMETER: f32 = 14.0;

// Image padding (space around the entire content)
const IMAGE_PADDING: f32 = 16.0;

// Colors
const BG_COLOR: &str = "#1a1a1a";
const BOARD_BG: &str = "#0b3d23";
const CELL_BG: &str = "#1e7a46";
const BLACK_GRADIENT_START: &str = "#4a4a4a";
const BLACK_GRADIENT_END: &str = "#0a0a0a";
const WHITE_GRADIENT_START: &str = "#ffffff";
const WHITE_GRADIENT_END: &str = "#d0d0d0";

// Highlight colors
const HIGHLIGHT_LAST_MOVE: &str = "#f39c12";
const HINT_COLOR: &str = "rgba(255,255,255,0.35)";

// Score panel
const SCORE_HEIGHT: f32 = 56.0;
const SCORE_GAP: f32 = 12.0;
const SCORE_RADIUS: f32 = 10.0;
const SCORE_INACTIVE_OPACITY: f32 = 0.6;

/// Options for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Last move, outlined
    pub highlight_cell: Option<Pos>,
    /// Cells marked with a hint dot
    pub hints: Vec<Pos>,
    /// Draw the disc counts below the board, dimming the side not to move
    pub score_for: Option<Player>,
    /// Scale factor (1.0 = 56px cells)
    pub scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            highlight_cell: None,
            hints: Vec::new(),
            score_for: None,
            scale: 1.0,
        }
    }
}

fn gradient(player: Player) -> &'static str {
    match player {
        Player::Black => "url(#black-grad)",
        Player::White => "url(#white-grad)",
    }
}

/// Generate SVG for a board state
pub fn render_board_svg(board: &Board, opts: &RenderOptions) -> String {
    let scale = if opts.scale > 0.0 { opts.scale } else { 1.0 };
    let cells = SIZE as f32;

    let board_inner = cells * CELL_SIZE + (cells - 1.0) * CELL_GAP;
    let board_outer = board_inner + 2.0 * BOARD_PADDING;

    let content_height = if opts.score_for.is_some() {
        board_outer + SCORE_GAP + SCORE_HEIGHT
    } else {
        board_outer
    };

    let width = board_outer + 2.0 * IMAGE_PADDING;
    let height = content_height + 2.0 * IMAGE_PADDING;

    let mut svg = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width * scale,
        height * scale,
        width,
        height
    );

    svg.push_str("  <defs>\n");
    for (id, start, end) in [
        ("black-grad", BLACK_GRADIENT_START, BLACK_GRADIENT_END),
        ("white-grad", WHITE_GRADIENT_START, WHITE_GRADIENT_END),
    ] {
        let _ = write!(
            svg,
            r#"    <linearGradient id="{id}" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{start}"/>
      <stop offset="100%" style="stop-color:{end}"/>
    </linearGradient>
"#
        );
    }
    svg.push_str("  </defs>\n");

    let _ = writeln!(
        svg,
        r#"  <rect width="{width}" height="{height}" fill="{BG_COLOR}"/>"#
    );
    let _ = writeln!(
        svg,
        r#"  <rect x="{IMAGE_PADDING}" y="{IMAGE_PADDING}" width="{board_outer}" height="{board_outer}" rx="{BOARD_RADIUS}" fill="{BOARD_BG}"/>"#
    );

    for pos in Pos::all() {
        let x = IMAGE_PADDING + BOARD_PADDING + pos.col() as f32 * (CELL_SIZE + CELL_GAP);
        let y = IMAGE_PADDING + BOARD_PADDING + pos.row() as f32 * (CELL_SIZE + CELL_GAP);

        let (stroke, stroke_width) = if opts.highlight_cell == Some(pos) {
            (HIGHLIGHT_LAST_MOVE, 3.0)
        } else {
            ("transparent", 0.0)
        };
        let _ = writeln!(
            svg,
            r#"  <rect x="{x}" y="{y}" width="{CELL_SIZE}" height="{CELL_SIZE}" fill="{CELL_BG}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#
        );

        let cx = x + CELL_SIZE / 2.0;
        let cy = y + CELL_SIZE / 2.0;
        if let Some(owner) = board.cell(pos).owner() {
            let _ = writeln!(
                svg,
                r#"  <circle cx="{cx}" cy="{cy}" r="{}" fill="{}" stroke="rgba(0,0,0,0.3)" stroke-width="2"/>"#,
                DISC_DIAMETER / 2.0,
                gradient(owner)
            );
        } else if opts.hints.contains(&pos) {
            let _ = writeln!(
                svg,
                r#"  <circle class="hint" cx="{cx}" cy="{cy}" r="{}" fill="{HINT_COLOR}"/>"#,
                HINT_DIAMETER / 2.0
            );
        }
    }

    if let Some(to_move) = opts.score_for {
        let y = IMAGE_PADDING + board_outer + SCORE_GAP;
        svg.push_str(&render_score_svg(board, to_move, IMAGE_PADDING, y, board_outer));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Two score panels side by side; the side not to move is dimmed.
fn render_score_svg(board: &Board, to_move: Player, x: f32, y: f32, total_width: f32) -> String {
    let mut svg = String::new();
    let panel_width = (total_width - SCORE_GAP) / 2.0;

    for (i, player) in Player::all().enumerate() {
        let px = x + i as f32 * (panel_width + SCORE_GAP);
        let opacity = if player == to_move {
            1.0
        } else {
            SCORE_INACTIVE_OPACITY
        };

        let _ = writeln!(svg, "  <g opacity=\"{opacity}\">");
        let _ = writeln!(
            svg,
            "    <rect x=\"{px}\" y=\"{y}\" width=\"{panel_width}\" height=\"{SCORE_HEIGHT}\" rx=\"{SCORE_RADIUS}\" fill=\"{BOARD_BG}\"/>"
        );
        let _ = writeln!(
            svg,
            "    <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"rgba(0,0,0,0.3)\" stroke-width=\"2\"/>",
            px + 30.0,
            y + SCORE_HEIGHT / 2.0,
            DISC_DIAMETER / 4.0,
            gradient(player)
        );
        let _ = writeln!(
            svg,
            "    <text x=\"{}\" y=\"{}\" font-family=\"system-ui, sans-serif\" font-size=\"18\" font-weight=\"bold\" fill=\"#eee\">{} {}</text>",
            px + 56.0,
            y + SCORE_HEIGHT / 2.0 + 6.0,
            player,
            board.count(player)
        );
        svg.push_str("  </g>\n");
    }

    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_has_four_discs() {
        let svg = render_board_svg(&Board::new(), &RenderOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("url(#black-grad)").count(), 2);
        assert_eq!(svg.matches("url(#white-grad)").count(), 2);
    }

    #[test]
    fn test_hints_and_highlight() {
        let board = Board::new();
        let opts = RenderOptions {
            highlight_cell: Some(Pos::from_row_col(3, 3)),
            hints: board.legal_moves(Player::Black),
            ..RenderOptions::default()
        };
        let svg = render_board_svg(&board, &opts);
        assert_eq!(svg.matches("class=\"hint\"").count(), 4);
        assert_eq!(svg.matches(HIGHLIGHT_LAST_MOVE).count(), 1);
    }

    #[test]
    fn test_hint_on_occupied_cell_ignored() {
        let opts = RenderOptions {
            hints: vec![Pos::from_row_col(3, 3)],
            ..RenderOptions::default()
        };
        let svg = render_board_svg(&Board::new(), &opts);
        assert_eq!(svg.matches("class=\"hint\"").count(), 0);
    }

    #[test]
    fn test_score_panel() {
        let opts = RenderOptions {
            score_for: Some(Player::White),
            ..RenderOptions::default()
        };
        let svg = render_board_svg(&Board::new(), &opts);
        assert!(svg.contains(">Black 2</text>"));
        assert!(svg.contains(">White 2</text>"));
        assert!(svg.contains(&format!("opacity=\"{SCORE_INACTIVE_OPACITY}\"")));
    }

    #[test]
    fn test_scale_only_changes_outer_size() {
        let small = render_board_svg(&Board::new(), &RenderOptions::default());
        let big = render_board_svg(
            &Board::new(),
            &RenderOptions {
                scale: 2.0,
                ..RenderOptions::default()
            },
        );
        let body = |s: &str| s.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(body(&small), body(&big));
        assert_ne!(small.lines().next(), big.lines().next());
    }
}
