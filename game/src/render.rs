//! Scene drawing. A pure function of [`FrameState`]: drawing the same state twice yields the
//! same pixels.

use engine::graphics::{Circle, Color, Renderer2d};

use crate::animator::AnimationState;
use crate::board::{Board, Piece};
use crate::geometry::{
    board_rect, coin_radius, column_center_x, row_center_y, selection_strip, waiting_center_y,
};
use crate::session::FrameState;

pub const RED: Color = [255, 0, 0, 255];
pub const YELLOW: Color = [255, 255, 0, 255];
pub const BOARD_BLUE: Color = [0, 0, 255, 255];
pub const HOLE_WHITE: Color = [255, 255, 255, 255];
pub const STRIP_GRAY: Color = [128, 128, 128, 255];

pub fn piece_color(piece: Piece) -> Color {
    match piece {
        Piece::PlayerA => RED,
        Piece::PlayerB => YELLOW,
    }
}

fn disc(x: f32, y: f32) -> Circle {
    Circle::new(x, y, coin_radius())
}

/// Holes for every cell, in the same order the board stores them.
pub fn hole_circles(board: &Board) -> Vec<Circle> {
    let mut holes = Vec::with_capacity(board.rows() * board.cols());
    for row_from_top in 0..board.rows() {
        for column in 0..board.cols() {
            holes.push(disc(column_center_x(column), row_center_y(row_from_top)));
        }
    }
    holes
}

/// Draws the selection strip and board into the top-left canvas area of `gfx`.
pub fn render_scene(frame: &FrameState<'_>, gfx: &mut dyn Renderer2d) {
    let falling = match frame.animation {
        AnimationState::Falling(f) => Some((disc(column_center_x(f.column), f.current_y), f.piece)),
        AnimationState::Idle => None,
    };

    gfx.fill_rect(selection_strip(), STRIP_GRAY);

    if let Some((column, piece)) = frame.selector.armed() {
        gfx.fill_circle(disc(column_center_x(column), waiting_center_y()), piece_color(piece));
    }

    // Above the board line; the board covers the rest until the holes are punched.
    if let Some((circle, piece)) = falling {
        gfx.fill_circle(circle, piece_color(piece));
    }

    gfx.fill_rect(board_rect(), BOARD_BLUE);

    let holes = hole_circles(frame.board);
    for hole in &holes {
        gfx.fill_circle(*hole, HOLE_WHITE);
    }
    gfx.clip_to_circles(&holes);

    let rows = frame.board.rows();
    for (row, column, piece) in frame.board.pieces() {
        let row_from_top = rows - 1 - row;
        gfx.fill_circle(
            disc(column_center_x(column), row_center_y(row_from_top)),
            piece_color(piece),
        );
    }

    if let Some((circle, piece)) = falling {
        gfx.fill_circle(circle, piece_color(piece));
    }

    gfx.reset_clip();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_have_distinct_colors() {
        assert_ne!(piece_color(Piece::PlayerA), piece_color(Piece::PlayerB));
        assert_eq!(piece_color(Piece::PlayerA), RED);
    }

    #[test]
    fn one_hole_per_cell() {
        let holes = hole_circles(&Board::new(6, 7));
        assert_eq!(holes.len(), 42);
        assert_eq!(holes[0], Circle::new(32.5, 97.5, 25.0));
        assert_eq!(holes[41], Circle::new(422.5, 422.5, 25.0));
    }
}
