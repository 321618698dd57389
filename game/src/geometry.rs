//! Fixed scene geometry and drop timing.
//!
//! All lengths are pixels in canvas space; y grows downwards from the top of the selection strip.

use std::time::Duration;

use engine::{surface::SurfaceSize, ui::Rect};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Disc diameter.
pub const COIN_SIZE: u32 = 50;
/// `floor(COIN_SIZE * 1.3)`.
pub const CELL_SIZE: u32 = COIN_SIZE * 13 / 10;
pub const SELECTION_HEIGHT: u32 = CELL_SIZE;

pub const BOARD_WIDTH: u32 = CELL_SIZE * COLS as u32;
pub const BOARD_HEIGHT: u32 = CELL_SIZE * ROWS as u32;

pub const CANVAS_WIDTH: u32 = BOARD_WIDTH;
pub const CANVAS_HEIGHT: u32 = BOARD_HEIGHT + SELECTION_HEIGHT;

pub const DROP_START_Y: f32 = 35.0;
pub const DROP_STEP: f32 = 5.0;
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

pub const fn canvas_size() -> SurfaceSize {
    SurfaceSize::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

pub fn selection_strip() -> Rect {
    Rect::new(0, 0, BOARD_WIDTH, SELECTION_HEIGHT)
}

pub fn board_rect() -> Rect {
    Rect::new(0, SELECTION_HEIGHT, BOARD_WIDTH, BOARD_HEIGHT)
}

pub fn coin_radius() -> f32 {
    COIN_SIZE as f32 / 2.0
}

pub fn column_center_x(column: usize) -> f32 {
    CELL_SIZE as f32 * (column as f32 + 0.5)
}

/// Centre of a board row counted from the top (`0` is the highest row).
pub fn row_center_y(row_from_top: usize) -> f32 {
    SELECTION_HEIGHT as f32 + (row_from_top as f32 + 0.5) * CELL_SIZE as f32
}

/// Centre of the waiting disc inside the selection strip.
pub fn waiting_center_y() -> f32 {
    SELECTION_HEIGHT as f32 / 2.0
}

/// Ticks a fall takes from [`DROP_START_Y`] to `target_y`, counting the settling tick.
pub fn ticks_to_settle(target_y: f32) -> u32 {
    ((target_y - DROP_START_Y) / DROP_STEP).ceil().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_size_is_floored() {
        assert_eq!(CELL_SIZE, 65);
        assert_eq!((CANVAS_WIDTH, CANVAS_HEIGHT), (455, 455));
    }

    #[test]
    fn bottom_row_centre_sits_half_a_cell_above_canvas_bottom() {
        assert_eq!(row_center_y(ROWS - 1), 422.5);
        assert_eq!(row_center_y(0), 97.5);
        assert_eq!(ticks_to_settle(422.5), 78);
        assert_eq!(ticks_to_settle(97.5), 13);
    }
}
