use std::time::Duration;

use disc_drop::board::Piece;
use disc_drop::geometry::{CANVAS_HEIGHT, COLS, ROWS, canvas_size};
use disc_drop::render::{
    BOARD_BLUE, HOLE_WHITE, RED, STRIP_GRAY, YELLOW, hole_circles, render_scene,
};
use disc_drop::session::{Command, GameSession, SessionConfig, TurnPolicy};
use disc_drop::shell::{buffer_size, render_frame};
use engine::graphics::{CpuRenderer, Renderer2d};
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};

fn draw(session: &GameSession, fill: u8) -> RgbaBufferSurface {
    let size = canvas_size();
    let mut surface = RgbaBufferSurface::new(size);
    surface.frame_mut().fill(fill);
    {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        gfx.begin_frame(size);
        render_scene(&session.frame_state(), &mut gfx);
    }
    surface
}

#[test]
fn empty_board_layers() {
    let s = draw(&GameSession::default(), 0);

    assert_eq!(s.pixel(200, 5), Some(STRIP_GRAY));
    assert_eq!(s.pixel(32, 32), Some(RED), "waiting piece over column 0");
    assert_eq!(s.pixel(97, 32), Some(STRIP_GRAY), "nothing waits over column 1");
    assert_eq!(s.pixel(32, 97), Some(HOLE_WHITE));
    assert_eq!(s.pixel(65, 97), Some(BOARD_BLUE), "board between two holes");
    assert_eq!(s.pixel(0, 70), Some(BOARD_BLUE));
    assert_eq!(s.pixel(422, 422), Some(HOLE_WHITE));
}

#[test]
fn settled_piece_renders_in_bottom_row() {
    let mut session = GameSession::default();
    session.execute(Command::Drop).unwrap();
    while session.step_tick().unwrap().is_some() {}

    let s = draw(&session, 0);
    assert_eq!(s.pixel(32, 422), Some(RED));
    assert_eq!(s.pixel(32, 357), Some(HOLE_WHITE), "row above is still empty");
    assert_eq!(s.pixel(32, 32), Some(YELLOW), "next player waits");
}

#[test]
fn falling_piece_shows_over_strip_and_through_holes_only() {
    let mut session = GameSession::default();
    session.apply(Command::Drop, Duration::ZERO).unwrap();
    session.advance_to(Duration::from_millis(50)).unwrap();

    let s = draw(&session, 0);
    // Centre at y = 60: no waiting piece, the fall is drawn over the strip.
    assert_eq!(s.pixel(32, 60), Some(RED));
    // Inside the top-left hole.
    assert_eq!(s.pixel(32, 80), Some(RED));
    // Covered by the disc but outside any hole: the board hides it.
    assert_eq!(s.pixel(32, 68), Some(BOARD_BLUE));
}

#[test]
fn render_is_idempotent_and_ignores_previous_contents() {
    let mut session = GameSession::default();
    session.execute(Command::MoveRight).unwrap();
    session.apply(Command::Drop, Duration::ZERO).unwrap();
    session.advance_to(Duration::from_millis(200)).unwrap();

    let a = draw(&session, 0);
    let b = draw(&session, 0);
    let c = draw(&session, 0xAB);
    assert_eq!(a.frame(), b.frame());
    assert_eq!(a.frame(), c.frame());
}

#[test]
fn legend_band_is_drawn_below_canvas() {
    let session = GameSession::default();
    let size = buffer_size(true);
    assert!(size.height > CANVAS_HEIGHT);

    let mut surface = RgbaBufferSurface::new(size);
    {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        gfx.begin_frame(size);
        render_frame(&session, true, &mut gfx);
    }
    let below = surface.pixel(1, CANVAS_HEIGHT + 1).expect("in bounds");
    assert_eq!(below[3], 255, "legend band is opaque");
    assert_ne!(below, BOARD_BLUE);
    assert_eq!(surface.pixel(32, 32), Some(RED));

    assert_eq!(buffer_size(false), SurfaceSize::new(455, 455));
}

#[test]
fn every_hole_fits_the_canvas_for_any_session_config() {
    let configs = [
        SessionConfig::default(),
        SessionConfig {
            start_column: 99,
            turn_policy: TurnPolicy::Fixed,
            first_piece: Piece::PlayerB,
        },
    ];
    let canvas = canvas_size();
    for config in configs {
        let session = GameSession::new(config);
        assert_eq!((session.board().rows(), session.board().cols()), (ROWS, COLS));
        for hole in hole_circles(session.board()) {
            assert!(hole.cx - hole.radius >= 0.0 && hole.cx + hole.radius <= canvas.width as f32);
            assert!(hole.cy - hole.radius >= 0.0 && hole.cy + hole.radius <= canvas.height as f32);
        }
    }
}
