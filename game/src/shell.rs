//! Windowed shell: routes key presses into the session, drains ticks on the event loop's clock
//! and repaints when the session reports a change.

use std::time::Duration;

use engine::app::{GameApp, KeyResponse};
use engine::graphics::Renderer2d;
use engine::surface::SurfaceSize;
use engine::ui::Rect;
use tracing::{debug, info, warn};
use winit::event::VirtualKeyCode;

use crate::error::InvariantViolation;
use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::input_adapter::{InputAction, map_key};
use crate::legend::{draw_legend, legend_height};
use crate::render::render_scene;
use crate::session::{CommandOutcome, GameSession, IgnoreReason};

pub struct DiscDropApp {
    session: GameSession,
    show_legend: bool,
}

impl DiscDropApp {
    pub fn new(session: GameSession, show_legend: bool) -> Self {
        Self {
            session,
            show_legend,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Buffer size: the canvas plus, optionally, the legend band beneath it.
    pub fn buffer_size(&self) -> SurfaceSize {
        buffer_size(self.show_legend)
    }
}

pub fn buffer_size(show_legend: bool) -> SurfaceSize {
    let legend = if show_legend { legend_height() } else { 0 };
    SurfaceSize::new(CANVAS_WIDTH, CANVAS_HEIGHT + legend)
}

/// Draws the full window contents: scene, then the legend band if there is room for it.
pub fn render_frame(session: &GameSession, show_legend: bool, gfx: &mut dyn Renderer2d) {
    render_scene(&session.frame_state(), gfx);
    let size = gfx.size();
    let (_, below) = Rect::from_size(size.width, size.height).split_top(CANVAS_HEIGHT);
    if show_legend && below.h > 0 {
        draw_legend(gfx, below);
    }
}

impl GameApp for DiscDropApp {
    type Error = InvariantViolation;

    fn on_key(&mut self, key: VirtualKeyCode, now: Duration) -> Result<KeyResponse, Self::Error> {
        let Some(action) = map_key(key) else {
            return Ok(KeyResponse::Continue);
        };

        match action {
            InputAction::Command(command) => match self.session.apply(command, now)? {
                CommandOutcome::Ignored(IgnoreReason::ColumnFull) => {
                    warn!(column = self.session.selector().column(), "column is full");
                }
                outcome => debug!(?command, ?outcome, "command applied"),
            },
            InputAction::Reset => self.session.reset(),
            InputAction::Quit => {
                info!("quit requested");
                return Ok(KeyResponse::Exit);
            }
        }
        Ok(KeyResponse::Continue)
    }

    fn update(&mut self, now: Duration) -> Result<Option<Duration>, Self::Error> {
        self.session.advance_to(now)?;
        Ok(self.session.next_tick_due())
    }

    fn needs_redraw(&mut self) -> bool {
        self.session.take_dirty()
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        render_frame(&self.session, self.show_legend, gfx);
    }

    fn shutdown(&mut self, _now: Duration) {
        self.session.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn space_starts_a_drop_and_update_schedules_ticks() {
        let mut app = DiscDropApp::new(GameSession::default(), false);
        assert!(app.needs_redraw());

        assert_eq!(app.on_key(VirtualKeyCode::Space, ms(0)), Ok(KeyResponse::Continue));
        assert!(app.session().animation() != &crate::animator::AnimationState::Idle);
        assert_eq!(app.update(ms(0)), Ok(Some(ms(10))));
        assert!(app.needs_redraw());
        assert!(!app.needs_redraw());

        assert_eq!(app.update(ms(25)), Ok(Some(ms(30))));
        assert!(app.needs_redraw());
    }

    #[test]
    fn settled_drop_stops_waking_the_loop() {
        let mut app = DiscDropApp::new(GameSession::default(), false);
        app.on_key(VirtualKeyCode::Space, ms(0)).unwrap();
        assert_eq!(app.update(ms(10_000)), Ok(None));
        assert_eq!(app.session().board().pieces().count(), 1);
    }

    #[test]
    fn escape_exits_and_shutdown_cancels_the_fall() {
        let mut app = DiscDropApp::new(GameSession::default(), true);
        app.on_key(VirtualKeyCode::Space, ms(0)).unwrap();
        assert_eq!(app.on_key(VirtualKeyCode::Escape, ms(5)), Ok(KeyResponse::Exit));
        app.shutdown(ms(5));
        assert_eq!(app.session().next_tick_due(), None);
        assert_eq!(app.buffer_size(), buffer_size(true));
    }
}
