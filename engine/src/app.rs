use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    /// Size of the frame buffer the game draws into.
    pub buffer_size: SurfaceSize,
    /// Integer zoom applied to the initial window size.
    pub scale: u32,
    pub vsync: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Continue,
    Exit,
}

/// An event-driven game hosted by [`run_game`].
///
/// All timestamps are offsets from loop start, so the game only ever sees one monotonic clock
/// shared by input and timers.
pub trait GameApp {
    type Error: Error + 'static;

    fn on_key(&mut self, key: VirtualKeyCode, now: Duration) -> Result<KeyResponse, Self::Error>;

    /// Runs everything due at `now`; returns when the loop should next wake up, if ever.
    fn update(&mut self, now: Duration) -> Result<Option<Duration>, Self::Error>;

    /// Returns `true` once per batch of state changes.
    fn needs_redraw(&mut self) -> bool;

    fn render(&mut self, gfx: &mut dyn Renderer2d);

    fn shutdown(&mut self, _now: Duration) {}
}

pub fn run_game<G: GameApp>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let mut event_loop = EventLoop::new();
    let scale = config.scale.max(1);
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(LogicalSize::new(
            config.buffer_size.width * scale,
            config.buffer_size.height * scale,
        ))
        .with_min_inner_size(LogicalSize::new(
            config.buffer_size.width,
            config.buffer_size.height,
        ))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);
    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut pixels_builder = PixelsBuilder::new(
        config.buffer_size.width,
        config.buffer_size.height,
        surface_texture,
    );
    if let Some(vsync) = config.vsync {
        pixels_builder = pixels_builder.enable_vsync(vsync);
    }
    let pixels = pixels_builder.build()?;
    let mut renderer = PixelsRenderer2d::new(pixels, config.buffer_size)?;
    let started = Instant::now();
    let mut failure: Option<Box<dyn Error>> = None;

    info!(
        width = config.buffer_size.width,
        height = config.buffer_size.height,
        "event loop starting"
    );

    event_loop.run_return(|event, _, control_flow| {
        let now = started.elapsed();

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    control_flow.set_exit();
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) =
                        renderer.resize_surface(SurfaceSize::new(size.width, size.height))
                    {
                        warn!(%err, "surface resize failed");
                    }
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match game.on_key(key, now) {
                    Ok(KeyResponse::Continue) => {}
                    Ok(KeyResponse::Exit) => control_flow.set_exit(),
                    Err(err) => {
                        error!(%err, "game rejected input with a fatal error");
                        failure = Some(Box::new(err));
                        control_flow.set_exit_with_code(1);
                    }
                },
                _ => {}
            },
            Event::MainEventsCleared => {
                if matches!(*control_flow, ControlFlow::ExitWithCode(_)) {
                    return;
                }
                match game.update(now) {
                    Ok(next_wake) => {
                        if game.needs_redraw() {
                            window.request_redraw();
                        }
                        match next_wake {
                            Some(at) => control_flow.set_wait_until(started + at),
                            None => control_flow.set_wait(),
                        }
                    }
                    Err(err) => {
                        error!(%err, "game update failed");
                        failure = Some(Box::new(err));
                        control_flow.set_exit_with_code(1);
                    }
                }
            }
            Event::RedrawRequested(_) => {
                renderer.draw_frame(|gfx| game.render(gfx));
                if let Err(err) = renderer.present() {
                    error!(%err, "present failed");
                    failure = Some(Box::new(err));
                    control_flow.set_exit_with_code(1);
                }
            }
            Event::LoopDestroyed => {
                debug!("event loop shutting down");
                game.shutdown(now);
            }
            _ => {}
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
