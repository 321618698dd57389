pub mod animator;
pub mod board;
pub mod error;
pub mod geometry;
pub mod input_adapter;
pub mod legend;
pub mod logging;
pub mod playtest;
pub mod render;
pub mod selector;
pub mod session;
pub mod settings;
pub mod shell;

pub use board::{Board, Cell, Piece};
pub use error::{InvariantViolation, SettingsError};
pub use session::{Command, CommandOutcome, FrameState, GameSession, IgnoreReason, TurnPolicy};
