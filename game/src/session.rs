//! The game session: board, selector and animator behind one ordered stream of commands and
//! timer ticks.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animator::{AnimationState, DropAnimator, TickOutcome, TriggerOutcome};
use crate::board::{Board, Piece};
use crate::error::InvariantViolation;
use crate::geometry::{COLS, ROWS};
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Navigation with no piece waiting.
    Disarmed,
    /// A drop is already in flight.
    Falling,
    ColumnFull,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Moved { column: usize },
    DropStarted { column: usize, landing_row: usize },
    Ignored(IgnoreReason),
}

/// Which piece is armed after each settled drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPolicy {
    #[default]
    Alternate,
    /// Always re-arm the first piece.
    Fixed,
}

impl TurnPolicy {
    pub fn next_piece(self, settled: Piece, first: Piece) -> Piece {
        match self {
            Self::Alternate => settled.other(),
            Self::Fixed => first,
        }
    }
}

/// Gameplay options. The board is always [`ROWS`] x [`COLS`]; the scene geometry is built
/// around that size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub start_column: usize,
    pub first_piece: Piece,
    pub turn_policy: TurnPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_column: 0,
            first_piece: Piece::PlayerA,
            turn_policy: TurnPolicy::Alternate,
        }
    }
}

impl SessionConfig {
    /// Pulls the start column onto the board.
    pub fn normalized(mut self) -> Self {
        self.start_column = self.start_column.min(COLS - 1);
        self
    }
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    pub board: &'a Board,
    pub selector: &'a Selector,
    pub animation: &'a AnimationState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    selector: Selector,
    animator: DropAnimator,
    /// Logical time of the last processed event.
    #[serde(with = "engine::serde_duration")]
    clock: Duration,
    /// Not persisted; a freshly loaded session always needs a first paint.
    #[serde(skip, default = "needs_first_paint")]
    dirty: bool,
}

fn needs_first_paint() -> bool {
    true
}

/// Equality ignores the repaint flag: two sessions are equal when they would render and behave
/// the same.
impl PartialEq for GameSession {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.board == other.board
            && self.selector == other.selector
            && self.animator == other.animator
            && self.clock == other.clock
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let config = config.normalized();
        Self {
            config,
            board: Board::new(ROWS, COLS),
            selector: Self::fresh_selector(config),
            animator: DropAnimator::new(),
            clock: Duration::ZERO,
            dirty: true,
        }
    }

    fn fresh_selector(config: SessionConfig) -> Selector {
        Selector::clamped(COLS, config.start_column, config.first_piece)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn animation(&self) -> &AnimationState {
        self.animator.state()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn frame_state(&self) -> FrameState<'_> {
        FrameState {
            board: &self.board,
            selector: &self.selector,
            animation: self.animator.state(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn next_tick_due(&self) -> Option<Duration> {
        self.animator.next_tick_due()
    }

    /// Runs every tick due at or before `now`, in order. Returns how many ticks ran.
    ///
    /// Time never runs backwards: an earlier `now` is treated as the current clock.
    pub fn advance_to(&mut self, now: Duration) -> Result<usize, InvariantViolation> {
        let now = now.max(self.clock);
        let mut ticks = 0;
        while let Some(due) = self.animator.poll_due(now) {
            self.clock = due;
            self.apply_tick()?;
            ticks += 1;
        }
        self.clock = now;
        Ok(ticks)
    }

    /// Jumps the clock to the next scheduled tick and runs it. `None` when nothing is falling.
    pub fn step_tick(&mut self) -> Result<Option<TickOutcome>, InvariantViolation> {
        let Some(due) = self.animator.poll_due(Duration::MAX) else {
            return Ok(None);
        };
        self.clock = self.clock.max(due);
        self.apply_tick().map(Some)
    }

    fn apply_tick(&mut self) -> Result<TickOutcome, InvariantViolation> {
        let outcome = self.animator.tick(&mut self.board)?;
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Advanced { .. } => self.dirty = true,
            TickOutcome::Settled { piece, .. } => {
                let next = self
                    .config
                    .turn_policy
                    .next_piece(piece, self.config.first_piece);
                self.selector.arm(self.config.start_column, next)?;
                self.dirty = true;
            }
        }
        Ok(outcome)
    }

    /// Processes everything due before `now`, then `command`.
    pub fn apply(&mut self, command: Command, now: Duration) -> Result<CommandOutcome, InvariantViolation> {
        self.advance_to(now)?;
        self.execute(command)
    }

    /// Applies `command` at the current logical time.
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, InvariantViolation> {
        let outcome = match command {
            Command::MoveLeft | Command::MoveRight => {
                let moved = if command == Command::MoveLeft {
                    self.selector.move_left()
                } else {
                    self.selector.move_right()
                };
                if moved {
                    self.dirty = true;
                    CommandOutcome::Moved {
                        column: self.selector.column(),
                    }
                } else {
                    CommandOutcome::Ignored(IgnoreReason::Disarmed)
                }
            }
            Command::Drop => self.drop_armed()?,
        };

        if let CommandOutcome::Ignored(reason) = outcome {
            debug!(?command, ?reason, "command ignored");
        }
        Ok(outcome)
    }

    fn drop_armed(&mut self) -> Result<CommandOutcome, InvariantViolation> {
        let Some((column, piece)) = self.selector.armed() else {
            return Ok(CommandOutcome::Ignored(IgnoreReason::Falling));
        };
        match self.animator.trigger(&self.board, column, piece, self.clock)? {
            TriggerOutcome::Started(falling) => {
                self.selector.disarm();
                self.dirty = true;
                Ok(CommandOutcome::DropStarted {
                    column,
                    landing_row: falling.landing_row,
                })
            }
            TriggerOutcome::ColumnFull => Ok(CommandOutcome::Ignored(IgnoreReason::ColumnFull)),
            TriggerOutcome::AlreadyFalling => Ok(CommandOutcome::Ignored(IgnoreReason::Falling)),
        }
    }

    /// Starts over with an empty board, cancelling any fall in progress.
    pub fn reset(&mut self) {
        self.animator.cancel();
        self.board = Board::new(ROWS, COLS);
        self.selector = Self::fresh_selector(self.config);
        self.dirty = true;
        info!("session reset");
    }

    /// Stops the tick schedule; the session stays readable but nothing is falling anymore.
    pub fn shutdown(&mut self) {
        if self.animator.is_falling() {
            debug!("shutdown while falling; tick schedule cancelled");
        }
        self.animator.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn new_session_is_armed_and_dirty() {
        let mut s = GameSession::default();
        assert_eq!(s.selector().armed(), Some((0, Piece::PlayerA)));
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
    }

    #[test]
    fn config_is_normalized() {
        let s = GameSession::new(SessionConfig {
            start_column: 99,
            ..SessionConfig::default()
        });
        assert_eq!(s.selector().column(), COLS - 1);
    }

    #[test]
    fn loaded_session_needs_a_repaint() {
        let mut s = GameSession::default();
        s.apply(Command::Drop, ms(0)).unwrap();
        s.take_dirty();

        let json = serde_json::to_string(&s).unwrap();
        let loaded: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, s);
        assert!(loaded.is_dirty());
    }

    #[test]
    fn ignored_commands_do_not_dirty_the_frame() {
        let mut s = GameSession::default();
        s.apply(Command::Drop, ms(0)).unwrap();
        s.take_dirty();
        assert_eq!(
            s.execute(Command::MoveLeft).unwrap(),
            CommandOutcome::Ignored(IgnoreReason::Disarmed)
        );
        assert!(!s.is_dirty());
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut s = GameSession::default();
        s.apply(Command::Drop, ms(100)).unwrap();
        assert_eq!(s.advance_to(ms(50)).unwrap(), 0);
        assert_eq!(s.clock(), ms(100));
        assert_eq!(s.advance_to(ms(130)).unwrap(), 3);
    }

    #[test]
    fn fixed_policy_rearms_the_same_piece() {
        let mut s = GameSession::new(SessionConfig {
            turn_policy: TurnPolicy::Fixed,
            first_piece: Piece::PlayerB,
            ..SessionConfig::default()
        });
        s.apply(Command::Drop, ms(0)).unwrap();
        while s.step_tick().unwrap().is_some() {}
        assert_eq!(s.selector().armed(), Some((0, Piece::PlayerB)));
    }
}
