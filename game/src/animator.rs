//! Drop animation: `Idle -> Falling -> Idle`, advanced by a fixed-interval logical timer.

use std::time::Duration;

use engine::timer::RepeatingTimer;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::board::{Board, Piece};
use crate::error::InvariantViolation;
use crate::geometry::{DROP_START_Y, DROP_STEP, TICK_INTERVAL, row_center_y};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingPiece {
    pub column: usize,
    pub piece: Piece,
    /// Model row (bottom-up) the piece commits into.
    pub landing_row: usize,
    pub current_y: f32,
    pub target_y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Idle,
    Falling(FallingPiece),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    Started(FallingPiece),
    ColumnFull,
    AlreadyFalling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Idle,
    Advanced { current_y: f32 },
    /// The piece passed its target and was committed.
    Settled {
        row: usize,
        column: usize,
        piece: Piece,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropAnimator {
    state: AnimationState,
    timer: RepeatingTimer,
}

impl Default for DropAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl DropAnimator {
    pub fn new() -> Self {
        Self {
            state: AnimationState::Idle,
            timer: RepeatingTimer::new(TICK_INTERVAL),
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn falling(&self) -> Option<&FallingPiece> {
        match &self.state {
            AnimationState::Falling(f) => Some(f),
            AnimationState::Idle => None,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.falling().is_some()
    }

    pub fn next_tick_due(&self) -> Option<Duration> {
        self.timer.next_due()
    }

    /// Starts dropping `piece` into `column` and schedules the first tick one interval after
    /// `now`. A full column leaves the animator idle.
    pub fn trigger(
        &mut self,
        board: &Board,
        column: usize,
        piece: Piece,
        now: Duration,
    ) -> Result<TriggerOutcome, InvariantViolation> {
        if self.is_falling() {
            return Ok(TriggerOutcome::AlreadyFalling);
        }
        let Some(landing_row) = board.landing_row(column)? else {
            return Ok(TriggerOutcome::ColumnFull);
        };

        let row_from_top = board.rows() - 1 - landing_row;
        let falling = FallingPiece {
            column,
            piece,
            landing_row,
            current_y: DROP_START_Y,
            target_y: row_center_y(row_from_top),
        };
        self.state = AnimationState::Falling(falling);
        self.timer.start(now);
        debug!(column, landing_row, target_y = falling.target_y, "drop started");
        Ok(TriggerOutcome::Started(falling))
    }

    /// Pops the next tick due at or before `now`, if any.
    pub fn poll_due(&mut self, now: Duration) -> Option<Duration> {
        self.timer.poll(now)
    }

    /// Advances the falling piece by one step, committing it into `board` once it passes its
    /// target.
    pub fn tick(&mut self, board: &mut Board) -> Result<TickOutcome, InvariantViolation> {
        let AnimationState::Falling(falling) = &mut self.state else {
            self.timer.cancel();
            return Ok(TickOutcome::Idle);
        };

        let next_y = falling.current_y + DROP_STEP;
        if next_y <= falling.target_y {
            falling.current_y = next_y;
            trace!(current_y = next_y, "drop tick");
            return Ok(TickOutcome::Advanced { current_y: next_y });
        }

        let FallingPiece {
            column,
            piece,
            landing_row,
            ..
        } = *falling;
        self.timer.cancel();
        self.state = AnimationState::Idle;
        board.commit(landing_row, column, piece)?;
        debug!(column, row = landing_row, ?piece, "piece settled");
        Ok(TickOutcome::Settled {
            row: landing_row,
            column,
            piece,
        })
    }

    /// Abandons any fall in progress and stops the tick schedule.
    pub fn cancel(&mut self) {
        if self.is_falling() {
            debug!("drop cancelled");
        }
        self.timer.cancel();
        self.state = AnimationState::Idle;
    }
}
