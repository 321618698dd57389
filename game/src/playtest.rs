use engine::GameLogic;
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::session::{Command, GameSession, SessionConfig};

/// One scripted step of a headless session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Command(Command),
    /// Runs the next scheduled drop tick, if one is pending.
    Tick,
    /// Runs drop ticks until nothing is falling.
    Settle,
    Reset,
}

impl From<Command> for SessionEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiscDropLogic {
    config: SessionConfig,
}

impl DiscDropLogic {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }
}

impl GameLogic for DiscDropLogic {
    type State = GameSession;
    type Input = SessionEvent;
    type Error = InvariantViolation;

    fn initial_state(&self) -> Self::State {
        GameSession::new(self.config)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Result<Self::State, Self::Error> {
        let mut next = state.clone();

        match input {
            SessionEvent::Command(command) => {
                next.execute(command)?;
            }
            SessionEvent::Tick => {
                next.step_tick()?;
            }
            SessionEvent::Settle => {
                while next.step_tick()?.is_some() {}
            }
            SessionEvent::Reset => next.reset(),
        }

        Ok(next)
    }
}

/// Expands `Drop` commands into a drop followed by `Settle`, which is how a player at the
/// keyboard experiences them.
pub fn settled_drops<I>(commands: I) -> Vec<SessionEvent>
where
    I: IntoIterator<Item = Command>,
{
    commands
        .into_iter()
        .flat_map(|command| {
            let settle = (command == Command::Drop).then_some(SessionEvent::Settle);
            std::iter::once(SessionEvent::Command(command)).chain(settle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Piece};

    #[test]
    fn drop_then_settle_commits_one_piece() {
        let game = DiscDropLogic::default();
        let s0 = game.initial_state();
        let s1 = game.step(&s0, Command::Drop.into()).unwrap();
        assert!(s1.selector().armed().is_none());

        let s2 = game.step(&s1, SessionEvent::Settle).unwrap();
        assert_eq!(s2.board().get(0, 0), Ok(Cell::Filled(Piece::PlayerA)));
        assert_eq!(s2.selector().armed(), Some((0, Piece::PlayerB)));
        // The input state is untouched.
        assert_eq!(s0.board().pieces().count(), 0);
    }

    #[test]
    fn settled_drops_inserts_settle_after_each_drop() {
        assert_eq!(
            settled_drops([Command::MoveRight, Command::Drop]),
            vec![
                SessionEvent::Command(Command::MoveRight),
                SessionEvent::Command(Command::Drop),
                SessionEvent::Settle,
            ]
        );
    }

    #[test]
    fn tick_without_a_fall_is_a_noop() {
        let game = DiscDropLogic::default();
        let s0 = game.initial_state();
        let s1 = game.step(&s0, SessionEvent::Tick).unwrap();
        assert_eq!(s1.board(), s0.board());
        assert_eq!(s1.selector(), s0.selector());
    }
}
