use winit::event::VirtualKeyCode;

use crate::session::Command;

/// What a key press asks of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Command(Command),
    Reset,
    Quit,
}

pub fn map_key(key: VirtualKeyCode) -> Option<InputAction> {
    match key {
        VirtualKeyCode::Left => Some(InputAction::Command(Command::MoveLeft)),
        VirtualKeyCode::Right => Some(InputAction::Command(Command::MoveRight)),
        VirtualKeyCode::Space => Some(InputAction::Command(Command::Drop)),
        VirtualKeyCode::R => Some(InputAction::Reset),
        VirtualKeyCode::Escape | VirtualKeyCode::Q => Some(InputAction::Quit),
        _ => None,
    }
}
