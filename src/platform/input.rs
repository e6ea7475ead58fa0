//! Keyboard shortcuts

use crate::session::Command;

/// Map a `KeyboardEvent.key` value to a command.
///
/// Digits tap grid slots: `1`..`9` are slots 0..8 and `0` is slot 9.
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "Enter" | " " => Some(Command::Start),
        "Escape" | "p" | "P" => Some(Command::TogglePause),
        "h" | "H" => Some(Command::UseHint),
        "q" | "Q" => Some(Command::Quit),
        "m" | "M" => Some(Command::ToggleSound),
        "i" | "I" => Some(Command::ShowInstructions),
        "Backspace" => Some(Command::Home),
        "0" => Some(Command::TapSlot(9)),
        _ => match key.as_bytes() {
            [digit @ b'1'..=b'9'] => Some(Command::TapSlot(usize::from(digit - b'1'))),
            _ => None,
        },
    }
}
