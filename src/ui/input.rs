/// Keyboard input: turns crossterm key events into game commands.
///
/// The game is turn-based, so there is no held-key tracking. Each key press
/// maps to at most one `Command`; Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::item::PotionKind;
use crate::domain::position::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step (or attack whatever stands there).
    Move(Direction),
    PickUp,
    Drink(PotionKind),
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
                _ => None,
            };
        }
        let cmd = match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Command::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Command::Move(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Command::Move(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Command::Move(Direction::Right),
            KeyCode::Char('g') | KeyCode::Char(',') => Command::PickUp,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('1') | KeyCode::Char('!') => Command::Drink(PotionKind::Healing),
            KeyCode::Char('2') | KeyCode::Char('+') => Command::Drink(PotionKind::Power),
            _ => return None,
        };
        Some(cmd)
    }
}

/// Wait up to `timeout` for the next key that means something.
/// Resize and mouse events are swallowed; `Ok(None)` means nothing arrived.
pub fn next_command(timeout: Duration) -> std::io::Result<Option<Command>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Command::from_key(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_letters_move() {
        assert_eq!(Command::from_key(press(KeyCode::Up)), Some(Command::Move(Direction::Up)));
        assert_eq!(Command::from_key(press(KeyCode::Char('a'))), Some(Command::Move(Direction::Left)));
        assert_eq!(Command::from_key(press(KeyCode::Char('j'))), Some(Command::Move(Direction::Down)));
        assert_eq!(Command::from_key(press(KeyCode::Right)), Some(Command::Move(Direction::Right)));
    }

    #[test]
    fn actions() {
        assert_eq!(Command::from_key(press(KeyCode::Char('g'))), Some(Command::PickUp));
        assert_eq!(Command::from_key(press(KeyCode::Char('1'))), Some(Command::Drink(PotionKind::Healing)));
        assert_eq!(Command::from_key(press(KeyCode::Char('+'))), Some(Command::Drink(PotionKind::Power)));
        assert_eq!(Command::from_key(press(KeyCode::Esc)), Some(Command::Quit));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_nothing() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key(ctrl_c), Some(Command::Quit));
        assert_eq!(Command::from_key(press(KeyCode::Char('c'))), None);
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key(ctrl_w), None);
    }

    #[test]
    fn release_is_ignored() {
        let mut key = press(KeyCode::Up);
        key.kind = KeyEventKind::Release;
        assert_eq!(Command::from_key(key), None);
    }
}
