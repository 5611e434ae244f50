use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Coordinate;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the movement delta for one cell of `cell` units.
    #[must_use]
    pub fn delta(self, cell: i32) -> Coordinate {
        match self {
            Self::Up => Coordinate::new(0, -cell),
            Self::Down => Coordinate::new(0, cell),
            Self::Left => Coordinate::new(-cell, 0),
            Self::Right => Coordinate::new(cell, 0),
        }
    }
}

/// Inputs consumed while a round is running.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
}

/// Inputs consumed by the start/end menu.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MenuInput {
    Char(char),
    Backspace,
    MoreFruit,
    LessFruit,
    Confirm,
    Quit,
}

/// Maps a key press during play. Arrow keys and WASD move; anything else but
/// quit is dropped.
#[must_use]
pub fn map_game_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let direction = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s' | 'S') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D') => Direction::Right,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => return Some(GameInput::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(GameInput::Quit);
        }
        _ => return None,
    };

    Some(GameInput::Direction(direction))
}

/// Maps a key press on the menu, where letters edit the player name.
#[must_use]
pub fn map_menu_key(key: KeyEvent) -> Option<MenuInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(MenuInput::Quit)
        }
        KeyCode::Esc => Some(MenuInput::Quit),
        KeyCode::Enter => Some(MenuInput::Confirm),
        KeyCode::Backspace => Some(MenuInput::Backspace),
        KeyCode::Up | KeyCode::Right => Some(MenuInput::MoreFruit),
        KeyCode::Down | KeyCode::Left => Some(MenuInput::LessFruit),
        KeyCode::Char(ch) if !ch.is_control() => Some(MenuInput::Char(ch)),
        _ => None,
    }
}

/// Waits up to `timeout` for a key press.
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::{Direction, GameInput, MenuInput, map_game_key, map_menu_key};
    use crate::grid::Coordinate;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_directions_have_inverse_deltas() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(direction.opposite().delta(40), -direction.delta(40));
        }
        assert_eq!(Direction::Right.delta(40), Coordinate::new(40, 0));
        assert_eq!(Direction::Up.delta(40), Coordinate::new(0, -40));
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(
            map_game_key(press(KeyCode::Up)),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_game_key(press(KeyCode::Char('a'))),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_game_key(press(KeyCode::Char('s'))),
            Some(GameInput::Direction(Direction::Down))
        );
        assert_eq!(
            map_game_key(press(KeyCode::Right)),
            Some(GameInput::Direction(Direction::Right))
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(map_game_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_game_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Up);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_game_key(key), None);
    }

    #[test]
    fn menu_letters_edit_the_name() {
        assert_eq!(
            map_menu_key(press(KeyCode::Char('w'))),
            Some(MenuInput::Char('w'))
        );
        assert_eq!(map_menu_key(press(KeyCode::Enter)), Some(MenuInput::Confirm));
        assert_eq!(map_menu_key(press(KeyCode::Up)), Some(MenuInput::MoreFruit));
    }
}
