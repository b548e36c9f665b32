//! Key bindings for the game, menus and prompts.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use maze_runner_core::Direction;
use maze_runner_rendering::PlayerAction;

/// Navigation request inside a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuKey {
    Previous,
    Next,
    Select,
    /// Direct pick of the zero-based entry through a number key.
    Pick(usize),
    Back,
}

/// Answer to a yes/no/cancel prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Answer {
    Yes,
    No,
    Cancel,
}

fn is_press(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

/// Maps an in-game key to a player action.
pub(crate) fn action_for(key: KeyEvent) -> Option<PlayerAction> {
    if !is_press(&key) {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('w' | 'W') | KeyCode::Up => PlayerAction::Move(Direction::Up),
        KeyCode::Char('s' | 'S') | KeyCode::Down => PlayerAction::Move(Direction::Down),
        KeyCode::Char('a' | 'A') | KeyCode::Left => PlayerAction::Move(Direction::Left),
        KeyCode::Char('d' | 'D') | KeyCode::Right => PlayerAction::Move(Direction::Right),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => PlayerAction::Quit,
        KeyCode::Char(digit @ '1'..='9') => PlayerAction::UseItem(slot_for(digit)?),
        _ => return None,
    };
    Some(action)
}

/// Maps a key pressed inside a menu.
pub(crate) fn menu_key(key: KeyEvent) -> Option<MenuKey> {
    if !is_press(&key) {
        return None;
    }
    match key.code {
        KeyCode::Char('w' | 'W') | KeyCode::Up => Some(MenuKey::Previous),
        KeyCode::Char('s' | 'S') | KeyCode::Down => Some(MenuKey::Next),
        KeyCode::Enter => Some(MenuKey::Select),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(MenuKey::Back),
        KeyCode::Char(digit @ '1'..='9') => slot_for(digit).map(MenuKey::Pick),
        _ => None,
    }
}

/// Maps a key pressed while a yes/no/cancel prompt is open.
pub(crate) fn answer_for(key: KeyEvent) -> Option<Answer> {
    if !is_press(&key) {
        return None;
    }
    match key.code {
        KeyCode::Char('y' | 'Y') => Some(Answer::Yes),
        KeyCode::Char('n' | 'N') => Some(Answer::No),
        KeyCode::Char('c' | 'C') | KeyCode::Esc => Some(Answer::Cancel),
        _ => None,
    }
}

/// Reports whether the key dismisses a notice.
pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    is_press(&key) && matches!(key.code, KeyCode::Enter | KeyCode::Esc)
}

fn slot_for(digit: char) -> Option<usize> {
    let value = digit.to_digit(10)?;
    usize::try_from(value).ok()?.checked_sub(1)
}
