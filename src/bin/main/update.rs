//! The terminal application updater.

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sweep_rs::GameError;

/// The support for the app controls. Each app variant must know what to do when something's being requested.
pub trait ControlsSupport {
    fn move_cursor(&mut self, direction: MoveCursorDirection);
    fn perform_main_action(&mut self) -> Result<(), GameError>;
    fn perform_secondary_action(&mut self) -> Result<(), GameError>;
    fn leave(&mut self, force: bool);
}

/// The available directions to move the cursor to.
#[derive(PartialEq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

pub fn update(app: &mut App, key_event: KeyEvent) -> Result<(), GameError> {
    use MoveCursorDirection::*;

    match key_event.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => app.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => app.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => app.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => app.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.perform_main_action()?,
        KeyCode::Char('f') => app.perform_secondary_action()?,
        KeyCode::Esc | KeyCode::Char('q') => app.leave(false),
        KeyCode::Char('c') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.leave(true);
            }
        }
        _ => {}
    };

    Ok(())
}
