//! The terminal application

use crate::app::MoveCursorDirection::{Down, Left, Right, Up};
use crate::game_ui::render_game;
use crate::menu_ui::render_menu;
use crate::tui::Render;
use crate::update::{ControlsSupport, MoveCursorDirection};
use clap::ValueEnum;
use ratatui::Frame;
use std::cmp;
pub use sweep_rs::Game;
use sweep_rs::{GameError, GameOutcome};

/// The available difficulty presets. Each one is a fixed field size and bomb count.
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Difficulty {
    /// A 9x9 field with 10 bombs.
    Easy,
    /// A 15x15 field with 40 bombs.
    Normal,
    /// A 15x29 field with 99 bombs.
    Hard,
}

impl Difficulty {
    /// All the presets in their menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// The field width, height and bomb count of the preset.
    pub fn preset(&self) -> (u16, u16, u32) {
        match self {
            Difficulty::Easy => (9, 9, 10),
            Difficulty::Normal => (15, 15, 40),
            Difficulty::Hard => (15, 29, 99),
        }
    }

    /// The preset's name as displayed in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

/// The terminal application
#[derive(Debug)]
pub struct App {
    /// The app can be represented by one variant at a time.
    pub variant: AppVariant,
    /// Indicates that the main application loop should be broken on the next tick and thus the app should quit.
    pub should_quit: bool,
}

impl App {
    /// The app starts straight in a round of the requested difficulty; the menu is reached by
    /// leaving the round.
    pub fn new(difficulty: Difficulty) -> Result<App, GameError> {
        Ok(App {
            variant: AppVariant::InGame(AppGame::new(difficulty)?),
            should_quit: false,
        })
    }

    pub fn tick(&mut self) {
        match &self.variant {
            AppVariant::InMenu(menu) if menu.should_quit => self.quit(),
            AppVariant::InGame(game) => {
                if game.should_leave {
                    self.back_to_menu()
                } else if game.should_emergency_leave {
                    self.quit()
                }
            }
            _ => (),
        };
    }

    pub fn back_to_menu(&mut self) {
        if let AppVariant::InGame(game) = &self.variant {
            self.variant = AppVariant::InMenu(AppMenu::new(game.difficulty))
        };
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl ControlsSupport for App {
    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        self.variant.move_cursor(direction);
    }

    fn perform_main_action(&mut self) -> Result<(), GameError> {
        self.variant.perform_main_action()
    }

    fn perform_secondary_action(&mut self) -> Result<(), GameError> {
        self.variant.perform_secondary_action()
    }

    fn leave(&mut self, force: bool) {
        self.variant.leave(force);
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        self.variant.render(frame);
    }
}

/// The current application variant.
#[derive(Debug)]
pub enum AppVariant {
    /// When the menu's being displayed
    InMenu(AppMenu),
    /// When the game's being displayed
    InGame(AppGame),
}

impl ControlsSupport for AppVariant {
    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        match self {
            AppVariant::InMenu(menu) => menu.move_cursor(direction),
            AppVariant::InGame(game) => game.move_cursor(direction),
        }
    }

    fn perform_main_action(&mut self) -> Result<(), GameError> {
        match self {
            AppVariant::InMenu(menu) => {
                *self = AppVariant::InGame(menu.create_new_round()?);
            }
            AppVariant::InGame(game) => {
                let result = game.reveal_or_restart_or_confirm_leave()?;

                if let Some(difficulty) = result {
                    *self = AppVariant::InGame(AppGame::new(difficulty)?);
                }
            }
        }

        Ok(())
    }

    fn perform_secondary_action(&mut self) -> Result<(), GameError> {
        match self {
            // the menu has no secondary action
            AppVariant::InMenu(_) => (),
            AppVariant::InGame(game) => game.toggle_flag()?,
        }

        Ok(())
    }

    fn leave(&mut self, force: bool) {
        match self {
            AppVariant::InMenu(menu) => {
                menu.quit();
            }
            AppVariant::InGame(game) => {
                if force {
                    game.emergency_leave();
                } else {
                    game.confirm_or_cancel_leave_or_leave();
                }
            }
        }
    }
}

impl Render for AppVariant {
    fn render(&mut self, frame: &mut Frame) {
        match self {
            AppVariant::InMenu(ref mut menu) => render_menu(menu, frame),
            AppVariant::InGame(ref mut game) => render_game(game, frame),
        }
    }
}

/// The Menu app variant
#[derive(Debug)]
pub struct AppMenu {
    pub selected_difficulty: Difficulty,
    should_quit: bool,
}

impl AppMenu {
    fn new(selected_difficulty: Difficulty) -> Self {
        AppMenu {
            selected_difficulty,
            should_quit: false,
        }
    }

    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        let current_index = Difficulty::ALL
            .iter()
            .position(|difficulty| difficulty == &self.selected_difficulty)
            .unwrap();

        let new_index = match direction {
            Up => current_index.saturating_sub(1),
            Down => cmp::min(current_index + 1, Difficulty::ALL.len() - 1),
            // the menu is a single vertical list
            Left | Right => current_index,
        };

        self.selected_difficulty = Difficulty::ALL[new_index];
    }

    fn create_new_round(&self) -> Result<AppGame, GameError> {
        AppGame::new(self.selected_difficulty)
    }

    fn quit(&mut self) {
        self.should_quit = true
    }
}

/// The Game app variant
#[derive(Debug)]
pub struct AppGame {
    /// The game instance.
    pub game: Game,
    /// The difficulty the round was started with. Kept to restart with the same preset and to
    /// preselect the menu item when leaving back to the menu.
    pub difficulty: Difficulty,
    /// The amount of columns that should be rendered in the field. Must always be less or equal to the total amount of
    /// columns.
    pub visible_width: u16,
    /// The amount of rows that should be rendered in the field. Must always be less or equal to the total amount of
    /// rows.
    pub visible_height: u16,
    /// The window is a sliding frame-view into the field. This is used when the field is too big to be displayed in the
    /// given container.
    ///
    /// The values represent the starting column/row from which the visible amount of columns/rows is displayed.
    ///
    /// So, for example, for the 5x5 field where there would only be 3 visible columns and 3 visible rows, in order to
    /// only display the portion of the field shown below, the `window_offset` must be set to `(2, 2)`.
    ///
    /// ```
    /// /*
    ///
    /// * * * * *
    /// * * * * *
    ///    _______
    /// * *|* * *|
    /// * *|* * *|
    /// * *|* * *|
    ///    _______
    ///
    /// */
    /// ```
    pub window_offset: (u16, u16),
    /// The position of the currently selected cell relative to the whole field. Must be added to the `window_offset`
    /// in order to get the position of the currently selected cell relative to the window (the visible part of the
    /// field).
    pub cursor_position: (u16, u16),
    /// Whether the cancel key was pressed and now the game's in the state of waiting for a confirmation from the user
    /// to leave back to the menu.
    pub awaiting_leave_confirmation: bool,
    /// Whether the leave was confirmed and now it's allowed to go back to the menu.
    pub should_leave: bool,
    /// Whether the app should urgently leave without asking for a confirmation
    pub should_emergency_leave: bool,
}

impl AppGame {
    fn new(difficulty: Difficulty) -> Result<Self, GameError> {
        let (width, height, bomb_count) = difficulty.preset();
        let game = Game::new(width, height, bomb_count)?;

        Ok(AppGame {
            game,
            difficulty,
            visible_width: 0,
            visible_height: 0,
            window_offset: (0, 0),
            cursor_position: (0, 0),
            awaiting_leave_confirmation: false,
            should_leave: false,
            should_emergency_leave: false,
        })
    }

    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        // don't move the cursor when the round's already finished
        if self.game.outcome().is_over() {
            return;
        }

        let (field_width, field_height) =
            (self.game.minefield().width(), self.game.minefield().height());
        let (cx, cy) = self.cursor_position;

        self.cursor_position = match direction {
            Up => (cx, cy.saturating_sub(1)),
            Left => (cx.saturating_sub(1), cy),
            Down => (cx, cmp::min(cy + 1, field_height - 1)),
            Right => (cmp::min(cx + 1, field_width - 1), cy),
        };

        let (cx, cy) = self.cursor_position;
        let (ox, oy) = self.window_offset;

        self.window_offset = {
            let new_ox = if cx > (ox + self.visible_width).saturating_sub(2) {
                cmp::min(ox + 1, field_width.saturating_sub(self.visible_width))
            } else if cx < ox + 1 {
                ox.saturating_sub(1)
            } else {
                self.window_offset.0
            };

            let new_oy = if cy > (oy + self.visible_height).saturating_sub(2) {
                cmp::min(oy + 1, field_height.saturating_sub(self.visible_height))
            } else if cy < oy + 1 {
                oy.saturating_sub(1)
            } else {
                self.window_offset.1
            };

            (new_ox, new_oy)
        }
    }

    fn reveal_or_restart_or_confirm_leave(&mut self) -> Result<Option<Difficulty>, GameError> {
        if self.awaiting_leave_confirmation {
            self.leave();
            return Ok(None);
        }

        if self.game.outcome().is_over() {
            // if the round has ended, signal that a new one of the same difficulty should start
            return Ok(Some(self.difficulty));
        }

        // otherwise, reveal the selected cell
        let (cx, cy) = self.cursor_position;
        self.game.reveal(cx, cy)?;

        Ok(None)
    }

    fn toggle_flag(&mut self) -> Result<(), GameError> {
        if let GameOutcome::InProgress = self.game.outcome() {
            let (cx, cy) = self.cursor_position;
            self.game.flag(cx, cy)?;
        }

        Ok(())
    }

    fn confirm_or_cancel_leave_or_leave(&mut self) {
        if self.game.outcome().is_over() {
            // if the round has ended, just leave without asking for confirmation
            self.leave();
        } else {
            // otherwise, ask for confirmation
            self.awaiting_leave_confirmation = !self.awaiting_leave_confirmation;
        }
    }

    fn leave(&mut self) {
        self.should_leave = true;
    }

    fn emergency_leave(&mut self) {
        self.should_emergency_leave = true;
    }
}
