//! The terminal user interface wrapper.

use crate::event::EventHandler;
use color_eyre::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};
use std::io;
use std::panic;

/// Anything that knows how to draw itself into a frame.
pub trait Render {
    fn render(&mut self, frame: &mut Frame);
}

/// Representation of a terminal user interface.
///
/// It is responsible for setting up the terminal, initializing the interface and handling the
/// draw events.
#[derive(Debug)]
pub struct Tui<B: Backend> {
    /// Interface to the Terminal.
    terminal: Terminal<B>,
    /// Terminal event handler.
    pub events: EventHandler,
}

impl<B: Backend> Tui<B> {
    /// Constructs a new instance of [`Tui`].
    pub fn new(terminal: Terminal<B>, events: EventHandler) -> Self {
        Self { terminal, events }
    }

    /// Initializes the terminal interface.
    ///
    /// It enables the raw mode and sets terminal properties.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen)?;

        // Reset the terminal properties on panic, so that a crash doesn't leave the user's
        // terminal in the raw mode.
        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            Self::reset().expect("failed to reset the terminal");
            panic_hook(panic);
        }));

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Draws the terminal interface by rendering the provided renderable.
    pub fn draw(&mut self, renderable: &mut impl Render) -> Result<()> {
        self.terminal.draw(|frame| renderable.render(frame))?;
        Ok(())
    }

    /// Resets the terminal interface.
    fn reset() -> Result<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stderr(), LeaveAlternateScreen)?;
        Ok(())
    }

    /// Exits the terminal interface.
    ///
    /// It disables the raw mode and reverts back the terminal properties.
    pub fn exit(&mut self) -> Result<()> {
        Self::reset()?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
