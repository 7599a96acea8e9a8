mod app;
mod event;
mod form;
mod keymap;
mod theme;
mod ui;

pub use theme::{Theme, ThemeConfig};

use std::io::stdout;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::board::Board;
use crate::config::Config;

/// Take over the terminal and run the board until the user quits.
pub fn run(board: Board, config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();
    if let Err(e) = execute!(stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e.into());
    }
    let mut app = app::App::new(board, config.theme.build(), config.board.tick_rate());
    let result = app.run(&mut terminal);
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    if let Err(e) = &result {
        tracing::error!("dashboard exited with error: {e:#}");
    }
    result
}
