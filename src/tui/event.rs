use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

pub fn poll(timeout: Duration) -> Result<AppEvent> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(AppEvent::Key(key)),
            Event::Mouse(mouse) => return Ok(AppEvent::Mouse(mouse)),
            _ => {}
        }
    }
    Ok(AppEvent::Tick)
}
