use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::{Position, Rect};

use crate::board::{Board, Focus, Step};
use crate::store::TaskStatus;

use super::event::{self, AppEvent};
use super::form::{self, Edit};
use super::keymap::{Action, KeyMap};
use super::theme::Theme;
use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box.
    Filter,
    /// Typing into the detail view's comment box.
    Comment,
    Help,
}

/// Scroll position and on-screen geometry of the task table, as of the
/// last frame.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    /// Index of the first row drawn.
    pub offset: usize,
    /// Screen area of the data rows (header excluded).
    pub rows_area: Rect,
    /// Hovered row the viewport last scrolled to.
    followed: Option<usize>,
}

impl TableView {
    fn viewport(&self) -> usize {
        usize::from(self.rows_area.height)
    }

    /// Record the frame's geometry and clamp the scroll position. When the
    /// hover moved since the last frame the viewport follows it.
    pub fn layout(&mut self, rows_area: Rect, len: usize, hovered: usize) {
        self.rows_area = rows_area;
        let viewport = self.viewport().max(1);
        if self.followed != Some(hovered) && hovered < len {
            if hovered < self.offset {
                self.offset = hovered;
            } else if hovered >= self.offset + viewport {
                self.offset = hovered + 1 - viewport;
            }
            self.followed = Some(hovered);
        }
        self.offset = self.offset.min(len.saturating_sub(viewport));
    }

    /// Mouse-wheel scrolling; does not move the hover.
    pub fn scroll(&mut self, step: Step, len: usize) {
        let max = len.saturating_sub(self.viewport());
        self.offset = match step {
            Step::Next => (self.offset + 1).min(max),
            Step::Prev => self.offset.saturating_sub(1),
        };
    }

    /// Accept `hovered` as current without scrolling to it. Used when a page
    /// lands and the hover resets while the user is reading further down.
    pub fn hold(&mut self, hovered: usize) {
        self.followed = Some(hovered);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.followed = None;
    }

    /// Whether the bottom of the table was on screen.
    pub fn sentinel_visible(&self, len: usize) -> bool {
        self.offset + self.viewport() >= len
    }

    /// Row index under a screen position, if any.
    pub fn row_at(&self, column: u16, row: u16, len: usize) -> Option<usize> {
        if !self.rows_area.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.offset + usize::from(row - self.rows_area.y);
        (index < len).then_some(index)
    }
}

pub struct App {
    pub board: Board,
    pub keymap: KeyMap,
    pub theme: Theme,
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Search box
    pub filter_input: String,
    pub filter_cursor: usize,

    pub table: TableView,
    /// Detail view status chips as drawn in the last frame.
    pub status_chips: Vec<(Rect, TaskStatus)>,
    tick_rate: Duration,
}

impl App {
    pub fn new(board: Board, theme: Theme, tick_rate: Duration) -> Self {
        Self {
            board,
            keymap: KeyMap::default_keymap(),
            theme,
            should_quit: false,
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            filter_cursor: 0,
            table: TableView::default(),
            status_chips: Vec::new(),
            tick_rate,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.board.poll(Instant::now()) {
                self.table.hold(self.board.hovered());
            }
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.report_sentinel(Instant::now());

            match event::poll(self.poll_timeout(Instant::now()))? {
                AppEvent::Key(key) => self.handle_key(key.code, key.modifiers, Instant::now()),
                AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
                AppEvent::Tick => {}
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Wake up no later than the next page is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.board.next_deadline() {
            Some(at) => self.tick_rate.min(at.saturating_duration_since(now)),
            None => self.tick_rate,
        }
    }

    fn report_sentinel(&mut self, now: Instant) {
        let visible = self.table.sentinel_visible(self.board.visible_len());
        self.board.set_sentinel_visible(visible, now);
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.input_mode {
            InputMode::Normal => {
                if let Some(action) = self.keymap.lookup(self.board.focus(), code, modifiers) {
                    tracing::debug!(?action, "key action");
                    self.execute(action, now);
                }
            }
            InputMode::Filter => self.handle_filter_key(code, modifiers),
            InputMode::Comment => self.handle_comment_key(code, modifiers),
            InputMode::Help => {
                if matches!(code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
                    self.input_mode = InputMode::Normal;
                }
            }
        }
    }

    fn execute(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.input_mode = InputMode::Help,

            Action::HoverUp => self.board.move_hover(Step::Prev),
            Action::HoverDown => self.board.move_hover(Step::Next),
            Action::OpenDetail => {
                self.board.open_hovered();
            }
            Action::NextTab => self.switch_tab(Step::Next, now),
            Action::PrevTab => self.switch_tab(Step::Prev, now),
            Action::EditFilter => {
                self.filter_input = self.board.filter_text().to_string();
                self.filter_cursor = self.filter_input.len();
                self.input_mode = InputMode::Filter;
            }
            Action::LoadMore => {
                self.board.load_more(now);
            }

            Action::PrevTask => {
                self.board.step_selection(Step::Prev);
            }
            Action::NextTask => {
                self.board.step_selection(Step::Next);
            }
            Action::CloseDetail => self.board.close_detail(),
            Action::ProposeStatus(status) => self.board.propose_status(status),
            Action::EditComment => self.input_mode = InputMode::Comment,

            Action::Confirm => {
                if self.board.confirm(now) {
                    self.table.reset();
                }
            }
            Action::Cancel => self.board.cancel(),
        }
    }

    fn switch_tab(&mut self, step: Step, now: Instant) {
        self.board.cycle_tab(step, now);
        self.table.reset();
    }

    /// Live filtering: every change to the box re-filters the loaded rows.
    /// Enter keeps the text, Esc clears it.
    fn handle_filter_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter | KeyCode::Tab => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.filter_input.clear();
                self.filter_cursor = 0;
                self.board.apply_text_filter("");
                self.input_mode = InputMode::Normal;
            }
            _ => {
                let edit = form::apply_text_edit(
                    &mut self.filter_input,
                    &mut self.filter_cursor,
                    code,
                    modifiers,
                );
                if edit == Edit::Changed {
                    self.board.apply_text_filter(&self.filter_input);
                }
            }
        }
    }

    /// Enter submits the draft, Esc leaves the box with the draft kept.
    fn handle_comment_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if self.board.focus() == Focus::Table {
            self.input_mode = InputMode::Normal;
            return;
        }
        match code {
            KeyCode::Enter => {
                if self.board.submit_comment().is_some() {
                    self.input_mode = InputMode::Normal;
                }
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {
                let (draft, cursor) = self.board.comment_draft_mut();
                form::apply_text_edit(draft, cursor, code, modifiers);
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.input_mode != InputMode::Normal {
            return;
        }
        match self.board.focus() {
            Focus::Table => self.handle_table_mouse(mouse),
            Focus::Detail if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.click_status_chip(mouse.column, mouse.row);
            }
            Focus::Detail | Focus::Confirm => {}
        }
    }

    /// A chip click goes through the same confirmation gate as the 1-3 keys.
    fn click_status_chip(&mut self, column: u16, row: u16) {
        let at = Position::new(column, row);
        let hit = self
            .status_chips
            .iter()
            .find(|(area, _)| area.contains(at))
            .map(|&(_, status)| status);
        if let Some(status) = hit {
            self.board.propose_status(status);
        }
    }

    fn handle_table_mouse(&mut self, mouse: MouseEvent) {
        let len = self.board.visible_len();
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(index) = self.table.row_at(mouse.column, mouse.row, len) {
                    self.board.hover_row(index);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.table.row_at(mouse.column, mouse.row, len) {
                    self.board.open_row(index);
                }
            }
            MouseEventKind::ScrollDown => self.table.scroll(Step::Next, len),
            MouseEventKind::ScrollUp => self.table.scroll(Step::Prev, len),
            _ => {}
        }
    }
}
