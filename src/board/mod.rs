mod detail;
mod filter;
mod navigation;
mod pagination;

pub use detail::{DetailView, PendingChange};
pub use filter::TextFilter;
pub use navigation::{Navigator, Step, wrap};
pub use pagination::{PAGE_SIZE, Paginator};

use std::time::Instant;

use chrono::Utc;

use crate::config::BoardConfig;
use crate::store::{Comment, CommentId, Store, Task, TaskId, TaskStatus};

/// Which part of the board receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Detail,
    /// Detail view with a status change awaiting confirmation.
    Confirm,
}

/// The board's view state and the only way to change it.
///
/// Every user intent is a method here, and each one performs its own state
/// transition (tab reset, reload after a status change, hover reset) at the
/// call site. The renderer only reads.
#[derive(Debug)]
pub struct Board {
    store: Store,
    pages: Paginator,
    filter: TextFilter,
    nav: Navigator,
    detail: DetailView,
    sender: String,
    /// Ids of the visible rows, rebuilt whenever rows, filter or statuses change.
    visible: Vec<TaskId>,
}

impl Board {
    /// Start on the OPEN tab with the first page requested.
    pub fn new(store: Store, config: &BoardConfig, now: Instant) -> Self {
        let mut board = Board {
            store,
            pages: Paginator::new(TaskStatus::Open, config.page_latency()),
            filter: TextFilter::default(),
            nav: Navigator::default(),
            detail: DetailView::default(),
            sender: config.sender_name.clone(),
            visible: Vec::new(),
        };
        board.select_tab(TaskStatus::Open, now);
        board
    }

    // ── Reads ──

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn pages(&self) -> &Paginator {
        &self.pages
    }

    pub fn active_tab(&self) -> TaskStatus {
        self.pages.status()
    }

    pub fn status_count(&self, status: TaskStatus) -> usize {
        self.store.tasks.count_by_status(status)
    }

    pub fn focus(&self) -> Focus {
        match (self.nav.selected(), self.detail.pending()) {
            (None, _) => Focus::Table,
            (Some(_), None) => Focus::Detail,
            (Some(_), Some(_)) => Focus::Confirm,
        }
    }

    /// Loaded rows that are still in the active partition and pass the
    /// text filter, in partition order.
    pub fn visible(&self) -> Vec<&Task> {
        self.visible
            .iter()
            .filter_map(|&id| self.store.tasks.get(id))
            .collect()
    }

    pub fn visible_ids(&self) -> &[TaskId] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    fn refresh_visible(&mut self) {
        let status = self.pages.status();
        let tasks = &self.store.tasks;
        let filter = &self.filter;
        let visible = self
            .pages
            .rows()
            .iter()
            .copied()
            .filter(|&id| {
                tasks
                    .get(id)
                    .is_some_and(|t| t.status == status && filter.matches(t))
            })
            .collect();
        self.visible = visible;
    }

    pub fn hovered(&self) -> usize {
        self.nav.hovered()
    }

    /// The open task, read fresh from the store.
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks.get(self.nav.selected()?)
    }

    pub fn selected_comments(&self) -> Vec<&Comment> {
        match self.nav.selected() {
            Some(id) => self.store.comments.get_for_task(id),
            None => Vec::new(),
        }
    }

    pub fn pending(&self) -> Option<PendingChange> {
        self.detail.pending()
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn comment_draft_mut(&mut self) -> (&mut String, &mut usize) {
        self.detail.draft_mut()
    }

    pub fn filter_text(&self) -> &str {
        self.filter.text()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_active()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pages.next_deadline()
    }

    // ── Pagination ──

    pub fn select_tab(&mut self, status: TaskStatus, now: Instant) {
        self.pages.select_tab(status, &self.store.tasks, now);
        self.refresh_visible();
        self.nav.reset_hover();
    }

    pub fn cycle_tab(&mut self, step: Step, now: Instant) {
        let current = self.pages.status();
        let next = match step {
            Step::Next => current.next(),
            Step::Prev => current.prev(),
        };
        self.select_tab(next, now);
    }

    /// Filter the loaded rows. Never requests a page.
    pub fn apply_text_filter(&mut self, text: &str) {
        if self.filter.set(text) {
            self.refresh_visible();
            self.nav.reset_hover();
        }
    }

    /// Report the end-of-list sentinel's visibility from the last frame.
    pub fn set_sentinel_visible(&mut self, visible: bool, now: Instant) {
        self.pages
            .set_sentinel_visible(visible, &self.store.tasks, now);
    }

    /// Explicit "load more" intent, subject to the same guards as scrolling.
    pub fn load_more(&mut self, now: Instant) -> bool {
        self.pages.load_next(&self.store.tasks, now)
    }

    /// Resolve page loads that are due. Returns whether the rows changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let changed = self.pages.poll(now);
        if changed {
            self.refresh_visible();
            self.nav.reset_hover();
        }
        changed
    }

    // ── Table navigation ──

    pub fn move_hover(&mut self, step: Step) {
        if self.focus() != Focus::Table {
            return;
        }
        self.nav.move_hover(step, self.visible.len());
    }

    pub fn hover_row(&mut self, index: usize) -> bool {
        if self.focus() != Focus::Table {
            return false;
        }
        self.nav.hover(index, self.visible.len())
    }

    pub fn open_hovered(&mut self) -> Option<TaskId> {
        if self.focus() != Focus::Table {
            return None;
        }
        self.nav.open_hovered(&self.visible)
    }

    /// Open the task in row `index` (pointer click).
    pub fn open_row(&mut self, index: usize) -> Option<TaskId> {
        if self.hover_row(index) {
            self.open_hovered()
        } else {
            None
        }
    }

    // ── Detail view ──

    pub fn step_selection(&mut self, step: Step) -> Option<TaskId> {
        if self.focus() != Focus::Detail {
            return None;
        }
        self.nav.step_selection(step, &self.visible)
    }

    pub fn close_detail(&mut self) {
        self.nav.close();
        self.detail.reset();
    }

    /// Open the confirmation gate for the open task.
    pub fn propose_status(&mut self, status: TaskStatus) {
        if let Some(id) = self.nav.selected() {
            self.detail.propose(id, status);
        }
    }

    /// Apply the pending change. The task set changed, so the active tab is
    /// reloaded from its first page.
    pub fn confirm(&mut self, now: Instant) -> bool {
        let Some(change) = self.detail.take_confirmed() else {
            return false;
        };
        if !self.store.tasks.set_status(change.task_id, change.status) {
            return false;
        }
        tracing::info!(
            task_id = change.task_id,
            status = %change.status,
            "status changed"
        );
        self.pages.reload(&self.store.tasks, now);
        self.refresh_visible();
        self.nav.reset_hover();
        true
    }

    pub fn cancel(&mut self) {
        if let Some(change) = self.detail.cancel() {
            tracing::debug!(task_id = change.task_id, "status change cancelled");
        }
    }

    pub fn submit_comment(&mut self) -> Option<CommentId> {
        let task_id = self.nav.selected()?;
        self.detail
            .submit_comment(&mut self.store.comments, task_id, &self.sender, Utc::now())
    }
}
