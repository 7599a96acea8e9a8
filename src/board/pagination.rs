use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::store::{TaskId, TaskStatus, TaskStore};

pub const PAGE_SIZE: usize = 10;

/// A page whose result is computed but not yet visible.
#[derive(Debug)]
struct PendingPage {
    epoch: u64,
    page: usize,
    ids: Vec<TaskId>,
    ready_at: Instant,
}

/// Incremental loader for one status partition.
///
/// Every tab switch or reload starts a new epoch. Results are queued in
/// issue order and only applied when their epoch is still current, so a
/// page requested for an old tab can never land in the new one.
#[derive(Debug)]
pub struct Paginator {
    status: TaskStatus,
    page: usize,
    rows: Vec<TaskId>,
    has_more: bool,
    loading: bool,
    epoch: u64,
    latency: Duration,
    in_flight: VecDeque<PendingPage>,
    sentinel_visible: bool,
}

impl Paginator {
    pub fn new(status: TaskStatus, latency: Duration) -> Self {
        Self {
            status,
            page: 0,
            rows: Vec::new(),
            has_more: true,
            loading: false,
            epoch: 0,
            latency,
            in_flight: VecDeque::new(),
            sentinel_visible: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Ids loaded so far, in partition order.
    pub fn rows(&self) -> &[TaskId] {
        &self.rows
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switch partition: drop everything loaded and request page 0.
    pub fn select_tab(&mut self, status: TaskStatus, tasks: &TaskStore, now: Instant) {
        tracing::info!(status = %status, "selecting tab");
        self.status = status;
        self.reset(tasks, now);
    }

    /// Same partition, fresh start. Used after the task set changes.
    pub fn reload(&mut self, tasks: &TaskStore, now: Instant) {
        self.reset(tasks, now);
    }

    fn reset(&mut self, tasks: &TaskStore, now: Instant) {
        self.epoch += 1;
        self.page = 0;
        self.rows.clear();
        self.has_more = true;
        // Anything still queued belongs to the previous epoch and will be
        // dropped when it resolves.
        self.loading = false;
        self.load_page(0, tasks, now);
    }

    /// Request page `n`. Returns `false` without doing anything if a load is
    /// already in flight or the partition is exhausted.
    pub fn load_page(&mut self, n: usize, tasks: &TaskStore, now: Instant) -> bool {
        if self.loading || !self.has_more {
            return false;
        }
        let ids: Vec<TaskId> = tasks
            .with_status(self.status)
            .skip(n * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|t| t.id)
            .collect();
        tracing::debug!(page = n, epoch = self.epoch, rows = ids.len(), "page requested");
        self.loading = true;
        self.in_flight.push_back(PendingPage {
            epoch: self.epoch,
            page: n,
            ids,
            ready_at: now + self.latency,
        });
        true
    }

    pub fn load_next(&mut self, tasks: &TaskStore, now: Instant) -> bool {
        if self.rows.is_empty() && self.page == 0 {
            self.load_page(0, tasks, now)
        } else {
            self.load_page(self.page + 1, tasks, now)
        }
    }

    /// Record whether the end-of-list sentinel is on screen and, if it is,
    /// fetch the next page when allowed. Returns whether a load was issued.
    pub fn set_sentinel_visible(&mut self, visible: bool, tasks: &TaskStore, now: Instant) -> bool {
        self.sentinel_visible = visible;
        if visible && !self.loading && self.has_more {
            self.load_next(tasks, now)
        } else {
            false
        }
    }

    /// Apply every queued page whose latency has elapsed, in issue order.
    /// Returns whether the visible rows changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(front) = self.in_flight.front() {
            if front.ready_at > now {
                break;
            }
            let Some(pending) = self.in_flight.pop_front() else {
                break;
            };
            if pending.epoch != self.epoch {
                tracing::debug!(
                    page = pending.page,
                    stale_epoch = pending.epoch,
                    epoch = self.epoch,
                    "discarding stale page"
                );
                continue;
            }
            self.apply(pending);
            changed = true;
        }
        changed
    }

    fn apply(&mut self, pending: PendingPage) {
        if pending.ids.len() < PAGE_SIZE {
            self.has_more = false;
        }
        if pending.page == 0 {
            self.rows = pending.ids;
        } else {
            self.rows.extend(pending.ids);
        }
        self.page = pending.page;
        self.loading = false;
    }

    /// When the next queued result becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.in_flight.front().map(|p| p.ready_at)
    }

    pub fn sentinel_visible(&self) -> bool {
        self.sentinel_visible
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::{Priority, Task};

    const LATENCY: Duration = Duration::from_millis(1000);

    fn tasks(statuses: &[TaskStatus]) -> TaskStore {
        let now = Utc::now();
        TaskStore::new(
            statuses
                .iter()
                .enumerate()
                .map(|(i, &status)| Task {
                    id: i as TaskId + 1,
                    name: format!("task {}", i + 1),
                    labels: vec!["Bug fix".to_string()],
                    status,
                    priority: Priority::Low,
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        )
    }

    fn open(count: usize) -> TaskStore {
        tasks(&vec![TaskStatus::Open; count])
    }

    #[test]
    fn twenty_five_open_tasks_load_in_three_pages() {
        let store = open(25);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);

        pages.select_tab(TaskStatus::Open, &store, t0);
        assert!(pages.is_loading());
        assert!(pages.rows().is_empty());
        assert!(pages.poll(t0 + LATENCY));
        assert_eq!(pages.rows().len(), 10);
        assert!(pages.has_more());

        let t1 = t0 + LATENCY;
        assert!(pages.load_next(&store, t1));
        pages.poll(t1 + LATENCY);
        assert_eq!(pages.rows().len(), 20);
        assert!(pages.has_more());

        let t2 = t1 + LATENCY;
        assert!(pages.load_next(&store, t2));
        pages.poll(t2 + LATENCY);
        assert_eq!(pages.rows().len(), 25);
        assert!(!pages.has_more());
        assert_eq!(pages.rows().last(), Some(&25));

        assert!(!pages.load_next(&store, t2 + LATENCY));
    }

    #[test]
    fn result_is_not_visible_before_latency() {
        let store = open(3);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Open, &store, t0);

        assert!(!pages.poll(t0 + Duration::from_millis(999)));
        assert!(pages.rows().is_empty());
        assert!(pages.is_loading());
        assert_eq!(pages.next_deadline(), Some(t0 + LATENCY));
    }

    #[test]
    fn only_one_load_in_flight() {
        let store = open(30);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Open, &store, t0);

        assert!(!pages.load_page(1, &store, t0));
        assert!(!pages.load_next(&store, t0));
        pages.poll(t0 + LATENCY);
        assert_eq!(pages.rows().len(), 10);
    }

    #[test]
    fn exact_multiple_needs_an_empty_page_to_finish() {
        let store = open(10);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Open, &store, t0);
        pages.poll(t0 + LATENCY);
        assert!(pages.has_more());

        let t1 = t0 + LATENCY;
        assert!(pages.load_next(&store, t1));
        pages.poll(t1 + LATENCY);
        assert_eq!(pages.rows().len(), 10);
        assert!(!pages.has_more());
    }

    #[test]
    fn empty_partition_is_exhausted_after_first_page() {
        let store = open(4);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Closed, &store, t0);
        pages.poll(t0 + LATENCY);
        assert!(pages.rows().is_empty());
        assert!(!pages.has_more());
        assert!(!pages.is_loading());
    }

    #[test]
    fn tab_switch_discards_in_flight_page() {
        let mut statuses = vec![TaskStatus::Open; 15];
        statuses.extend([TaskStatus::Closed; 3]);
        let store = tasks(&statuses);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);

        pages.select_tab(TaskStatus::Open, &store, t0);
        pages.poll(t0 + LATENCY);
        let t1 = t0 + LATENCY;
        assert!(pages.load_next(&store, t1));

        // Switch while page 1 of OPEN is still pending.
        let t_switch = t1 + Duration::from_millis(500);
        pages.select_tab(TaskStatus::Closed, &store, t_switch);
        assert!(pages.rows().is_empty());

        // The stale OPEN page resolves first and must not show up.
        pages.poll(t1 + LATENCY);
        assert!(pages.rows().is_empty());
        assert!(pages.is_loading());

        pages.poll(t_switch + LATENCY);
        assert_eq!(pages.rows(), &[16, 17, 18]);
        assert!(!pages.has_more());
        assert!(!pages.is_loading());
    }

    #[test]
    fn switching_back_and_forth_applies_only_latest_epoch() {
        let store = tasks(&[TaskStatus::Open, TaskStatus::Closed, TaskStatus::InProgress]);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);

        pages.select_tab(TaskStatus::Open, &store, t0);
        pages.select_tab(TaskStatus::Closed, &store, t0 + Duration::from_millis(10));
        pages.select_tab(TaskStatus::InProgress, &store, t0 + Duration::from_millis(20));

        assert!(pages.poll(t0 + LATENCY * 2));
        assert_eq!(pages.rows(), &[3]);
        assert_eq!(pages.status(), TaskStatus::InProgress);
    }

    #[test]
    fn sentinel_triggers_next_page_only_when_idle() {
        let store = open(25);
        let t0 = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Open, &store, t0);

        // Still loading page 0.
        assert!(!pages.set_sentinel_visible(true, &store, t0));
        pages.poll(t0 + LATENCY);

        let t1 = t0 + LATENCY;
        assert!(!pages.set_sentinel_visible(false, &store, t1));
        assert!(pages.set_sentinel_visible(true, &store, t1));
        assert!(pages.sentinel_visible());
        pages.poll(t1 + LATENCY);
        assert_eq!(pages.rows().len(), 20);
    }

    #[test]
    fn visible_rows_never_exceed_partition() {
        let mut statuses = vec![TaskStatus::Open; 12];
        statuses.extend([TaskStatus::Closed; 30]);
        let store = tasks(&statuses);
        let mut now = Instant::now();
        let mut pages = Paginator::new(TaskStatus::Open, LATENCY);
        pages.select_tab(TaskStatus::Open, &store, now);

        for _ in 0..5 {
            now += LATENCY;
            pages.poll(now);
            assert!(pages.rows().len() <= store.count_by_status(TaskStatus::Open));
            pages.set_sentinel_visible(true, &store, now);
        }
        assert_eq!(pages.rows().len(), 12);
        assert!(!pages.has_more());
    }
}
