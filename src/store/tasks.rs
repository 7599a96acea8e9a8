use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use super::models::{Task, TaskId, TaskStatus};

/// Owns every task record. Rows and the detail view refer to tasks by id
/// and read through here, so a status change is visible everywhere at once.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// Position of each id in `tasks`. Tasks are never reordered or removed.
    index: HashMap<TaskId, usize>,
}

impl TaskStore {
    /// Ids are trusted to be unique; if one repeats, the first task wins.
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut index = HashMap::with_capacity(tasks.len());
        for (pos, task) in tasks.iter().enumerate() {
            index.entry(task.id).or_insert(pos);
        }
        Self { tasks, index }
    }

    /// All tasks in insertion order.
    pub fn get_all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(*self.index.get(&id)?)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in the given partition, insertion order preserved.
    pub fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    pub fn count_by_status(&self, status: TaskStatus) -> usize {
        self.with_status(status).count()
    }

    /// Move a task to `status` and refresh its `updated_at`.
    ///
    /// An unknown id is a deliberate no-op: nothing changes and `false` is
    /// returned. Order and every other field are left untouched.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> bool {
        self.set_status_at(id, status, Utc::now())
    }

    pub(crate) fn set_status_at(&mut self, id: TaskId, status: TaskStatus, now: DateTime<Utc>) -> bool {
        let Some(task) = self
            .index
            .get(&id)
            .copied()
            .and_then(|pos| self.tasks.get_mut(pos))
        else {
            tracing::debug!(task_id = id, "set_status on unknown task ignored");
            return false;
        };
        task.status = status;
        // updated_at is strictly increasing even if the clock has not ticked.
        task.updated_at = if now > task.updated_at {
            now
        } else {
            task.updated_at + TimeDelta::microseconds(1)
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::Priority;

    fn task(id: TaskId, status: TaskStatus) -> Task {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Task {
            id,
            name: format!("task {id}"),
            labels: vec!["Blocked".to_string()],
            status,
            priority: Priority::Medium,
            created_at: at,
            updated_at: at,
        }
    }

    fn store() -> TaskStore {
        TaskStore::new(vec![
            task(1, TaskStatus::Open),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::Open),
        ])
    }

    #[test]
    fn set_status_updates_only_the_matched_task() {
        let mut store = store();
        let before = store.get_all().to_vec();

        assert!(store.set_status(2, TaskStatus::Closed));

        let after = store.get_all();
        assert_eq!(after.len(), before.len());
        let changed = &after[1];
        assert_eq!(changed.id, 2);
        assert_eq!(changed.status, TaskStatus::Closed);
        assert!(changed.updated_at > before[1].updated_at);
        assert_eq!(changed.name, before[1].name);
        assert_eq!(changed.labels, before[1].labels);
        assert_eq!(changed.priority, before[1].priority);
        assert_eq!(changed.created_at, before[1].created_at);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn set_status_unknown_id_is_a_no_op() {
        let mut store = store();
        let before = store.get_all().to_vec();
        assert!(!store.set_status(99, TaskStatus::Closed));
        assert_eq!(store.get_all(), before.as_slice());
    }

    #[test]
    fn updated_at_strictly_increases_with_a_stalled_clock() {
        let mut store = store();
        let stalled = store.get(1).unwrap().updated_at;
        store.set_status_at(1, TaskStatus::Closed, stalled);
        let first = store.get(1).unwrap().updated_at;
        store.set_status_at(1, TaskStatus::Open, stalled);
        let second = store.get(1).unwrap().updated_at;
        assert!(first > stalled);
        assert!(second > first);
    }

    #[test]
    fn counts_and_partitions_follow_insertion_order() {
        let store = store();
        let open: Vec<TaskId> = store.with_status(TaskStatus::Open).map(|t| t.id).collect();
        assert_eq!(open, [1, 3]);
        assert_eq!(store.count_by_status(TaskStatus::InProgress), 1);
        assert_eq!(store.count_by_status(TaskStatus::Closed), 0);
    }

    #[test]
    fn lookup_by_id_ignores_insertion_order() {
        let mut store = TaskStore::new(vec![
            task(30, TaskStatus::Open),
            task(10, TaskStatus::Closed),
            task(20, TaskStatus::Open),
        ]);
        assert_eq!(store.get(10).map(|t| t.status), Some(TaskStatus::Closed));
        assert_eq!(store.get(20).map(|t| t.id), Some(20));
        assert!(store.get(40).is_none());

        assert!(store.set_status(30, TaskStatus::InProgress));
        assert_eq!(store.get(30).map(|t| t.status), Some(TaskStatus::InProgress));
        assert_eq!(store.get_all()[0].id, 30);
    }

    #[test]
    fn repeated_id_resolves_to_first_task() {
        let mut dup = task(5, TaskStatus::Closed);
        dup.name = "second".to_string();
        let store = TaskStore::new(vec![task(5, TaskStatus::Open), dup]);
        assert_eq!(store.get(5).map(|t| t.status), Some(TaskStatus::Open));
    }

    #[test]
    fn lookups_scale_to_large_stores() {
        let tasks: Vec<Task> = (1..=50_000).map(|id| task(id, TaskStatus::Open)).collect();
        let store = TaskStore::new(tasks);
        // Every id resolves to its own record.
        assert!((1..=50_000).all(|id| store.get(id).is_some_and(|t| t.id == id)));
    }
}
