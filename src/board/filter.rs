use crate::store::Task;

/// Case-insensitive substring match over the table's text columns:
/// id, name, priority, status (raw and label) and labels.
///
/// Only ever applied to rows that are already loaded.
#[derive(Debug, Default, Clone)]
pub struct TextFilter {
    text: String,
    needle: String,
}

impl TextFilter {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    /// Returns whether the effective filter changed.
    pub fn set(&mut self, text: &str) -> bool {
        let needle = text.trim().to_lowercase();
        self.text = text.to_string();
        if needle == self.needle {
            return false;
        }
        self.needle = needle;
        true
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let needle = self.needle.as_str();
        task.id.to_string().contains(needle)
            || task.name.to_lowercase().contains(needle)
            || task.priority.as_str().to_lowercase().contains(needle)
            || task.status.as_str().to_lowercase().contains(needle)
            || task.status.label().to_lowercase().contains(needle)
            || task.labels.iter().any(|l| l.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::{Priority, TaskStatus};

    fn task() -> Task {
        Task {
            id: 42,
            name: "Payment integration".to_string(),
            labels: vec!["Ready for QA".to_string()],
            status: TaskStatus::InProgress,
            priority: Priority::Urgent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TextFilter::default();
        assert!(!filter.is_active());
        assert!(filter.matches(&task()));
    }

    #[test]
    fn matches_each_column_ignoring_case() {
        let mut filter = TextFilter::default();
        for needle in ["42", "PAYMENT", "urg", "in_progress", "in progress", "qa"] {
            filter.set(needle);
            assert!(filter.matches(&task()), "expected {needle:?} to match");
        }
    }

    #[test]
    fn non_matching_text_rejects() {
        let mut filter = TextFilter::default();
        filter.set("database");
        assert!(!filter.matches(&task()));
    }

    #[test]
    fn set_reports_effective_changes_only() {
        let mut filter = TextFilter::default();
        assert!(filter.set("pay"));
        assert!(!filter.set("PAY "));
        assert_eq!(filter.text(), "PAY ");
        assert!(filter.set(""));
    }
}
