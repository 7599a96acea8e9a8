use chrono::{DateTime, Utc};

use crate::store::{CommentId, CommentStore, NewComment, TaskId, TaskStatus};

/// A status change waiting for the user to confirm or cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChange {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// State owned by the detail view: the confirmation gate and the comment
/// box. The task itself is always read back from the store by id.
#[derive(Debug, Default, Clone)]
pub struct DetailView {
    pending: Option<PendingChange>,
    draft: String,
    cursor: usize,
}

impl DetailView {
    pub fn pending(&self) -> Option<PendingChange> {
        self.pending
    }

    /// Open (or retarget) the confirmation gate.
    pub fn propose(&mut self, task_id: TaskId, status: TaskStatus) {
        self.pending = Some(PendingChange { task_id, status });
    }

    /// Close the gate, handing back the change to apply.
    pub fn take_confirmed(&mut self) -> Option<PendingChange> {
        self.pending.take()
    }

    /// Close the gate without applying anything.
    pub fn cancel(&mut self) -> Option<PendingChange> {
        self.pending.take()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn draft_mut(&mut self) -> (&mut String, &mut usize) {
        (&mut self.draft, &mut self.cursor)
    }

    /// Append the draft as a comment on `task_id` and clear the box.
    /// A blank draft is ignored and left as typed.
    pub fn submit_comment(
        &mut self,
        comments: &mut CommentStore,
        task_id: TaskId,
        sender: &str,
        now: DateTime<Utc>,
    ) -> Option<CommentId> {
        if self.draft.trim().is_empty() {
            tracing::debug!(task_id, "ignoring blank comment");
            return None;
        }
        let id = comments.append(NewComment {
            content: std::mem::take(&mut self.draft),
            name_of_sender: sender.to_string(),
            created_at: now,
            task_id,
        });
        self.cursor = 0;
        tracing::info!(task_id, comment_id = id, "comment added");
        Some(id)
    }

    /// Forget everything; used when the view closes.
    pub fn reset(&mut self) {
        self.pending = None;
        self.draft.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_hands_back_pending_change_once() {
        let mut view = DetailView::default();
        view.propose(7, TaskStatus::InProgress);
        assert_eq!(
            view.pending(),
            Some(PendingChange {
                task_id: 7,
                status: TaskStatus::InProgress
            })
        );
        assert_eq!(
            view.take_confirmed().map(|p| p.status),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(view.pending(), None);
        assert_eq!(view.take_confirmed(), None);
    }

    #[test]
    fn propose_retargets_the_gate() {
        let mut view = DetailView::default();
        view.propose(7, TaskStatus::InProgress);
        view.propose(7, TaskStatus::Closed);
        assert_eq!(view.cancel().map(|p| p.status), Some(TaskStatus::Closed));
        assert_eq!(view.pending(), None);
    }

    #[test]
    fn blank_comment_is_ignored() {
        let mut view = DetailView::default();
        let mut comments = CommentStore::default();
        {
            let (draft, cursor) = view.draft_mut();
            draft.push_str("   ");
            *cursor = 3;
        }
        assert_eq!(view.submit_comment(&mut comments, 1, "me", Utc::now()), None);
        assert!(comments.is_empty());
        assert_eq!(view.draft(), "   ");
    }

    #[test]
    fn submitted_comment_clears_the_box() {
        let mut view = DetailView::default();
        let mut comments = CommentStore::default();
        {
            let (draft, cursor) = view.draft_mut();
            draft.push_str("Ready for review");
            *cursor = draft.len();
        }
        let id = view.submit_comment(&mut comments, 4, "Current User", Utc::now());
        assert_eq!(id, Some(1));
        assert_eq!(view.draft(), "");
        assert_eq!(view.cursor(), 0);

        let stored = comments.get_for_task(4);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "Ready for review");
        assert_eq!(stored[0].name_of_sender, "Current User");
    }

    #[test]
    fn reset_clears_gate_and_draft() {
        let mut view = DetailView::default();
        view.propose(1, TaskStatus::Closed);
        view.draft_mut().0.push_str("half typed");
        view.reset();
        assert_eq!(view.pending(), None);
        assert_eq!(view.draft(), "");
    }
}
