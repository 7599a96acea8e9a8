use std::collections::VecDeque;

use super::models::{Comment, CommentId, NewComment, TaskId};

/// Append-only comment log, newest first.
#[derive(Debug, Default, Clone)]
pub struct CommentStore {
    comments: VecDeque<Comment>,
}

impl CommentStore {
    /// `comments` are kept in the order given; fixtures pass them newest first.
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments: comments.into(),
        }
    }

    /// Comments belonging to `task_id`, in store order (newest first).
    pub fn get_for_task(&self, task_id: TaskId) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Prepend a comment and return the id it was given.
    ///
    /// Ids are `len + 1`. This is only unique while nothing is ever removed
    /// and appends are serialised; both hold today since there is no delete.
    pub fn append(&mut self, comment: NewComment) -> CommentId {
        let id = self.comments.len() as CommentId + 1;
        self.comments.push_front(Comment {
            id,
            content: comment.content,
            name_of_sender: comment.name_of_sender,
            created_at: comment.created_at,
            task_id: comment.task_id,
        });
        id
    }
}
