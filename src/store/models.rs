use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = u64;
pub type CommentId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Closed,
}

impl TaskStatus {
    /// Tab order, also the order of the `1`/`2`/`3` shortcuts.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Closed => "CLOSED",
        }
    }

    /// Human label used on tabs and in the detail view.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Closed => "Closed",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TaskStatus::Open => "○",
            TaskStatus::InProgress => "●",
            TaskStatus::Closed => "✓",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskStatus::Open => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Closed,
            TaskStatus::Closed => TaskStatus::Open,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TaskStatus::Open => TaskStatus::Closed,
            TaskStatus::InProgress => TaskStatus::Open,
            TaskStatus::Closed => TaskStatus::InProgress,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TaskStatus::Open),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "closed" => Ok(TaskStatus::Closed),
            other => Err(format!(
                "unknown status '{other}' (expected open, in-progress or closed)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub labels: Vec<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub name_of_sender: String,
    pub created_at: DateTime<Utc>,
    pub task_id: TaskId,
}

/// A comment that has not been given an id yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub name_of_sender: String,
    pub created_at: DateTime<Utc>,
    pub task_id: TaskId,
}
