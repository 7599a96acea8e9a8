use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::models::{Comment, CommentId, Priority, Task, TaskId, TaskStatus};
use crate::config::FixtureConfig;

const TASK_NAMES: &[&str] = &[
    "File upload for chats",
    "User authentication flow",
    "API rate limiting",
    "Database optimization",
    "Mobile responsive design",
    "Payment integration",
    "Search functionality",
    "Email notifications",
    "Analytics dashboard",
    "Performance monitoring",
];

const LABELS: &[&str] = &[
    "Update pending",
    "In review",
    "Blocked",
    "Ready for QA",
    "Critical",
    "Enhancement",
    "Bug fix",
    "Feature request",
];

const SENDERS: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Mike Johnson",
    "Sarah Wilson",
    "Alex Brown",
];

const COMMENT_CONTENTS: &[&str] = &[
    "Let's prioritize this for next sprint",
    "I've started working on this",
    "Needs more clarification",
    "This looks good to me",
    "Can we discuss this in the next meeting?",
    "I've added some test cases",
    "Documentation has been updated",
    "Ready for review",
];

const TASK_AGE_DAYS: i64 = 30;
const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Synthetic board contents: tasks in id order, comments newest first.
pub struct Fixtures {
    pub tasks: Vec<Task>,
    pub comments: Vec<Comment>,
}

/// Build the board contents described by `config`, relative to `now`.
pub fn generate(config: &FixtureConfig, now: DateTime<Utc>) -> Fixtures {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate_with(&mut rng, config.task_count, config.comments_per_task, now)
}

fn generate_with<R: Rng>(
    rng: &mut R,
    task_count: usize,
    comments_per_task: usize,
    now: DateTime<Utc>,
) -> Fixtures {
    let mut tasks = Vec::with_capacity(task_count);
    let mut comments = Vec::with_capacity(task_count * comments_per_task);

    for index in 0..task_count {
        let id = index as TaskId + 1;
        let created_at = now - random_age(rng, TASK_AGE_DAYS);
        let updated_at = (now - random_age(rng, ACTIVITY_WINDOW_DAYS)).max(created_at);

        let mut labels = vec![pick(rng, LABELS).to_string()];
        if rng.random_bool(0.3) {
            let extra = pick(rng, LABELS);
            if !labels.iter().any(|l| l == extra) {
                labels.push(extra.to_string());
            }
        }

        tasks.push(Task {
            id,
            name: pick(rng, TASK_NAMES).to_string(),
            labels,
            status: TaskStatus::ALL[rng.random_range(0..TaskStatus::ALL.len())],
            priority: Priority::ALL[rng.random_range(0..Priority::ALL.len())],
            created_at,
            updated_at,
        });

        for _ in 0..comments_per_task {
            comments.push(Comment {
                id: 0,
                content: pick(rng, COMMENT_CONTENTS).to_string(),
                name_of_sender: pick(rng, SENDERS).to_string(),
                created_at: (now - random_age(rng, ACTIVITY_WINDOW_DAYS)).max(created_at),
                task_id: id,
            });
        }
    }

    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    // Oldest comment gets id 1, so later `len + 1` appends never collide.
    let total = comments.len();
    for (pos, comment) in comments.iter_mut().enumerate() {
        comment.id = (total - pos) as CommentId;
    }

    Fixtures { tasks, comments }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn random_age<R: Rng>(rng: &mut R, max_days: i64) -> TimeDelta {
    TimeDelta::milliseconds(rng.random_range(0..max_days * 24 * 60 * 60 * 1000))
}
