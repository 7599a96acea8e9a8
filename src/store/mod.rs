mod comments;
pub mod fixtures;
mod models;
mod tasks;

pub use comments::CommentStore;
pub use models::*;
pub use tasks::TaskStore;

use chrono::Utc;

use crate::config::FixtureConfig;

/// Everything the board knows about, in memory for the life of the process.
///
/// Mutation goes through [`TaskStore::set_status`] and
/// [`CommentStore::append`]; nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct Store {
    pub tasks: TaskStore,
    pub comments: CommentStore,
}

impl Store {
    pub fn new(tasks: Vec<Task>, comments: Vec<Comment>) -> Self {
        Store {
            tasks: TaskStore::new(tasks),
            comments: CommentStore::new(comments),
        }
    }

    /// Populate both stores from the fixture generator.
    pub fn generate(config: &FixtureConfig) -> Self {
        let fixtures = fixtures::generate(config, Utc::now());
        tracing::info!(
            tasks = fixtures.tasks.len(),
            comments = fixtures.comments.len(),
            seed = ?config.seed,
            "generated board fixtures"
        );
        Store::new(fixtures.tasks, fixtures.comments)
    }
}
