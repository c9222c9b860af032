use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Achievement, NewAchievement};

/// Persistence abstraction for achievement rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementStore: Send + Sync {
    /// Store a new row with a fresh id; the timestamp defaults to now
    async fn insert(&self, new: NewAchievement) -> Result<Achievement>;

    /// Department of the highest-id row whose employee equals `employee`
    async fn most_recent_department(&self, employee: String) -> Result<Option<String>>;

    /// Rows whose employee contains `employee`; all rows when it is empty or absent
    async fn search(&self, employee: Option<String>) -> Result<Vec<Achievement>>;

    /// Hard-delete the row with `id`; `false` when there was none
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Number of stored rows
    async fn count(&self) -> Result<usize>;
}

/// SQLite-backed store
///
/// rusqlite is blocking, so every call hops onto tokio's blocking pool with
/// its own clone of the connection pool handle.
#[derive(Clone)]
pub struct SqliteAchievementStore {
    database: Database,
}

impl SqliteAchievementStore {
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let database = self.database.clone();
        tokio::task::spawn_blocking(move || op(&database)).await?
    }
}

#[async_trait]
impl AchievementStore for SqliteAchievementStore {
    async fn insert(&self, new: NewAchievement) -> Result<Achievement> {
        self.run_blocking(move |db| db.insert_achievement(&new)).await
    }

    async fn most_recent_department(&self, employee: String) -> Result<Option<String>> {
        self.run_blocking(move |db| db.most_recent_department(&employee)).await
    }

    async fn search(&self, employee: Option<String>) -> Result<Vec<Achievement>> {
        self.run_blocking(move |db| db.search_achievements(employee.as_deref())).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.run_blocking(move |db| db.delete_achievement(id)).await
    }

    async fn count(&self) -> Result<usize> {
        self.run_blocking(Database::count_achievements).await
    }
}
