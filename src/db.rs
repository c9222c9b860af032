use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::models::{Achievement, NewAchievement};
use crate::schema::achievement;

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database manager for handling connections and operations
///
/// Every operation checks a connection out of the pool for its own
/// duration; the connection goes back to the pool when it is dropped, on
/// success and error paths alike.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    metrics: MetricsCollector,
}

impl Database {
    /// Open (or create) the database at `database_url` with default pool settings
    pub fn new(database_url: &str) -> Result<Self> {
        Self::with_config(&DatabaseConfig {
            url: database_url.to_string(),
            ..DatabaseConfig::default()
        })
    }

    /// Open (or create) the database described by `config`
    pub fn with_config(config: &DatabaseConfig) -> Result<Self> {
        let path = database_path(&config.url);

        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build(manager)?;

        // Run migrations
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        info!(path, "Opened achievement database");
        Ok(Self {
            pool,
            metrics: MetricsCollector::default(),
        })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!(
            "../migrations/2026-10-16-000000_create_achievement/up.sql"
        ))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `op` against a pooled connection, recording its duration and outcome
    fn with_connection<T>(&self, operation: &'static str, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let timer = MetricsTimer::new(self.metrics, operation);
        let result = self.get_connection().and_then(|conn| op(&conn));
        timer.finish(result.is_ok());
        result
    }

    /// Insert a new achievement and return the stored row
    pub fn insert_achievement(&self, new: &NewAchievement) -> Result<Achievement> {
        self.with_connection("insert", |conn| {
            let update_ts = new.update_ts.unwrap_or_else(Utc::now);

            conn.execute(
                &format!(
                    "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5)",
                    achievement::TABLE,
                    achievement::EMPLOYEE,
                    achievement::DEPARTMENT,
                    achievement::ACHIEVEMENT,
                    achievement::POINT,
                    achievement::UPDATE_TS
                ),
                params![new.employee, new.department, new.achievement, new.point, update_ts],
            )?;

            let id = conn.last_insert_rowid();
            debug!(id, employee = %new.employee, "Inserted achievement");

            Ok(Achievement {
                id,
                employee: new.employee.clone(),
                department: new.department.clone(),
                achievement: new.achievement.clone(),
                point: new.point.clone(),
                update_ts,
            })
        })
    }

    /// Department of the newest achievement recorded for exactly `employee`
    pub fn most_recent_department(&self, employee: &str) -> Result<Option<String>> {
        self.with_connection("most_recent_department", |conn| {
            let department = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {} DESC LIMIT 1",
                        achievement::DEPARTMENT,
                        achievement::TABLE,
                        achievement::EMPLOYEE,
                        achievement::ID
                    ),
                    params![employee],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(department)
        })
    }

    /// Achievements whose employee contains `employee`, or all of them when
    /// the filter is empty or absent. Ordered by id.
    ///
    /// The match is a literal, case-sensitive substring test: `instr` is
    /// used instead of `LIKE`, which would fold ASCII case and treat `%` and
    /// `_` as wildcards.
    pub fn search_achievements(&self, employee: Option<&str>) -> Result<Vec<Achievement>> {
        self.with_connection("search", |conn| {
            let filter = employee.filter(|name| !name.is_empty());

            let mut query = format!("SELECT * FROM {}", achievement::TABLE);
            if filter.is_some() {
                query.push_str(&format!(" WHERE instr({}, ?1) > 0", achievement::EMPLOYEE));
            }
            query.push_str(&format!(" ORDER BY {} ASC", achievement::ID));

            let mut stmt = conn.prepare(&query)?;
            let rows = match filter {
                Some(name) => stmt.query_map(params![name], map_achievement)?,
                None => stmt.query_map([], map_achievement)?,
            };

            let mut results = Vec::new();
            for row in rows {
                results.push(row?);
            }

            if filter.is_none() {
                self.metrics.update_store_rows(results.len());
            }
            Ok(results)
        })
    }

    /// Delete the achievement with `id`; returns whether a row was removed
    pub fn delete_achievement(&self, id: i64) -> Result<bool> {
        self.with_connection("delete", |conn| {
            let removed = conn.execute(
                &format!("DELETE FROM {} WHERE {} = ?1", achievement::TABLE, achievement::ID),
                params![id],
            )?;
            debug!(id, removed, "Deleted achievement");
            Ok(removed > 0)
        })
    }

    /// Number of stored achievements
    pub fn count_achievements(&self) -> Result<usize> {
        self.with_connection("count", |conn| {
            let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", achievement::TABLE), [], |row| {
                row.get(0)
            })?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
    }
}

/// Map a database row to an Achievement
fn map_achievement(row: &Row) -> rusqlite::Result<Achievement> {
    Ok(Achievement {
        id: row.get(achievement::ID)?,
        employee: row.get(achievement::EMPLOYEE)?,
        department: row.get(achievement::DEPARTMENT)?,
        achievement: row.get(achievement::ACHIEVEMENT)?,
        point: row.get(achievement::POINT)?,
        update_ts: row.get(achievement::UPDATE_TS)?,
    })
}

/// Strip the `sqlite:` scheme (and an optional `//`) from a database URL
#[must_use]
pub fn database_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite:")
        .map_or(database_url, |rest| rest.strip_prefix("//").unwrap_or(rest))
}
