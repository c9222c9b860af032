//! Database schema definitions
//!
//! Constants for table and column names used with rusqlite.

/// Achievement table schema
pub mod achievement {
    /// Table name
    pub const TABLE: &str = "achievement";
    /// Primary key column, assigned by SQLite and never reused
    pub const ID: &str = "id";
    /// Employee full name column
    pub const EMPLOYEE: &str = "employee";
    /// Department name column (denormalized copy, not a foreign key)
    pub const DEPARTMENT: &str = "department";
    /// Achievement description column
    pub const ACHIEVEMENT: &str = "achievement";
    /// Point value column, stored as text
    pub const POINT: &str = "point";
    /// Creation timestamp column
    pub const UPDATE_TS: &str = "update_ts";
}
