//! Data models for achievements and their export
//!
//! This module contains the persisted achievement row, the insert payload
//! and the export format selector.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// One persisted record of points an employee earned for an accomplishment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Database primary key
    pub id: i64,
    /// Employee full name
    pub employee: String,
    /// Department the employee belonged to when the entry was made
    pub department: String,
    /// Description of the accomplishment
    pub achievement: String,
    /// Point value as stored (text)
    pub point: String,
    /// Creation timestamp, set once by the store
    #[serde(serialize_with = "serialize_whole_seconds")]
    pub update_ts: DateTime<Utc>,
}

impl Achievement {
    /// Creation timestamp as ISO-8601 with sub-second precision dropped
    #[must_use]
    pub fn update_ts_display(&self) -> String {
        format_whole_seconds(&self.update_ts)
    }
}

fn format_whole_seconds(ts: &DateTime<Utc>) -> String {
    ts.trunc_subsecs(0).to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn serialize_whole_seconds<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_whole_seconds(ts))
}

/// Data for creating a new achievement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAchievement {
    /// Employee full name
    pub employee: String,
    /// Department name
    pub department: String,
    /// Description of the accomplishment
    pub achievement: String,
    /// Point value as text
    pub point: String,
    /// Creation timestamp (optional, defaults to now)
    pub update_ts: Option<DateTime<Utc>>,
}

impl NewAchievement {
    /// Insert payload stamped with the store's current time
    pub fn new(
        employee: impl Into<String>,
        department: impl Into<String>,
        achievement: impl Into<String>,
        point: impl Into<String>,
    ) -> Self {
        Self {
            employee: employee.into(),
            department: department.into(),
            achievement: achievement.into(),
            point: point.into(),
            update_ts: None,
        }
    }
}

/// Output format for exported achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON array of objects
    #[default]
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format {other:?}, expected json or csv")),
        }
    }
}
