use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Task priority. Stored as lowercase text; unknown stored values decode to None.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Ordering rank used by `sort=priority` (high first, unset last).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// The persisted task record. `owner` is set once at creation and never
/// mutated by handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Manual FromRow so the priority column stays plain TEXT in the database.
impl<'r> FromRow<'r, PgRow> for Task {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let priority: Option<String> = row.try_get("priority")?;
        Ok(Self {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            title: row.try_get("title")?,
            completed: row.try_get("completed")?,
            priority: priority.as_deref().and_then(Priority::parse),
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Fields for a task about to be inserted. The store fills in id and
/// created_at.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner: Uuid,
    pub title: String,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update applied by PUT /tasks/{id}. Absent fields are left
/// untouched; owner and id are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Grouped counts over one user's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

impl TaskStats {
    pub fn empty() -> Self {
        Self { total: 0, completed: 0, pending: 0 }
    }
}
