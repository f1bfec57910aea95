//! Translates the raw `/tasks` query parameters into a store filter and sort
//! specification. Parsing is deliberately lenient and never fails: `completed`
//! is an exact-match comparison against the literal `"true"`, an unrecognized
//! `priority` simply matches no tasks, and an unrecognized `sort` falls back
//! to the default ordering. These are part of the external contract.

use serde::Deserialize;
use uuid::Uuid;

/// Raw query parameters accepted by GET /tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub completed: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

/// Store filter. The owner is always present; the caller can only ever see
/// their own tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub owner: Uuid,
    pub completed: Option<bool>,
    /// Kept as raw text and matched against the stored lowercase name, so an
    /// unknown value filters to an empty result instead of erroring.
    pub priority: Option<String>,
}

impl TaskFilter {
    /// Filter that matches everything a user owns.
    pub fn owned_by(owner: Uuid) -> Self {
        Self { owner, completed: None, priority: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    /// `sort=dueDate`: ascending by due date, tasks without one first.
    DueDateAsc,
    /// `sort=priority`: descending by priority rank (high, medium, low, unset).
    PriorityDesc,
    /// Default: newest first.
    CreatedDesc,
}

/// Build the filter and sort for a list request.
pub fn build_query(owner: Uuid, params: &ListParams) -> (TaskFilter, TaskSort) {
    let filter = TaskFilter {
        owner,
        completed: params.completed.as_deref().map(|v| v == "true"),
        priority: params.priority.clone(),
    };

    let sort = match params.sort.as_deref() {
        Some("dueDate") => TaskSort::DueDateAsc,
        Some("priority") => TaskSort::PriorityDesc,
        _ => TaskSort::CreatedDesc,
    };

    (filter, sort)
}
