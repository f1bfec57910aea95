//! The ownership guard applied before every single-record operation. Absence
//! wins over ownership: a missing task is reported as NotFound before any
//! owner comparison happens, so callers cannot probe which ids exist.

use uuid::Uuid;

use crate::error::ApiError;
use crate::model::Task;

/// Check a fetched task against the authenticated caller.
///
/// Returns the task when the caller owns it, `NotFound` when it does not
/// exist, and `Unauthorized` when it belongs to someone else. Called
/// independently by get-one, update, and delete; never cached or batched.
pub fn ensure_owner(found: Option<Task>, caller: Uuid) -> Result<Task, ApiError> {
    let task = found.ok_or_else(|| ApiError::not_found("Task not found"))?;

    if task.owner != caller {
        return Err(ApiError::unauthorized("Not authorized to access this task"));
    }

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task_owned_by(owner: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            owner,
            title: "buy milk".into(),
            completed: false,
            priority: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn absent_task_is_not_found() {
        let err = ensure_owner(None, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn foreign_task_is_unauthorized() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let err = ensure_owner(Some(task_owned_by(owner)), stranger).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn owner_passes() {
        let owner = Uuid::new_v4();
        let task = ensure_owner(Some(task_owned_by(owner)), owner).unwrap();
        assert_eq!(task.owner, owner);
    }
}
