use axum::{extract::Path, extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::model::TaskPatch;
use crate::ownership::ensure_owner;
use crate::AppState;

use super::parse_task_id;

/// PUT /tasks/{id} - partial update after the ownership check.
///
/// The fetch and the update are separate store calls; the window between them
/// is not closed (accepted limitation, the store offers no conditional write).
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    let found = state.tasks.find_one(id).await?;
    ensure_owner(found, user.id)?;

    let task = state.tasks.update_by_id(id, patch).await?;

    Ok(Json(json!({ "success": true, "data": task })))
}
