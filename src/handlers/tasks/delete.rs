use axum::{extract::Path, extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::ownership::ensure_owner;
use crate::AppState;

use super::parse_task_id;

/// DELETE /tasks/{id} - remove one task after the ownership check.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    let found = state.tasks.find_one(id).await?;
    ensure_owner(found, user.id)?;

    state.tasks.delete_by_id(id).await?;

    Ok(Json(json!({ "success": true, "data": {} })))
}
