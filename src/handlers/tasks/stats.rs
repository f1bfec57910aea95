use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /tasks/stats - total/completed/pending counts for the caller.
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.tasks.aggregate_counts(user.id).await?;

    Ok(Json(json!({ "success": true, "data": stats })))
}
