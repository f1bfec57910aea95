use axum::{extract::Query, extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::query::{build_query, ListParams};
use crate::AppState;

/// GET /tasks - list the caller's tasks, optionally filtered and sorted.
///
/// No pagination: the full result set is returned (documented limitation).
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let (filter, sort) = build_query(user.id, &params);
    let tasks = state.tasks.find_many(&filter, sort).await?;

    Ok(Json(json!({
        "success": true,
        "count": tasks.len(),
        "data": tasks,
    })))
}
