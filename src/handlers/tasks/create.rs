use axum::{extract::State, http::StatusCode, response::Json, Extension};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::model::{NewTask, Priority};
use crate::AppState;

/// Create payload. Any client-supplied `owner` or `id` field is simply not
/// part of this shape and gets dropped on deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// POST /tasks - create a task owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Owner is always the authenticated caller, never the request body
    let new_task = NewTask {
        owner: user.id,
        title: body.title.unwrap_or_default(),
        completed: body.completed.unwrap_or(false),
        priority: body.priority,
        due_date: body.due_date,
    };

    let task = state.tasks.insert(new_task).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": task })),
    ))
}
