use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::verify_password;
use crate::error::ApiError;
use crate::AppState;

use super::token_response;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - exchange credentials for a token.
///
/// Unknown email and wrong password produce the identical message, so the
/// endpoint cannot be used to probe which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError> {
    let email = body
        .email
        .ok_or_else(|| ApiError::validation_error("Please provide email and password"))?;
    let password = body
        .password
        .ok_or_else(|| ApiError::validation_error("Please provide email and password"))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&password, &user.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(Json(token_response(&user)?))
}
