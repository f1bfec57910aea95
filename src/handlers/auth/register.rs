use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::model::NewUser;
use crate::AppState;

use super::token_response;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/register - create an account and return a token.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = required(body.name, "name")?;
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation_error(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = state
        .users
        .insert_user(NewUser {
            name,
            email,
            password: hash_password(&password),
        })
        .await?;

    tracing::info!(user = %user.id, "registered new account");

    Ok((StatusCode::CREATED, Json(token_response(&user)?)))
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation_error(format!("Please provide {}", field))),
    }
}
