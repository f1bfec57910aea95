// /auth handlers: register and login are public, me requires a bearer token.

pub mod login;
pub mod me;
pub mod register;

pub use login::login;
pub use me::me;
pub use register::register;

use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::model::User;

/// Token response shared by register and login.
pub(crate) fn token_response(user: &User) -> Result<Value, ApiError> {
    let token = generate_jwt(Claims::for_user(user)).map_err(|e| {
        tracing::error!("failed to issue JWT: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(json!({
        "success": true,
        "data": {
            "token": token,
            "expiresIn": expires_in,
            "user": user,
        }
    }))
}
