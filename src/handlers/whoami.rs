// handlers/whoami.rs - GET /api/auth/whoami

use axum::extract::Extension;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Echo the session the gate endpoints will see. Useful when a page shows an
/// upgrade prompt unexpectedly.
pub async fn session_whoami(user: Option<Extension<AuthUser>>) -> ApiResult<AuthUser> {
    match user {
        Some(Extension(user)) => Ok(ApiResponse::success(user)),
        None => Err(ApiError::unauthorized("No valid session token")),
    }
}
