// handlers/entitlements.rs - GET /api/entitlements/:feature_key

use axum::extract::{Extension, Path, State};
use serde::Serialize;

use super::AppState;
use crate::entitlement::{decide, EntitlementDecision};
use crate::middleware::{ApiResponse, AuthUser};

#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub feature_key: String,
    pub decision: EntitlementDecision,
    pub entitled: bool,
}

/// Always 200: backend trouble is indistinguishable from a plain denial.
pub async fn entitlement_get(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(feature_key): Path<String>,
) -> ApiResponse<EntitlementResponse> {
    let user = user.map(|Extension(user)| user);
    let backend = state.session_backend(user.as_ref());

    let decision = decide(&backend, &feature_key).await;

    if state.log_decisions {
        tracing::info!(
            feature_key = %feature_key,
            user = ?user.as_ref().map(|u| u.user_id),
            %decision,
            "Entitlement check"
        );
    }

    ApiResponse::success(EntitlementResponse {
        feature_key,
        entitled: decision.is_entitled(),
        decision,
    })
}
