// handlers/mod.rs - HTTP host shell for entitlement gates
//
// Page shells ask this service which of content / fallback / upgrade prompt /
// nothing to show for a feature. Every route accepts an optional bearer token;
// the session middleware turns it into an AuthUser extension when valid.

pub mod entitlements;
pub mod features;
pub mod gate;
pub mod whoami;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::entitlement::{GateBackend, SessionIdentity};
use crate::middleware::{session_middleware, AuthUser};

/// Shared handler state; built once at startup
#[derive(Clone)]
pub struct AppState {
    pub backend: GateBackend,
    pub jwt_secret: Arc<str>,
    pub log_decisions: bool,
}

impl AppState {
    pub fn new(backend: GateBackend, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            backend,
            jwt_secret: jwt_secret.into(),
            log_decisions: false,
        }
    }

    pub fn with_decision_logging(mut self, enabled: bool) -> Self {
        self.log_decisions = enabled;
        self
    }

    /// Shared collaborators bound to this request's session
    pub(crate) fn session_backend(&self, user: Option<&AuthUser>) -> GateBackend {
        let principal = user.map(AuthUser::principal);
        self.backend.with_identity(Arc::new(SessionIdentity(principal)))
    }
}

/// Gate API routes with the session layer applied
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/features", get(features::features_list))
        .route("/api/presets", get(features::presets_list))
        .route("/api/entitlements/:feature_key", get(entitlements::entitlement_get))
        .route("/api/gate", post(gate::gate_post))
        .route("/api/auth/whoami", get(whoami::session_whoami))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .with_state(state)
}
