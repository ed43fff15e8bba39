// handlers/gate.rs - POST /api/gate
//
// Mounts a gate over caller-supplied JSON content, waits for the decision and
// returns what the page shell should show.

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::entitlement::{
    EntitlementDecision, EntitlementGate, GatePreset, GateProps, Rendered, RenderedKind,
    UpgradePrompt,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct GateRequest {
    /// Feature key; ignored when `preset` is given
    #[serde(default)]
    pub feature_key: Option<String>,
    /// Preset name such as `ocean_freight`
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub children: Value,
    #[serde(default)]
    pub fallback: Option<Value>,
    #[serde(default)]
    pub show_upgrade_cta: Option<bool>,
    #[serde(default)]
    pub plan_tier: Option<String>,
    #[serde(default)]
    pub addon: Option<String>,
}

impl GateRequest {
    fn into_props(self) -> Result<GateProps<Value>, ApiError> {
        let mut props = match (self.preset.as_deref(), self.feature_key) {
            (Some(name), _) => GatePreset::parse(name)
                .ok_or_else(|| ApiError::not_found(format!("Unknown gate preset '{}'", name)))?
                .props(self.children),
            (None, Some(key)) if !key.trim().is_empty() => GateProps::new(key, self.children),
            (None, _) => return Err(ApiError::bad_request("Either 'feature_key' or 'preset' is required")),
        };

        if let Some(fallback) = self.fallback {
            props = props.with_fallback(fallback);
        }
        if let Some(show) = self.show_upgrade_cta {
            props = props.with_upgrade_cta(show);
        }
        if let Some(tier) = self.plan_tier {
            props = props.with_plan_tier(tier);
        }
        if let Some(addon) = self.addon {
            props = props.with_addon(addon);
        }
        Ok(props)
    }
}

#[derive(Debug, Serialize)]
pub struct GateView {
    pub feature_key: String,
    pub decision: EntitlementDecision,
    pub view: RenderedKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<UpgradePrompt>,
}

impl GateView {
    fn from_rendered(feature_key: &str, decision: EntitlementDecision, rendered: Rendered<'_, Value>) -> Self {
        let view = rendered.kind();
        let (content, prompt) = match rendered {
            Rendered::Content(value) | Rendered::Fallback(value) => (Some(value.clone()), None),
            Rendered::UpgradePrompt(prompt) => (None, Some(prompt)),
            Rendered::Loading | Rendered::Nothing => (None, None),
        };

        Self {
            feature_key: feature_key.to_string(),
            decision,
            view,
            content,
            prompt,
        }
    }
}

pub async fn gate_post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(request): Json<GateRequest>,
) -> ApiResult<GateView> {
    let props = request.into_props()?;
    let user = user.map(|Extension(user)| user);
    let backend = state.session_backend(user.as_ref());

    let gate = EntitlementGate::mount(backend, props);
    let decision = gate.settled().await;

    if state.log_decisions {
        tracing::info!(
            feature_key = %gate.props().feature_key,
            user = ?user.as_ref().map(|u| u.user_id),
            %decision,
            "Gate rendered"
        );
    }

    let view = GateView::from_rendered(&gate.props().feature_key, decision, gate.props().render(decision));
    Ok(ApiResponse::success(view))
}
