// handlers/features.rs - GET /api/features, GET /api/presets

use serde::Serialize;

use crate::entitlement::{FeatureKey, GatePreset, PlanTier};
use crate::middleware::ApiResponse;

#[derive(Debug, Serialize)]
pub struct FeatureEntry {
    pub key: FeatureKey,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PresetEntry {
    pub preset: GatePreset,
    pub feature_key: FeatureKey,
    pub plan_tier: PlanTier,
    pub addon: Option<&'static str>,
}

/// GET /api/features - the closed feature catalog
pub async fn features_list() -> ApiResponse<Vec<FeatureEntry>> {
    let features = FeatureKey::ALL
        .iter()
        .map(|key| FeatureEntry { key: *key, name: key.display_name() })
        .collect();

    ApiResponse::success(features)
}

/// GET /api/presets - preconfigured gates and their prompt metadata
pub async fn presets_list() -> ApiResponse<Vec<PresetEntry>> {
    let presets = GatePreset::ALL
        .iter()
        .map(|preset| PresetEntry {
            preset: *preset,
            feature_key: preset.feature_key(),
            plan_tier: preset.plan_tier(),
            addon: preset.addon(),
        })
        .collect();

    ApiResponse::success(presets)
}
