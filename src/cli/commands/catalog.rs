use serde_json::json;

use crate::cli::utils::output_table;
use crate::cli::OutputFormat;
use crate::entitlement::{FeatureKey, GatePreset};

pub fn features(output_format: OutputFormat) -> anyhow::Result<()> {
    let rows = FeatureKey::ALL
        .iter()
        .map(|key| vec![key.as_str().to_string(), key.display_name().to_string()])
        .collect();

    let json_rows = json!(FeatureKey::ALL
        .iter()
        .map(|key| json!({ "key": key, "name": key.display_name() }))
        .collect::<Vec<_>>());

    output_table(&output_format, "features", &["KEY", "NAME"], rows, json_rows)
}

pub fn presets(output_format: OutputFormat) -> anyhow::Result<()> {
    let rows = GatePreset::ALL
        .iter()
        .map(|preset| {
            vec![
                serde_json::to_value(preset)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                preset.feature_key().as_str().to_string(),
                preset.plan_tier().as_str().to_string(),
                preset.addon().unwrap_or("-").to_string(),
            ]
        })
        .collect();

    let json_rows = json!(GatePreset::ALL
        .iter()
        .map(|preset| json!({
            "preset": preset,
            "feature_key": preset.feature_key(),
            "plan_tier": preset.plan_tier(),
            "addon": preset.addon(),
        }))
        .collect::<Vec<_>>());

    output_table(&output_format, "presets", &["PRESET", "FEATURE", "PLAN", "ADDON"], rows, json_rows)
}
