use serde::Serialize;

use super::catalog::{FeatureKey, PlanTier};
use super::gate::GateProps;

/// Gates the portals mount often enough to warrant fixed props.
///
/// The tier/add-on pairs here are maintained by hand and are not read from the
/// oracle's feature definitions; they only affect prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePreset {
    OceanFreight,
    AirFreight,
    AdvancedAnalytics,
    BulkOperations,
    DataExport,
}

impl GatePreset {
    pub const ALL: [GatePreset; 5] = [
        GatePreset::OceanFreight,
        GatePreset::AirFreight,
        GatePreset::AdvancedAnalytics,
        GatePreset::BulkOperations,
        GatePreset::DataExport,
    ];

    pub fn feature_key(&self) -> FeatureKey {
        match self {
            GatePreset::OceanFreight => FeatureKey::LoadsOcean,
            GatePreset::AirFreight => FeatureKey::LoadsAir,
            GatePreset::AdvancedAnalytics => FeatureKey::AnalyticsAdvanced,
            GatePreset::BulkOperations => FeatureKey::OperationsBulk,
            GatePreset::DataExport => FeatureKey::DataExport,
        }
    }

    pub fn plan_tier(&self) -> PlanTier {
        match self {
            GatePreset::OceanFreight | GatePreset::AirFreight => PlanTier::Enterprise,
            GatePreset::AdvancedAnalytics
            | GatePreset::BulkOperations
            | GatePreset::DataExport => PlanTier::Pro,
        }
    }

    pub fn addon(&self) -> Option<&'static str> {
        match self {
            GatePreset::OceanFreight => Some("ocean"),
            GatePreset::AirFreight => Some("air"),
            _ => None,
        }
    }

    pub fn parse(name: &str) -> Option<GatePreset> {
        match name {
            "ocean_freight" => Some(GatePreset::OceanFreight),
            "air_freight" => Some(GatePreset::AirFreight),
            "advanced_analytics" => Some(GatePreset::AdvancedAnalytics),
            "bulk_operations" => Some(GatePreset::BulkOperations),
            "data_export" => Some(GatePreset::DataExport),
            _ => None,
        }
    }

    /// Props with this preset's key, tier and add-on filled in
    pub fn props<C>(&self, children: C) -> GateProps<C> {
        let props = GateProps::new(self.feature_key().as_str(), children)
            .with_plan_tier(self.plan_tier().as_str());
        match self.addon() {
            Some(addon) => props.with_addon(addon),
            None => props,
        }
    }
}
