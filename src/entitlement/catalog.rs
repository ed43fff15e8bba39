use serde::{Deserialize, Serialize};

/// Gated capabilities known to the portals.
///
/// The vocabulary is closed: anything that does not parse into one of these
/// variants is treated as "not entitled" by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKey {
    #[serde(rename = "loads.ocean")]
    LoadsOcean,
    #[serde(rename = "loads.air")]
    LoadsAir,
    #[serde(rename = "loads.drayage")]
    LoadsDrayage,
    #[serde(rename = "loads.multi_stop")]
    LoadsMultiStop,
    #[serde(rename = "analytics.advanced")]
    AnalyticsAdvanced,
    #[serde(rename = "analytics.custom_reports")]
    AnalyticsCustomReports,
    #[serde(rename = "operations.bulk")]
    OperationsBulk,
    #[serde(rename = "data.export")]
    DataExport,
    #[serde(rename = "api.access")]
    ApiAccess,
    #[serde(rename = "factoring.invoices")]
    FactoringInvoices,
    #[serde(rename = "rates.market")]
    RatesMarket,
    #[serde(rename = "directory.carriers")]
    DirectoryCarriers,
    #[serde(rename = "drivers.eld")]
    DriversEld,
    #[serde(rename = "portal.owner_operator")]
    PortalOwnerOperator,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 14] = [
        FeatureKey::LoadsOcean,
        FeatureKey::LoadsAir,
        FeatureKey::LoadsDrayage,
        FeatureKey::LoadsMultiStop,
        FeatureKey::AnalyticsAdvanced,
        FeatureKey::AnalyticsCustomReports,
        FeatureKey::OperationsBulk,
        FeatureKey::DataExport,
        FeatureKey::ApiAccess,
        FeatureKey::FactoringInvoices,
        FeatureKey::RatesMarket,
        FeatureKey::DirectoryCarriers,
        FeatureKey::DriversEld,
        FeatureKey::PortalOwnerOperator,
    ];

    /// Dotted wire form, e.g. `loads.ocean`
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::LoadsOcean => "loads.ocean",
            FeatureKey::LoadsAir => "loads.air",
            FeatureKey::LoadsDrayage => "loads.drayage",
            FeatureKey::LoadsMultiStop => "loads.multi_stop",
            FeatureKey::AnalyticsAdvanced => "analytics.advanced",
            FeatureKey::AnalyticsCustomReports => "analytics.custom_reports",
            FeatureKey::OperationsBulk => "operations.bulk",
            FeatureKey::DataExport => "data.export",
            FeatureKey::ApiAccess => "api.access",
            FeatureKey::FactoringInvoices => "factoring.invoices",
            FeatureKey::RatesMarket => "rates.market",
            FeatureKey::DirectoryCarriers => "directory.carriers",
            FeatureKey::DriversEld => "drivers.eld",
            FeatureKey::PortalOwnerOperator => "portal.owner_operator",
        }
    }

    /// Human-readable label used in upgrade prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureKey::LoadsOcean => "Ocean Freight",
            FeatureKey::LoadsAir => "Air Freight",
            FeatureKey::LoadsDrayage => "Drayage",
            FeatureKey::LoadsMultiStop => "Multi-Stop Loads",
            FeatureKey::AnalyticsAdvanced => "Advanced Analytics",
            FeatureKey::AnalyticsCustomReports => "Custom Reports",
            FeatureKey::OperationsBulk => "Bulk Operations",
            FeatureKey::DataExport => "Data Export",
            FeatureKey::ApiAccess => "API Access",
            FeatureKey::FactoringInvoices => "Invoice Factoring",
            FeatureKey::RatesMarket => "Market Rates",
            FeatureKey::DirectoryCarriers => "Carrier Directory",
            FeatureKey::DriversEld => "ELD Integration",
            FeatureKey::PortalOwnerOperator => "Owner-Operator Portal",
        }
    }

    /// Exact match against the catalog. Keys are case-sensitive.
    pub fn parse(key: &str) -> Option<FeatureKey> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription tiers, presentation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Starter => "Starter",
            PlanTier::Pro => "Pro",
            PlanTier::Enterprise => "Enterprise",
        }
    }

    pub fn parse(tier: &str) -> Option<PlanTier> {
        match tier {
            "free" => Some(PlanTier::Free),
            "starter" => Some(PlanTier::Starter),
            "pro" => Some(PlanTier::Pro),
            "enterprise" => Some(PlanTier::Enterprise),
            _ => None,
        }
    }
}

/// Feature label for an arbitrary key string: catalog name when known,
/// otherwise the humanized key.
pub fn feature_display_name(key: &str) -> String {
    match FeatureKey::parse(key) {
        Some(feature) => feature.display_name().to_string(),
        None => humanize_key(key),
    }
}

/// Plan label for an optional tier string: catalog name, raw tier, or "Upgraded".
pub fn plan_display_name(tier: Option<&str>) -> String {
    match tier.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => PlanTier::parse(t)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| t.to_string()),
        None => "Upgraded".to_string(),
    }
}

/// `analytics.custom_reports` -> `Analytics Custom Reports`
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '.' || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_catalog_key() {
        for feature in FeatureKey::ALL {
            assert_eq!(FeatureKey::parse(feature.as_str()), Some(feature));
        }
    }

    #[test]
    fn rejects_unknown_and_miscased_keys() {
        assert_eq!(FeatureKey::parse("loads.spaceflight"), None);
        assert_eq!(FeatureKey::parse("Loads.Ocean"), None);
        assert_eq!(FeatureKey::parse(""), None);
    }

    #[test]
    fn serde_uses_dotted_form() {
        let json = serde_json::to_string(&FeatureKey::AnalyticsAdvanced).unwrap();
        assert_eq!(json, "\"analytics.advanced\"");
    }

    #[test]
    fn humanizes_unknown_keys() {
        assert_eq!(humanize_key("analytics.custom_reports"), "Analytics Custom Reports");
        assert_eq!(humanize_key("yard-check.daily"), "Yard Check Daily");
        assert_eq!(humanize_key("..x"), "X");
        assert_eq!(feature_display_name("loads.ocean"), "Ocean Freight");
        assert_eq!(feature_display_name("fleet.telematics"), "Fleet Telematics");
    }

    #[test]
    fn plan_names_fall_back() {
        assert_eq!(plan_display_name(Some("enterprise")), "Enterprise");
        assert_eq!(plan_display_name(Some("platinum")), "platinum");
        assert_eq!(plan_display_name(Some("  ")), "Upgraded");
        assert_eq!(plan_display_name(None), "Upgraded");
    }
}
