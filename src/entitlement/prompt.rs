use serde::{Deserialize, Serialize};

use super::catalog::{feature_display_name, plan_display_name};

/// Upgrade call-to-action shown when a gate denies and no fallback is given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePrompt {
    pub feature_key: String,
    pub feature_name: String,
    pub plan_name: String,
    pub addon: Option<String>,
    pub title: String,
    pub message: String,
}

impl UpgradePrompt {
    /// Pure function of its inputs; safe to call for keys outside the catalog.
    pub fn compose(feature_key: &str, plan_tier: Option<&str>, addon: Option<&str>) -> Self {
        let feature_name = feature_display_name(feature_key);
        let plan_name = plan_display_name(plan_tier);
        let addon = addon.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string);

        let title = format!("{} Not Available", feature_name);
        let plan_word = plan_name.to_lowercase();
        let mut message = format!(
            "This feature requires {} {} plan",
            indefinite_article(&plan_word),
            plan_word
        );
        if let Some(addon) = &addon {
            message.push_str(&format!(", with {} add-on", addon));
        }
        message.push('.');

        Self {
            feature_key: feature_key.to_string(),
            feature_name,
            plan_name,
            addon,
            title,
            message,
        }
    }

    /// Single-line form: `<title> — <message>`
    pub fn text(&self) -> String {
        format!("{} — {}", self.title, self.message)
    }
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
