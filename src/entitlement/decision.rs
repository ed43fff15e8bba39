use serde::{Deserialize, Serialize};

use super::error::GateError;

/// Outcome of an entitlement resolution for one (organization, feature) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementDecision {
    /// Resolution still in flight
    Undetermined,
    Entitled,
    NotEntitled,
}

impl EntitlementDecision {
    pub fn is_entitled(&self) -> bool {
        matches!(self, EntitlementDecision::Entitled)
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, EntitlementDecision::Undetermined)
    }

    /// Oracle answer to decision; an absent answer is a denial
    pub fn from_answer(answer: Option<bool>) -> Self {
        match answer {
            Some(true) => EntitlementDecision::Entitled,
            Some(false) | None => EntitlementDecision::NotEntitled,
        }
    }

    /// Fold a resolution chain. Errors never produce `Entitled`.
    pub fn from_resolution(result: &Result<bool, GateError>) -> Self {
        match result {
            Ok(true) => EntitlementDecision::Entitled,
            Ok(false) | Err(_) => EntitlementDecision::NotEntitled,
        }
    }
}

impl std::fmt::Display for EntitlementDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntitlementDecision::Undetermined => "undetermined",
            EntitlementDecision::Entitled => "entitled",
            EntitlementDecision::NotEntitled => "not_entitled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_answer_is_denial() {
        assert_eq!(EntitlementDecision::from_answer(None), EntitlementDecision::NotEntitled);
        assert_eq!(EntitlementDecision::from_answer(Some(true)), EntitlementDecision::Entitled);
    }

    #[test]
    fn errors_fold_closed() {
        let result: Result<bool, GateError> = Err(GateError::OracleUnavailable("down".into()));
        assert_eq!(EntitlementDecision::from_resolution(&result), EntitlementDecision::NotEntitled);
        assert!(!EntitlementDecision::Undetermined.is_settled());
    }
}
