use std::time::Duration;
use thiserror::Error;

/// Failure reported by a gate collaborator (identity, membership, oracle)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// The oracle reports the same failure shapes as the other collaborators
pub type OracleError = ProviderError;

/// Why a resolution did not end in a positive oracle answer.
///
/// Every variant folds to `NotEntitled` at the gate boundary; the variant only
/// decides how the failure is logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Unknown feature key: {0}")]
    UnknownFeature(String),

    #[error("No authenticated principal")]
    Unauthenticated,

    #[error("Principal has no active organization membership")]
    NoActiveOrganization,

    #[error("Identity or membership lookup failed: {0}")]
    LookupFailed(String),

    #[error("Entitlement oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Entitlement oracle returned a malformed response: {0}")]
    OracleMalformedResponse(String),
}

impl GateError {
    /// Stable kind label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::UnknownFeature(_) => "unknown_feature",
            GateError::Unauthenticated => "unauthenticated",
            GateError::NoActiveOrganization => "no_active_organization",
            GateError::LookupFailed(_) => "lookup_failed",
            GateError::OracleUnavailable(_) => "oracle_unavailable",
            GateError::OracleMalformedResponse(_) => "oracle_malformed_response",
        }
    }

    /// Backend trouble, as opposed to an ordinary denial
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            GateError::LookupFailed(_)
                | GateError::OracleUnavailable(_)
                | GateError::OracleMalformedResponse(_)
        )
    }

    pub(crate) fn from_lookup(err: ProviderError) -> Self {
        GateError::LookupFailed(err.to_string())
    }
}

impl From<OracleError> for GateError {
    fn from(err: OracleError) -> Self {
        match err {
            ProviderError::Malformed(msg) => GateError::OracleMalformedResponse(msg),
            other @ (ProviderError::Transport(_) | ProviderError::Timeout(_)) => {
                GateError::OracleUnavailable(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_errors_map_to_gate_taxonomy() {
        let e: GateError = ProviderError::Malformed("\"yes\"".into()).into();
        assert_eq!(e.kind(), "oracle_malformed_response");

        let e: GateError = ProviderError::Timeout(Duration::from_millis(50)).into();
        assert_eq!(e.kind(), "oracle_unavailable");
        assert!(e.is_backend_failure());

        assert!(!GateError::Unauthenticated.is_backend_failure());
    }
}
