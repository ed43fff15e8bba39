//! The resolution chain: feature key -> principal -> membership -> oracle.
//!
//! Each step is a typed `Result`; [`decide`] folds the chain to an
//! [`EntitlementDecision`] and logs why a denial happened.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::catalog::FeatureKey;
use super::decision::EntitlementDecision;
use super::error::{GateError, ProviderError};
use super::providers::{GateBackend, OrganizationMembership, Principal};

/// Run the lookup chain once. Reads each collaborator at most once and stops
/// at the first step that cannot prove entitlement.
pub async fn resolve(backend: &GateBackend, feature_key: &str) -> Result<bool, GateError> {
    let feature = FeatureKey::parse(feature_key)
        .ok_or_else(|| GateError::UnknownFeature(feature_key.to_string()))?;

    let principal = current_principal(backend).await?;
    let membership = active_membership(backend, &principal).await?;

    let answer = tokio::time::timeout(
        backend.oracle_timeout,
        backend.oracle.check_entitlement(membership.organization_id, feature),
    )
    .await
    .map_err(|_| ProviderError::Timeout(backend.oracle_timeout))??;

    Ok(answer.unwrap_or(false))
}

async fn current_principal(backend: &GateBackend) -> Result<Principal, GateError> {
    bounded(backend.lookup_timeout, backend.identity.current_principal())
        .await
        .map_err(GateError::from_lookup)?
        .ok_or(GateError::Unauthenticated)
}

async fn active_membership(
    backend: &GateBackend,
    principal: &Principal,
) -> Result<OrganizationMembership, GateError> {
    bounded(backend.lookup_timeout, backend.memberships.active_membership(principal))
        .await
        .map_err(GateError::from_lookup)?
        .filter(OrganizationMembership::is_active)
        .ok_or(GateError::NoActiveOrganization)
}

async fn bounded<T>(
    limit: Duration,
    lookup: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    tokio::time::timeout(limit, lookup)
        .await
        .map_err(|_| ProviderError::Timeout(limit))?
}

/// Resolve and fold to a decision. Never fails.
pub async fn decide(backend: &GateBackend, feature_key: &str) -> EntitlementDecision {
    let result = resolve(backend, feature_key).await;

    match &result {
        Ok(answer) => {
            debug!(feature_key, entitled = answer, "Entitlement resolved");
        }
        Err(e) if e.is_backend_failure() => {
            warn!(feature_key, kind = e.kind(), error = %e, "Entitlement check failed closed");
        }
        Err(e) => {
            debug!(feature_key, kind = e.kind(), "Entitlement denied");
        }
    }

    EntitlementDecision::from_resolution(&result)
}
