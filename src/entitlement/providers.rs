use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::catalog::FeatureKey;
use super::error::{OracleError, ProviderError};

/// Authenticated identity. Opaque to the gate beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(Uuid);

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Inactive,
}

impl MembershipStatus {
    /// Database status column to enum; anything unrecognised is inactive
    pub fn from_db(status: &str) -> Self {
        if status.eq_ignore_ascii_case("active") {
            MembershipStatus::Active
        } else {
            MembershipStatus::Inactive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub organization_id: Uuid,
    pub status: MembershipStatus,
}

impl OrganizationMembership {
    pub fn active(organization_id: Uuid) -> Self {
        Self { organization_id, status: MembershipStatus::Active }
    }

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// Resolves the principal behind the current session
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_principal(&self) -> Result<Option<Principal>, ProviderError>;
}

/// Maps a principal to its active organization
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    async fn active_membership(
        &self,
        principal: &Principal,
    ) -> Result<Option<OrganizationMembership>, ProviderError>;
}

/// Authoritative yes/no for an organization and feature
#[async_trait]
pub trait EntitlementOracle: Send + Sync {
    async fn check_entitlement(
        &self,
        organization_id: Uuid,
        feature_key: FeatureKey,
    ) -> Result<Option<bool>, OracleError>;
}

/// Identity provider with no session behind it
pub struct Anonymous;

#[async_trait]
impl IdentityProvider for Anonymous {
    async fn current_principal(&self) -> Result<Option<Principal>, ProviderError> {
        Ok(None)
    }
}

/// Identity resolved ahead of time (e.g. from a verified bearer token)
pub struct SessionIdentity(pub Option<Principal>);

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_principal(&self) -> Result<Option<Principal>, ProviderError> {
        Ok(self.0)
    }
}

/// Collaborator bundle shared by every gate in the process.
///
/// Built once at startup; cloning only bumps reference counts. Per-session
/// identity is layered on with [`GateBackend::with_identity`].
#[derive(Clone)]
pub struct GateBackend {
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) memberships: Arc<dyn MembershipLookup>,
    pub(crate) oracle: Arc<dyn EntitlementOracle>,
    pub(crate) oracle_timeout: Duration,
    pub(crate) lookup_timeout: Duration,
}

impl GateBackend {
    pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(
        memberships: Arc<dyn MembershipLookup>,
        oracle: Arc<dyn EntitlementOracle>,
    ) -> Self {
        Self {
            identity: Arc::new(Anonymous),
            memberships,
            oracle,
            oracle_timeout: Self::DEFAULT_ORACLE_TIMEOUT,
            lookup_timeout: Self::DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    /// Bound applied to the identity and membership lookups individually
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Same collaborators, different session
    pub fn with_identity(&self, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            memberships: self.memberships.clone(),
            oracle: self.oracle.clone(),
            oracle_timeout: self.oracle_timeout,
            lookup_timeout: self.lookup_timeout,
        }
    }

    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }
}

impl std::fmt::Debug for GateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateBackend")
            .field("oracle_timeout", &self.oracle_timeout)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}
