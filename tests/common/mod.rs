#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use tms_gate::entitlement::{
    EntitlementOracle, FeatureKey, GateBackend, IdentityProvider, MembershipLookup,
    MembershipStatus, OracleError, OrganizationMembership, Principal, ProviderError,
};

pub struct FakeIdentity {
    principal: Option<Principal>,
    failure: Option<ProviderError>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_principal(&self) -> Result<Option<Principal>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.principal),
        }
    }
}

/// Knows exactly one principal
pub struct FakeMemberships {
    principal: Principal,
    membership: Mutex<Option<OrganizationMembership>>,
    failure: Mutex<Option<ProviderError>>,
    delay: Mutex<Duration>,
    pub calls: AtomicUsize,
}

impl FakeMemberships {
    pub fn set(&self, membership: Option<OrganizationMembership>) {
        *self.membership.lock().unwrap() = membership;
    }

    pub fn fail_with(&self, error: ProviderError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn stall_for(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl MembershipLookup for FakeMemberships {
    async fn active_membership(
        &self,
        principal: &Principal,
    ) -> Result<Option<OrganizationMembership>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.failure.lock().unwrap().clone() {
            return Err(e);
        }
        if *principal != self.principal {
            return Ok(None);
        }
        Ok(self.membership.lock().unwrap().clone())
    }
}

#[derive(Clone)]
struct Scripted {
    answer: Result<Option<bool>, OracleError>,
    delay: Duration,
    panics: bool,
}

/// Oracle with per-feature scripted answers and delays.
/// Unscripted features answer `default`.
pub struct FakeOracle {
    script: Mutex<HashMap<FeatureKey, Scripted>>,
    default: Mutex<Result<Option<bool>, OracleError>>,
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
    pub seen: Mutex<Vec<(Uuid, FeatureKey)>>,
}

impl FakeOracle {
    pub fn answer(&self, key: FeatureKey, answer: Result<Option<bool>, OracleError>) {
        self.script_entry(key, answer, Duration::ZERO, false);
    }

    pub fn answer_after(&self, key: FeatureKey, answer: Result<Option<bool>, OracleError>, delay: Duration) {
        self.script_entry(key, answer, delay, false);
    }

    pub fn panic_on(&self, key: FeatureKey) {
        self.script_entry(key, Ok(None), Duration::ZERO, true);
    }

    pub fn answer_everything(&self, answer: Result<Option<bool>, OracleError>) {
        *self.default.lock().unwrap() = answer;
    }

    fn script_entry(&self, key: FeatureKey, answer: Result<Option<bool>, OracleError>, delay: Duration, panics: bool) {
        self.script
            .lock()
            .unwrap()
            .insert(key, Scripted { answer, delay, panics });
    }
}

#[async_trait]
impl EntitlementOracle for FakeOracle {
    async fn check_entitlement(
        &self,
        organization_id: Uuid,
        feature_key: FeatureKey,
    ) -> Result<Option<bool>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((organization_id, feature_key));

        let scripted = self.script.lock().unwrap().get(&feature_key).cloned();
        let scripted = scripted.unwrap_or_else(|| Scripted {
            answer: self.default.lock().unwrap().clone(),
            delay: Duration::ZERO,
            panics: false,
        });

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        if scripted.panics {
            panic!("oracle blew up for {}", feature_key);
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        scripted.answer
    }
}

/// A signed-in dispatcher with an active membership unless told otherwise
pub struct Fixture {
    pub principal: Principal,
    pub organization_id: Uuid,
    pub identity: Arc<FakeIdentity>,
    pub memberships: Arc<FakeMemberships>,
    pub oracle: Arc<FakeOracle>,
    pub oracle_timeout: Duration,
    pub lookup_timeout: Duration,
}

impl Fixture {
    pub fn signed_in() -> Self {
        Self::build(true, None)
    }

    pub fn anonymous() -> Self {
        Self::build(false, None)
    }

    pub fn identity_down() -> Self {
        Self::build(true, Some(ProviderError::Transport("auth service refused connection".into())))
    }

    fn build(signed_in: bool, identity_failure: Option<ProviderError>) -> Self {
        let principal = Principal::new(Uuid::new_v4());
        let organization_id = Uuid::new_v4();

        Self {
            principal,
            organization_id,
            identity: Arc::new(FakeIdentity {
                principal: signed_in.then_some(principal),
                failure: identity_failure,
                calls: AtomicUsize::new(0),
            }),
            memberships: Arc::new(FakeMemberships {
                principal,
                membership: Mutex::new(Some(OrganizationMembership::active(organization_id))),
                failure: Mutex::new(None),
                delay: Mutex::new(Duration::ZERO),
                calls: AtomicUsize::new(0),
            }),
            oracle: Arc::new(FakeOracle {
                script: Mutex::new(HashMap::new()),
                default: Mutex::new(Ok(None)),
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }),
            oracle_timeout: Duration::from_secs(2),
            lookup_timeout: Duration::from_secs(2),
        }
    }

    pub fn without_membership(self) -> Self {
        self.memberships.set(None);
        self
    }

    pub fn with_inactive_membership(self) -> Self {
        self.memberships.set(Some(OrganizationMembership {
            organization_id: self.organization_id,
            status: MembershipStatus::Inactive,
        }));
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn backend(&self) -> GateBackend {
        GateBackend::new(self.memberships.clone(), self.oracle.clone())
            .with_oracle_timeout(self.oracle_timeout)
            .with_lookup_timeout(self.lookup_timeout)
            .with_identity(self.identity.clone())
    }

    pub fn identity_calls(&self) -> usize {
        self.identity.calls.load(Ordering::SeqCst)
    }

    pub fn membership_calls(&self) -> usize {
        self.memberships.calls.load(Ordering::SeqCst)
    }

    pub fn oracle_calls(&self) -> usize {
        self.oracle.calls.load(Ordering::SeqCst)
    }
}
