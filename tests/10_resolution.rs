mod common;

use anyhow::Result;
use std::time::Duration;

use common::Fixture;
use tms_gate::entitlement::{
    decide, resolve, EntitlementDecision, EntitlementGate, FeatureKey, GateError, GateProps,
    ProviderError, Rendered,
};

#[tokio::test]
async fn unknown_keys_are_never_entitled() -> Result<()> {
    let fx = Fixture::signed_in();
    fx.oracle.answer_everything(Ok(Some(true)));
    let backend = fx.backend();

    for key in ["loads.spaceflight", "", "LOADS.OCEAN", "loads.ocean ", "analytics"] {
        assert_eq!(decide(&backend, key).await, EntitlementDecision::NotEntitled, "key {:?}", key);
        assert!(matches!(resolve(&backend, key).await, Err(GateError::UnknownFeature(_))));
    }

    // Nothing downstream is consulted for keys outside the catalog
    assert_eq!(fx.identity_calls(), 0);
    assert_eq!(fx.oracle_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_is_not_entitled_for_every_key() -> Result<()> {
    let fx = Fixture::anonymous();
    fx.oracle.answer_everything(Ok(Some(true)));
    let backend = fx.backend();

    for key in FeatureKey::ALL {
        assert_eq!(decide(&backend, key.as_str()).await, EntitlementDecision::NotEntitled);
    }
    assert_eq!(resolve(&backend, "loads.ocean").await, Err(GateError::Unauthenticated));
    assert_eq!(fx.membership_calls(), 0);
    assert_eq!(fx.oracle_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_or_inactive_membership_is_not_entitled() -> Result<()> {
    for fx in [
        Fixture::signed_in().without_membership(),
        Fixture::signed_in().with_inactive_membership(),
    ] {
        fx.oracle.answer_everything(Ok(Some(true)));
        let backend = fx.backend();

        assert_eq!(resolve(&backend, "analytics.advanced").await, Err(GateError::NoActiveOrganization));
        assert_eq!(decide(&backend, "analytics.advanced").await, EntitlementDecision::NotEntitled);
        assert_eq!(fx.oracle_calls(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn decision_is_exactly_the_oracle_answer() -> Result<()> {
    let fx = Fixture::signed_in();
    fx.oracle.answer(FeatureKey::LoadsOcean, Ok(Some(true)));
    fx.oracle.answer(FeatureKey::LoadsAir, Ok(Some(false)));
    fx.oracle.answer(FeatureKey::DataExport, Ok(None));
    let backend = fx.backend();

    assert_eq!(decide(&backend, "loads.ocean").await, EntitlementDecision::Entitled);
    assert_eq!(decide(&backend, "loads.air").await, EntitlementDecision::NotEntitled);
    assert_eq!(decide(&backend, "data.export").await, EntitlementDecision::NotEntitled);

    let seen = fx.oracle.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|(org, _)| *org == fx.organization_id));
    assert_eq!(seen[0].1, FeatureKey::LoadsOcean);
    Ok(())
}

#[tokio::test]
async fn oracle_failures_fail_closed() -> Result<()> {
    let fx = Fixture::signed_in();
    fx.oracle.answer(FeatureKey::RatesMarket, Err(ProviderError::Transport("connection reset".into())));
    fx.oracle.answer(FeatureKey::ApiAccess, Err(ProviderError::Malformed("\"yes\"".into())));
    let backend = fx.backend();

    assert!(matches!(
        resolve(&backend, "rates.market").await,
        Err(GateError::OracleUnavailable(_))
    ));
    assert!(matches!(
        resolve(&backend, "api.access").await,
        Err(GateError::OracleMalformedResponse(_))
    ));
    assert_eq!(decide(&backend, "rates.market").await, EntitlementDecision::NotEntitled);
    assert_eq!(decide(&backend, "api.access").await, EntitlementDecision::NotEntitled);
    Ok(())
}

#[tokio::test]
async fn slow_oracle_times_out_closed() -> Result<()> {
    let fx = Fixture::signed_in().with_oracle_timeout(Duration::from_millis(50));
    fx.oracle.answer_after(FeatureKey::DriversEld, Ok(Some(true)), Duration::from_millis(500));
    let backend = fx.backend();

    let result = resolve(&backend, "drivers.eld").await;
    assert!(matches!(result, Err(GateError::OracleUnavailable(_))), "got {:?}", result);
    assert_eq!(fx.oracle.completed.load(std::sync::atomic::Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn identity_backend_failure_fails_closed() -> Result<()> {
    let fx = Fixture::identity_down();
    fx.oracle.answer_everything(Ok(Some(true)));
    let backend = fx.backend();

    let result = resolve(&backend, "loads.ocean").await;
    assert!(matches!(result, Err(GateError::LookupFailed(_))));
    assert_eq!(decide(&backend, "loads.ocean").await, EntitlementDecision::NotEntitled);
    assert_eq!(fx.membership_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn membership_backend_failure_fails_closed() -> Result<()> {
    let fx = Fixture::signed_in();
    fx.oracle.answer_everything(Ok(Some(true)));
    fx.memberships.fail_with(ProviderError::Transport("pool timed out".into()));
    let backend = fx.backend();

    let result = resolve(&backend, "loads.ocean").await;
    assert!(matches!(result, Err(GateError::LookupFailed(_))), "got {:?}", result);
    assert_eq!(decide(&backend, "loads.ocean").await, EntitlementDecision::NotEntitled);
    assert_eq!(fx.oracle_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn hung_membership_lookup_times_out_closed() -> Result<()> {
    let fx = Fixture::signed_in().with_lookup_timeout(Duration::from_millis(50));
    fx.oracle.answer_everything(Ok(Some(true)));
    fx.memberships.stall_for(Duration::from_secs(3600));

    let gate = EntitlementGate::mount(fx.backend(), GateProps::new("loads.ocean", "<OceanManifest/>"));
    let decision = tokio::time::timeout(Duration::from_secs(1), gate.settled()).await?;

    assert_eq!(decision, EntitlementDecision::NotEntitled);
    assert!(matches!(gate.render(), Rendered::UpgradePrompt(_)));
    assert_eq!(fx.oracle_calls(), 0);
    Ok(())
}
