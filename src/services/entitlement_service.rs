use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::membership_service::provider_error;
use crate::entitlement::{EntitlementOracle, FeatureKey, OracleError};

/// Entitlement oracle backed by the `has_feature(org_id, feature_key)` SQL function
#[derive(Clone)]
pub struct EntitlementService {
    pool: PgPool,
}

impl EntitlementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementOracle for EntitlementService {
    async fn check_entitlement(
        &self,
        organization_id: Uuid,
        feature_key: FeatureKey,
    ) -> Result<Option<bool>, OracleError> {
        let answer: Option<bool> = sqlx::query_scalar("SELECT has_feature($1, $2)")
            .bind(organization_id)
            .bind(feature_key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)?;

        tracing::trace!(%organization_id, %feature_key, ?answer, "has_feature");
        Ok(answer)
    }
}
