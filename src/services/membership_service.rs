use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entitlement::{
    MembershipLookup, MembershipStatus, OrganizationMembership, Principal, ProviderError,
};

/// Organization membership lookup against the `organization_members` table
#[derive(Clone)]
pub struct MembershipService {
    pool: PgPool,
}

impl MembershipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipLookup for MembershipService {
    async fn active_membership(
        &self,
        principal: &Principal,
    ) -> Result<Option<OrganizationMembership>, ProviderError> {
        // Most recent active membership wins when a user belongs to several orgs
        let row: Option<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT organization_id, status
            FROM organization_members
            WHERE user_id = $1
            AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(principal.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(provider_error)?;

        Ok(row.map(|(organization_id, status)| OrganizationMembership {
            organization_id,
            status: MembershipStatus::from_db(&status),
        }))
    }
}

/// Decode problems mean the backend answered with something we can't read;
/// everything else is treated as the backend being unreachable.
pub(crate) fn provider_error(err: sqlx::Error) -> ProviderError {
    match &err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::RowNotFound => ProviderError::Malformed(err.to_string()),
        _ => ProviderError::Transport(err.to_string()),
    }
}
