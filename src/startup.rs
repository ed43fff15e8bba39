// Wiring of the process-wide gate backend from configuration

use anyhow::Context;
use std::sync::Arc;

use crate::config::{AppConfig, OracleBackend};
use crate::database::DatabaseManager;
use crate::entitlement::{EntitlementOracle, GateBackend};
use crate::handlers::AppState;
use crate::services::{EntitlementService, MembershipService, RpcEntitlementOracle};

/// Build the collaborator bundle once; every request shares it.
pub async fn build_backend(config: &AppConfig) -> anyhow::Result<GateBackend> {
    let pool = DatabaseManager::main_pool()
        .await
        .context("failed to initialise database pool")?;

    let oracle: Arc<dyn EntitlementOracle> = match config.gate.oracle_backend {
        OracleBackend::Postgres => Arc::new(EntitlementService::new(pool.clone())),
        OracleBackend::Rpc => {
            let url = config
                .gate
                .rpc_url
                .as_deref()
                .context("GATE_RPC_URL is required when GATE_ORACLE_BACKEND=rpc")?;
            Arc::new(RpcEntitlementOracle::new(
                url,
                config.gate.rpc_api_key.clone(),
                config.gate.oracle_timeout(),
            )?)
        }
    };

    tracing::info!(
        oracle = ?config.gate.oracle_backend,
        timeout_ms = config.gate.oracle_timeout_ms,
        lookup_timeout_ms = config.gate.lookup_timeout_ms,
        "Entitlement backend ready"
    );

    Ok(GateBackend::new(Arc::new(MembershipService::new(pool)), oracle)
        .with_oracle_timeout(config.gate.oracle_timeout())
        .with_lookup_timeout(config.gate.lookup_timeout()))
}

pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.security.jwt_secret.is_empty() {
        if crate::is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT_SECRET not set; every request will be treated as anonymous");
    }

    let backend = build_backend(config).await?;
    Ok(AppState::new(backend, config.security.jwt_secret.as_str())
        .with_decision_logging(config.gate.log_decisions))
}
