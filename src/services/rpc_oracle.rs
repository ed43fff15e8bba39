use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::entitlement::{EntitlementOracle, FeatureKey, OracleError, ProviderError};

#[derive(Debug, Error)]
pub enum RpcOracleError {
    #[error("Invalid RPC base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Entitlement oracle that calls the hosted backend's REST RPC endpoint:
/// `POST {base}/rest/v1/rpc/has_feature` with `{org_id, feature_key}`.
pub struct RpcEntitlementOracle {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl RpcEntitlementOracle {
    pub const FUNCTION: &'static str = "has_feature";

    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RpcOracleError> {
        let endpoint = Self::endpoint(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint, api_key, timeout })
    }

    fn endpoint(base_url: &str) -> Result<Url, url::ParseError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(&format!("rest/v1/rpc/{}", Self::FUNCTION))
    }

    fn transport_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// `true` / `false` / `null` are the only acceptable bodies
fn interpret_answer(body: &Value) -> Result<Option<bool>, OracleError> {
    match body {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(ProviderError::Malformed(format!("expected boolean, got {}", other))),
    }
}

#[async_trait]
impl EntitlementOracle for RpcEntitlementOracle {
    async fn check_entitlement(
        &self,
        organization_id: Uuid,
        feature_key: FeatureKey,
    ) -> Result<Option<bool>, OracleError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "org_id": organization_id, "feature_key": feature_key.as_str() }));

        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!("RPC {} returned HTTP {}", Self::FUNCTION, status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        interpret_answer(&body)
    }
}
