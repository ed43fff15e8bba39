use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CheckArgs {
    #[arg(help = "Feature key to check")]
    pub feature: String,

    #[arg(long, env = "GATECTL_SERVER", default_value = "http://localhost:3000", help = "Gate service base URL")]
    pub server: String,

    #[arg(long, env = "GATECTL_TOKEN", help = "Session token to check as")]
    pub token: Option<String>,
}

/// `{server}/api/entitlements/{feature}` with the key as a single escaped segment
fn entitlement_url(server: &str, feature: &str) -> anyhow::Result<url::Url> {
    let mut url = url::Url::parse(server).context("invalid --server URL")?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("--server URL cannot carry a path: {}", server))?
        .pop_if_empty()
        .extend(["api", "entitlements", feature]);
    Ok(url)
}

pub async fn handle(args: CheckArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = entitlement_url(&args.server, &args.feature)?;

    let mut request = reqwest::Client::new().get(url.clone());
    if let Some(token) = &args.token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    let status = response.status();
    let body: Value = response.json().await.context("gate service returned non-JSON body")?;
    if !status.is_success() {
        anyhow::bail!("gate service returned HTTP {}: {}", status, body);
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    let decision = data
        .get("decision")
        .and_then(Value::as_str)
        .unwrap_or("undetermined")
        .to_string();

    output_success(
        &output_format,
        &format!("{}: {}", args.feature, decision),
        Some(data),
    )
}
