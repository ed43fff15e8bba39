use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "User id to put in the token subject")]
    pub user: Uuid,

    #[arg(long, help = "Email claim")]
    pub email: Option<String>,

    #[arg(long, help = "Lifetime in hours (defaults to configured expiry)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    if crate::is_production!() {
        anyhow::bail!("Refusing to mint tokens with APP_ENV=production");
    }

    let claims = Claims::new(args.user, args.email, args.hours.unwrap_or(security.jwt_expiry_hours));
    let token = generate_jwt(&claims, &security.jwt_secret)
        .map_err(|e| anyhow::anyhow!("{} (is JWT_SECRET set?)", e))?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "user_id": args.user, "expires_at": claims.exp })),
        )?,
    }
    Ok(())
}
