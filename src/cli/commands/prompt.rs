use clap::Args;

use crate::cli::OutputFormat;
use crate::entitlement::{GatePreset, UpgradePrompt};

#[derive(Args)]
pub struct PromptArgs {
    #[arg(help = "Feature key (e.g. loads.ocean) or preset name with --preset")]
    pub feature: String,

    #[arg(long, help = "Treat FEATURE as a preset name (e.g. ocean_freight)")]
    pub preset: bool,

    #[arg(long, help = "Plan tier hint (free, starter, pro, enterprise)")]
    pub plan: Option<String>,

    #[arg(long, help = "Add-on hint")]
    pub addon: Option<String>,
}

pub fn handle(args: PromptArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let prompt = if args.preset {
        let preset = GatePreset::parse(&args.feature)
            .ok_or_else(|| anyhow::anyhow!("Unknown preset '{}'", args.feature))?;
        UpgradePrompt::compose(
            preset.feature_key().as_str(),
            Some(args.plan.as_deref().unwrap_or(preset.plan_tier().as_str())),
            args.addon.as_deref().or(preset.addon()),
        )
    } else {
        UpgradePrompt::compose(&args.feature, args.plan.as_deref(), args.addon.as_deref())
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompt)?),
        OutputFormat::Text => println!("{}", prompt.text()),
    }
    Ok(())
}
